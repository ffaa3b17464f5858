//! Plain-text XYZ point sources
//!
//! One point per line, `x y [z ...]`, separated by whitespace or commas. Extra columns are
//! ignored since chunking is purely two-dimensional. Blank lines and lines starting with
//! `#` are skipped.

use crate::{ChunkError, Result};
use geo::Point;
use std::io::BufRead;
use std::path::Path;

/// Parse points from an XYZ text stream
pub fn read_xyz<R: BufRead>(reader: R) -> Result<Vec<Point<f64>>> {
    let mut points = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty());
        let x = parse_field(fields.next(), "x", line_number)?;
        let y = parse_field(fields.next(), "y", line_number)?;

        if !x.is_finite() || !y.is_finite() {
            tracing::warn!("Skipping non-finite point on line {}: ({}, {})", line_number, x, y);
            continue;
        }

        points.push(Point::new(x, y));
    }

    Ok(points)
}

/// Parse points from an XYZ file on disk
pub fn read_xyz_file(path: impl AsRef<Path>) -> Result<Vec<Point<f64>>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let points = read_xyz(std::io::BufReader::new(file))?;
    tracing::info!("Read {} points from {}", points.len(), path.display());
    Ok(points)
}

fn parse_field(field: Option<&str>, name: &str, line: usize) -> Result<f64> {
    let field = field.ok_or_else(|| ChunkError::ParsePoint {
        line,
        reason: format!("missing {name} coordinate"),
    })?;
    field.parse().map_err(|err| ChunkError::ParsePoint {
        line,
        reason: format!("invalid {name} coordinate {field:?}: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_whitespace_and_commas() {
        let input = "1.0 2.0 3.0\n4.5,5.5,6.5\n  -7\t8  \n";
        let points = read_xyz(input.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(1.0, 2.0),
                Point::new(4.5, 5.5),
                Point::new(-7.0, 8.0)
            ]
        );
    }

    #[test]
    fn test_skip_comments_and_blank_lines() {
        let input = "# x y z\n\n10 20\n   \n# trailing\n30 40 1\n";
        let points = read_xyz(input.as_bytes()).unwrap();
        assert_eq!(points, vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
    }

    #[test]
    fn test_skip_non_finite() {
        let input = "1 2\nNaN 3\n4 inf\n5 6\n";
        let points = read_xyz(input.as_bytes()).unwrap();
        assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(5.0, 6.0)]);
    }

    #[test]
    fn test_missing_coordinate() {
        let err = read_xyz("1 2\n3\n".as_bytes()).unwrap_err();
        match err {
            ChunkError::ParsePoint { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "missing y coordinate");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_coordinate() {
        let err = read_xyz("abc 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ChunkError::ParsePoint { line: 1, .. }));
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn test_missing_file() {
        let err = read_xyz_file("/nonexistent/points.xyz").unwrap_err();
        assert!(matches!(err, ChunkError::Io(_)));
    }
}

use foundation::Point3;

use crate::error::IngestWarning;
use crate::point_set::PointSet;

#[derive(Debug, Clone, PartialEq)]
pub struct XyzParse {
    pub points: PointSet,
    pub malformed_rows: Vec<IngestWarning>,
}

/// Reads whitespace-separated `x y [z]` rows.
///
/// Blank lines and `#` comments are skipped silently. Any other line that is
/// not two or three finite numbers is dropped and reported.
pub fn parse_xyz(text: &str) -> XyzParse {
    let mut points = Vec::new();
    let mut malformed_rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_row(line) {
            Some(p) => points.push(p),
            None => malformed_rows.push(IngestWarning::MalformedRow { line: i + 1 }),
        }
    }

    if !malformed_rows.is_empty() {
        tracing::debug!(skipped = malformed_rows.len(), "skipped malformed XYZ rows");
    }

    XyzParse {
        points: PointSet::new(points),
        malformed_rows,
    }
}

fn parse_row(line: &str) -> Option<Point3> {
    let mut values = [0.0f64; 3];
    let mut n = 0usize;
    for token in line.split_whitespace() {
        if n == 3 {
            return None;
        }
        let v: f64 = token.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        values[n] = v;
        n += 1;
    }
    if n < 2 {
        return None;
    }
    Some(Point3::new(values[0], values[1], values[2]))
}

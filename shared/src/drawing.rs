//! Extraction of plot points from the algebra system's textual output.
//!
//! The evaluation service answers with a rendering expression that embeds one
//! or more `Line({{x,y},{x,y},...})` segments. Everything around and between
//! the segments is presentation noise and gets ignored. A payload with no
//! well-formed segment yields zero points rather than an error.

use regex::Regex;
use std::sync::LazyLock;

static LINE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Line\(\{(.*?)\}\)").expect("valid segment pattern"));

static POINT_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)\s*\}")
        .expect("valid point pattern")
});

/// Parse every `Line(...)` segment into its own list of `(x, y)` points.
///
/// Points that fail to parse as finite floats are skipped; a segment that
/// loses all of its points is dropped.
pub fn parse_line_segments(payload: &str) -> Vec<Vec<(f64, f64)>> {
    LINE_SEGMENT
        .captures_iter(payload)
        .filter_map(|segment| {
            let inner = segment.get(1)?.as_str();
            let points: Vec<(f64, f64)> = POINT_PAIR
                .captures_iter(inner)
                .filter_map(|pair| {
                    let x: f64 = pair.get(1)?.as_str().parse().ok()?;
                    let y: f64 = pair.get(2)?.as_str().parse().ok()?;
                    (x.is_finite() && y.is_finite()).then_some((x, y))
                })
                .collect();
            (!points.is_empty()).then_some(points)
        })
        .collect()
}

/// All points of every segment, flattened and sorted by x. This is the shape
/// the interval cache stores per evaluated sub-range.
pub fn parse_points_sorted(payload: &str) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = parse_line_segments(payload).into_iter().flatten().collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_segment() {
        let payload = "Graphics[Line({{0.0,1.0},{0.5,1.25},{1.0,2.0}})]";
        let segments = parse_line_segments(payload);
        assert_eq!(segments, vec![vec![(0.0, 1.0), (0.5, 1.25), (1.0, 2.0)]]);
    }

    #[test]
    fn extracts_multiple_segments_separately() {
        let payload = "Show[Line({{-1,1},{0,0}}), Axes -> True, Line({{0,0},{1,1}})]";
        let segments = parse_line_segments(payload);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(-1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(segments[1], vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn handles_scientific_notation() {
        let payload = "Line({{1e-3,2.5E+2},{-2.0e1,-1}})";
        let segments = parse_line_segments(payload);
        assert_eq!(segments, vec![vec![(0.001, 250.0), (-20.0, -1.0)]]);
    }

    #[test]
    fn malformed_payload_yields_no_points() {
        assert!(parse_line_segments("").is_empty());
        assert!(parse_line_segments("Error: division by zero").is_empty());
        assert!(parse_line_segments("Line({broken").is_empty());
        assert!(parse_line_segments("Line({{a,b},{c,d}})").is_empty());
    }

    #[test]
    fn flattened_points_are_sorted_by_x() {
        let payload = "Line({{2,4},{3,9}}) Line({{0,0},{1,1}})";
        let points = parse_points_sorted(payload);
        assert_eq!(points, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0)]);
    }
}

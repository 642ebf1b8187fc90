//! Time series payload parser for the SGS REST API
//!
//! The API answers with a JSON array of `{"data": "dd/MM/yyyy", "valor": "..."}`
//! objects. Values are kept as text here; typing happens in `TimeSeriesPoint`.

use tracing::debug;

use crate::error::Result;
use crate::locale::try_parse_date;
use crate::types::TimeSeriesPoint;

/// Decode the REST payload into raw points.
///
/// # Errors
/// Returns `SgsError::JsonError` if the body is not an array of points.
pub fn parse_series_payload(json: &str) -> Result<Vec<TimeSeriesPoint>> {
    let points: Vec<TimeSeriesPoint> = serde_json::from_str(json)?;
    debug!(points = points.len(), "decoded series payload");
    Ok(points)
}

/// Drop a response that starts before the requested range.
///
/// When a range holds no observations the API answers with the latest value
/// instead of an empty array. A first point dated before `begin` marks that
/// case, and the whole response is discarded. Unparsable dates are treated
/// the same way.
pub fn apply_strict_range(points: Vec<TimeSeriesPoint>, begin: &str) -> Vec<TimeSeriesPoint> {
    let Some(first) = points.first() else {
        return points;
    };

    match (first.parsed_date(), try_parse_date(begin)) {
        (Some(first_date), Some(start)) if first_date >= start => points,
        _ => {
            debug!(begin, first = %first.date, "discarding observations outside strict range");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SgsError;

    const PAYLOAD: &str = r#"[
        {"data": "02/01/2020", "valor": "0.016"},
        {"data": "03/01/2020", "valor": "0,017"},
        {"data": "06/01/2020", "valor": ""}
    ]"#;

    #[test]
    fn test_parse_series_payload() {
        let points = parse_series_payload(PAYLOAD).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], TimeSeriesPoint::new("02/01/2020", "0.016"));
        assert_eq!(points[1].parsed_value(), Some(0.017));
        assert_eq!(points[2].parsed_value(), None);
    }

    #[test]
    fn test_parse_series_payload_empty() {
        assert!(parse_series_payload("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_series_payload_error_object() {
        let result = parse_series_payload(r#"{"error": "Value(s) not found"}"#);
        assert!(matches!(result, Err(SgsError::JsonError(_))));
    }

    #[test]
    fn test_strict_range_keeps_points_inside_range() {
        let points = parse_series_payload(PAYLOAD).unwrap();
        assert_eq!(apply_strict_range(points.clone(), "02/01/2020"), points);
        assert_eq!(apply_strict_range(points.clone(), "01/01/2020"), points);
    }

    #[test]
    fn test_strict_range_drops_points_before_start() {
        let points = parse_series_payload(PAYLOAD).unwrap();
        assert!(apply_strict_range(points, "05/01/2020").is_empty());
    }

    #[test]
    fn test_strict_range_unparsable_dates() {
        let points = parse_series_payload(PAYLOAD).unwrap();
        assert!(apply_strict_range(points, "2020-01-01").is_empty());

        let points = vec![TimeSeriesPoint::new("garbage", "1")];
        assert!(apply_strict_range(points, "01/01/2020").is_empty());
    }

    #[test]
    fn test_strict_range_empty_input() {
        assert!(apply_strict_range(Vec::new(), "not a date").is_empty());
    }
}

use geo_types::LineString;

use crate::error::{upstream_error, Error};

/// Decodes a Google encoded polyline (precision 1e5) into `(lng, lat)`
/// coordinates.
pub fn decode_polyline(encoded: &str) -> Result<LineString<f64>, Error> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(upstream_error)?;
        lng = lng
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(upstream_error)?;

        points.push((lng as f64 / 1e5, lat as f64 / 1e5));
    }

    Ok(points.into())
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, Error> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or_else(upstream_error)?;
        *index += 1;

        if byte < 63 || shift > 60 {
            return Err(upstream_error());
        }

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

#[test]
fn decodes_reference_polyline() {
    let line = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
    let points: Vec<(f64, f64)> = line.0.iter().map(|c| (c.y, c.x)).collect();

    assert_eq!(points.len(), 3);
    assert!((points[0].0 - 38.5).abs() < 1e-9);
    assert!((points[0].1 + 120.2).abs() < 1e-9);
    assert!((points[1].0 - 40.7).abs() < 1e-9);
    assert!((points[1].1 + 120.95).abs() < 1e-9);
    assert!((points[2].0 - 43.252).abs() < 1e-9);
    assert!((points[2].1 + 126.453).abs() < 1e-9);
}

#[test]
fn empty_polyline_has_no_points() {
    assert!(decode_polyline("").unwrap().0.is_empty());
}

#[test]
fn truncated_polyline_is_rejected() {
    assert!(decode_polyline("_p~iF~ps|U_").is_err());
    assert!(decode_polyline("_p~iF").is_err());
}

#[test]
fn overflowing_polyline_is_rejected() {
    // each value is a maximal 13 chunk delta, so the running sum overflows
    let chunk = format!("{}{}", "~".repeat(12), "]");
    let encoded = chunk.repeat(40);

    assert!(decode_polyline(&encoded).is_err());
}

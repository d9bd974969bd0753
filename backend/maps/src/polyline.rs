//! Google encoded-polyline codec.
//!
//! Coordinates are 5-decimal fixed-point, delta-coded, zigzag-signed, and
//! packed into printable ASCII in 5-bit groups offset by 63. The decoder is
//! used to draw provider route paths; the encoder mostly serves tests.

use anyhow::{bail, Result};

/// Decode an encoded polyline into (lat, lng) pairs.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut i = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while i < bytes.len() {
        let (dlat, next) = decode_value(bytes, i)?;
        let (dlng, next) = decode_value(bytes, next)?;
        i = next;
        lat += dlat;
        lng += dlng;
        points.push((lat as f64 / 1e5, lng as f64 / 1e5));
    }

    Ok(points)
}

fn decode_value(bytes: &[u8], mut i: usize) -> Result<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0;
    loop {
        let Some(&byte) = bytes.get(i) else {
            bail!("truncated polyline");
        };
        if !(63..=126).contains(&byte) {
            bail!("invalid polyline byte {byte:#x} at offset {i}");
        }
        let chunk = (byte - 63) as i64;
        i += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    // Zigzag: low bit carries the sign.
    let value = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, i))
}

/// Encode (lat, lng) pairs into an encoded polyline.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for &(lat, lng) in points {
        let ilat = (lat * 1e5).round() as i64;
        let ilng = (lng * 1e5).round() as i64;
        encode_value(ilat - prev_lat, &mut out);
        encode_value(ilng - prev_lng, &mut out);
        prev_lat = ilat;
        prev_lng = ilng;
    }

    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((0x20 | (v & 0x1f)) + 63) as u8) as char);
        v >>= 5;
    }
    out.push(((v + 63) as u8) as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vector from the polyline format documentation.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_vector() {
        let points = decode(REFERENCE).unwrap();
        assert_eq!(
            points,
            vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
        );
    }

    #[test]
    fn encodes_reference_vector() {
        let points = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(encode(&points), REFERENCE);
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn round_trips_negative_and_zero_deltas() {
        let points = [(0.0, 0.0), (-5.625, 1.0), (-5.625, 1.0)];
        let decoded = decode(&encode(&points)).unwrap();
        assert_eq!(decoded, points.to_vec());
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(decode("_p~iF").is_err());
    }

    #[test]
    fn rejects_out_of_range_bytes() {
        assert!(decode("\u{7f}").is_err());
    }
}

//! Google encoded-polyline decoding and encoding.
//!
//! The format packs signed coordinate deltas into ASCII: each value is
//! ZigZag-encoded, split into 5-bit chunks (low chunk first), each chunk
//! offset by 63, with bit 0x20 marking a continuation. Coordinates are stored
//! latitude-first; the decoded output here is `(lon, lat)` to match the
//! projection layer.

use thiserror::Error;

/// Coordinate precision factor (10^5, the format's default).
const PRECISION: f64 = 1e5;

#[derive(Debug, Error)]
pub enum PolylineError {
    #[error("polyline ends mid-coordinate at byte {0}")]
    Truncated(usize),

    #[error("unterminated continuation sequence starting at byte {0}")]
    Unterminated(usize),

    #[error("invalid polyline character {0:?} at byte {1}")]
    InvalidCharacter(char, usize),
}

/// Decode a polyline string to `(lon, lat)` pairs in decimal degrees.
///
/// An empty string decodes to an empty sequence.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut pos = 0usize;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while pos < bytes.len() {
        let (dlat, next) = decode_value(bytes, pos)?;
        if next >= bytes.len() {
            // A latitude delta with no longitude to pair it with.
            return Err(PolylineError::Truncated(next));
        }
        let (dlon, next) = decode_value(bytes, next)?;

        lat += dlat;
        lon += dlon;
        points.push((lon as f64 / PRECISION, lat as f64 / PRECISION));
        pos = next;
    }

    Ok(points)
}

/// Encode `(lon, lat)` pairs into a polyline string.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lon = 0i64;

    for &(lon, lat) in points {
        let ilat = (lat * PRECISION).round() as i64;
        let ilon = (lon * PRECISION).round() as i64;
        encode_value(ilat - prev_lat, &mut out);
        encode_value(ilon - prev_lon, &mut out);
        prev_lat = ilat;
        prev_lon = ilon;
    }

    out
}

/// Decode one ZigZag value starting at `pos`; returns the value and the
/// position just past it.
fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    let mut pos = start;

    loop {
        if pos >= bytes.len() {
            return Err(PolylineError::Unterminated(start));
        }
        let byte = bytes[pos];
        if byte < 63 {
            return Err(PolylineError::InvalidCharacter(byte as char, pos));
        }
        // 64 bits / 5 bits per chunk; anything longer cannot be a valid delta.
        if shift > 63 {
            return Err(PolylineError::Unterminated(start));
        }

        let chunk = (byte - 63) as u64;
        result |= (chunk & 0x1f) << shift;
        pos += 1;

        if chunk & 0x20 == 0 {
            break;
        }
        shift += 5;
    }

    let half = (result >> 1) as i64;
    let value = if result & 1 != 0 { !half } else { half };
    Ok((value, pos))
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        let mut chunk = (v & 0x1f) as u8;
        v >>= 5;
        if v != 0 {
            chunk |= 0x20;
        }
        out.push((chunk + 63) as char);
        if v == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_decode_known_string() {
        // The canonical example from the format documentation.
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);

        let expected = [(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)];
        for ((lon, lat), (elon, elat)) in points.iter().zip(expected.iter()) {
            assert_approx_eq!(*lon, *elon, 1e-9);
            assert_approx_eq!(*lat, *elat, 1e-9);
        }
    }

    #[test]
    fn test_empty_input_is_empty_sequence() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_preserves_order() {
        let input = vec![(0.0, 0.0), (0.001, 0.001), (0.002, 0.0), (0.001, -0.001)];
        let decoded = decode(&encode(&input)).unwrap();
        assert_eq!(decoded.len(), input.len());
        for ((lon, lat), (elon, elat)) in decoded.iter().zip(input.iter()) {
            assert_approx_eq!(*lon, *elon, 1e-9);
            assert_approx_eq!(*lat, *elat, 1e-9);
        }
    }

    #[test]
    fn test_encode_decode_roundtrip_on_strings() {
        // encode . decode must reproduce the original string exactly.
        for points in [
            vec![(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)],
            vec![(0.0, 0.0)],
            vec![(-0.001, 51.5), (0.001, 51.5)],
            vec![(179.99999, -85.0), (-179.99999, 85.0)],
        ] {
            let s = encode(&points);
            assert_eq!(encode(&decode(&s).unwrap()), s);
        }
    }

    #[test]
    fn test_truncated_mid_coordinate() {
        // A single latitude delta with no longitude.
        let lat_only = {
            let mut s = String::new();
            super::encode_value(12345, &mut s);
            s
        };
        assert!(matches!(
            decode(&lat_only),
            Err(PolylineError::Truncated(_))
        ));
    }

    #[test]
    fn test_unterminated_continuation() {
        // '_' (0x5f) carries the continuation bit; the stream ends before a
        // terminating chunk arrives.
        assert!(matches!(
            decode("__"),
            Err(PolylineError::Unterminated(0))
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(
            decode(" abc"),
            Err(PolylineError::InvalidCharacter(' ', 0))
        ));
    }
}

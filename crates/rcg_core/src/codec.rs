//! Scalar codec: wire byte order and fixed-point scaling.
//!
//! Binary log versions store every floating quantity as a scaled integer in
//! network (big-endian) byte order. v1 uses a x16 scale on 16-bit fields,
//! v2/v3 use a x65536 scale on 32-bit fields. Encoding rounds half away
//! from zero; this matches the legacy logs and is a compatibility contract,
//! not a tunable.

use std::io::{Read, Write};

/// Fixed-point scale for v1 16-bit position fields.
pub const SHOWINFO_SCALE: f64 = 16.0;

/// Fixed-point scale for v2/v3 32-bit fields.
pub const SHOWINFO_SCALE2: f64 = 65536.0;

pub fn net_to_host_i16(net: i16) -> i16 {
    i16::from_be(net)
}

pub fn host_to_net_i16(host: i16) -> i16 {
    host.to_be()
}

pub fn net_to_host_i32(net: i32) -> i32 {
    i32::from_be(net)
}

pub fn host_to_net_i32(host: i32) -> i32 {
    host.to_be()
}

/// Decode a big-endian scaled 16-bit field to a host double.
pub fn net_to_host_scaled_i16(net: i16, scale: f64) -> f64 {
    f64::from(i16::from_be(net)) / scale
}

/// Encode a host double as a big-endian scaled 16-bit field.
pub fn host_to_net_scaled_i16(value: f64, scale: f64) -> i16 {
    ((value * scale).round() as i16).to_be()
}

/// Decode a big-endian scaled 32-bit field to a host double.
pub fn net_to_host_scaled_i32(net: i32, scale: f64) -> f64 {
    f64::from(i32::from_be(net)) / scale
}

/// Encode a host double as a big-endian scaled 32-bit field.
pub fn host_to_net_scaled_i32(value: f64, scale: f64) -> i32 {
    ((value * scale).round() as i32).to_be()
}

/// Round `value` to the nearest multiple of `precision`.
///
/// The text serializers run every parameter through this before printing so
/// a decode/encode cycle does not accumulate float noise.
pub fn quantize(value: f64, precision: f64) -> f64 {
    (value / precision).round() * precision
}

pub fn read_i16(r: &mut (impl Read + ?Sized)) -> std::io::Result<i16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(i16::from_be_bytes(buf))
}

pub fn read_i32(r: &mut (impl Read + ?Sized)) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub fn write_i16(w: &mut (impl Write + ?Sized), v: i16) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_i32(w: &mut (impl Write + ?Sized), v: i32) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

/// Read a scaled 16-bit field directly into a host double.
pub fn read_scaled_i16(r: &mut (impl Read + ?Sized), scale: f64) -> std::io::Result<f64> {
    Ok(f64::from(read_i16(r)?) / scale)
}

/// Read a scaled 32-bit field directly into a host double.
pub fn read_scaled_i32(r: &mut (impl Read + ?Sized), scale: f64) -> std::io::Result<f64> {
    Ok(f64::from(read_i32(r)?) / scale)
}

pub fn write_scaled_i16(
    w: &mut (impl Write + ?Sized),
    value: f64,
    scale: f64,
) -> std::io::Result<()> {
    write_i16(w, (value * scale).round() as i16)
}

pub fn write_scaled_i32(
    w: &mut (impl Write + ?Sized),
    value: f64,
    scale: f64,
) -> std::io::Result<()> {
    write_i32(w, (value * scale).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_roundtrip() {
        assert_eq!(net_to_host_i16(host_to_net_i16(-1234)), -1234);
        assert_eq!(net_to_host_i32(host_to_net_i32(0x1234_5678)), 0x1234_5678);
    }

    #[test]
    fn test_scaled_i16_quantization() {
        // v1 positions live on a 1/16 grid
        let raw = host_to_net_scaled_i16(10.03, SHOWINFO_SCALE);
        let back = net_to_host_scaled_i16(raw, SHOWINFO_SCALE);
        assert!((back - 10.03).abs() <= 0.5 / SHOWINFO_SCALE, "got {}", back);
    }

    #[test]
    fn test_scaled_i32_roundtrip_precision() {
        for v in [-52.5, -0.0001, 0.0, 13.37, 99.999] {
            let raw = host_to_net_scaled_i32(v, SHOWINFO_SCALE2);
            let back = net_to_host_scaled_i32(raw, SHOWINFO_SCALE2);
            assert!((back - v).abs() <= 0.5 / SHOWINFO_SCALE2, "{} -> {}", v, back);
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.5 grid units must round away from zero in both directions
        assert_eq!(net_to_host_i16(host_to_net_scaled_i16(0.03125, SHOWINFO_SCALE)), 1);
        assert_eq!(net_to_host_i16(host_to_net_scaled_i16(-0.03125, SHOWINFO_SCALE)), -1);
    }

    #[test]
    fn test_quantize() {
        assert!((quantize(14.019999999, 0.0001) - 14.02).abs() < 1e-9);
        assert!((quantize(-0.00234999, 0.00001) + 0.00235).abs() < 1e-9);
        assert_eq!(quantize(0.0, 0.0001), 0.0);
    }

    #[test]
    fn test_helpers_take_trait_object_streams() {
        // the serializers hand these helpers a &mut dyn Write
        let mut buf: Vec<u8> = Vec::new();
        let w: &mut dyn Write = &mut buf;
        write_i16(w, 42).unwrap();
        write_scaled_i32(w, 1.5, SHOWINFO_SCALE2).unwrap();

        let mut slice = buf.as_slice();
        let r: &mut dyn Read = &mut slice;
        assert_eq!(read_i16(r).unwrap(), 42);
        assert_eq!(read_scaled_i32(r, SHOWINFO_SCALE2).unwrap(), 1.5);
    }

    #[test]
    fn test_read_write_helpers() {
        let mut buf = Vec::new();
        write_i16(&mut buf, -2).unwrap();
        write_i32(&mut buf, 70000).unwrap();
        write_scaled_i32(&mut buf, -5.25, SHOWINFO_SCALE2).unwrap();

        let mut r = buf.as_slice();
        assert_eq!(read_i16(&mut r).unwrap(), -2);
        assert_eq!(read_i32(&mut r).unwrap(), 70000);
        assert_eq!(read_scaled_i32(&mut r, SHOWINFO_SCALE2).unwrap(), -5.25);
    }
}

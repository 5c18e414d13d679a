//! RGBA colors packed as `0xRRGGBBAA`.

use nalgebra::{vector, Vector4};

pub const RED: u32 = 0xff0000ff;
pub const GREEN: u32 = 0x00ff00ff;
pub const BLUE: u32 = 0x0000ffff;
pub const YELLOW: u32 = 0xffff00ff;

/// Turret colors, cycled in order by clicks.
pub const PALETTE: [u32; 3] = [RED, GREEN, BLUE];

pub fn palette(index: usize) -> u32 {
    PALETTE[index % PALETTE.len()]
}

pub fn next_index(index: usize) -> usize {
    (index + 1) % PALETTE.len()
}

pub fn to_u32(c: Vector4<f32>) -> u32 {
    let convert = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u32;
    convert(c.x) << 24 | convert(c.y) << 16 | convert(c.z) << 8 | convert(c.w)
}

pub fn from_u32(c: u32) -> Vector4<f32> {
    let extract_color = |k: i64| -> f32 { (((c >> (k * 8)) & 0xff) as f32) / 255.0 };
    vector![
        extract_color(3),
        extract_color(2),
        extract_color(1),
        extract_color(0)
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(next_index(0), 1);
        assert_eq!(next_index(1), 2);
        assert_eq!(next_index(2), 0);
        assert_eq!(palette(3), RED);
    }

    #[test]
    fn test_unpack() {
        assert_eq!(from_u32(GREEN), vector![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(to_u32(from_u32(YELLOW)), YELLOW);
    }
}

use serde::Deserialize;

use crate::config::ColorValue;

pub type BlockId = u16;

/// The empty cell. Never highlightable.
pub const AIR: BlockId = 0;

/// Packed `0xAARRGGBB` color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Rgba(pub u32);

impl Rgba {
    pub const WHITE: Rgba = Rgba(0xFFFF_FFFF);

    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Rgba(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }
    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Per-channel mean, alpha included.
    #[inline]
    pub fn average(self, other: Rgba) -> Rgba {
        let mid = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
        Rgba::from_argb(
            mid(self.a(), other.a()),
            mid(self.r(), other.r()),
            mid(self.g(), other.g()),
            mid(self.b(), other.b()),
        )
    }

    /// Alpha multiplied by `factor`, clamped to `[0, 1]`.
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Rgba {
        let f = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        let a = (self.a() as f32 * f).round() as u8;
        Rgba((self.0 & 0x00FF_FFFF) | ((a as u32) << 24))
    }

    /// Color bits reinterpreted as an `f32` for interleaved vertex buffers.
    #[inline]
    pub fn to_f32_bits(self) -> f32 {
        f32::from_bits(self.0)
    }

    /// Parses `#AARRGGBB` or `#RRGGBB` (opaque). The leading `#` is optional.
    pub fn parse_hex(s: &str) -> Option<Rgba> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let v = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            8 => Some(Rgba(v)),
            6 => Some(Rgba(0xFF00_0000 | v)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_roundtrip() {
        let c = Rgba::from_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(c.0, 0x8011_2233);
        assert_eq!((c.a(), c.r(), c.g(), c.b()), (0x80, 0x11, 0x22, 0x33));
    }

    #[test]
    fn average_is_per_channel() {
        let a = Rgba(0xFF00_FF00);
        let b = Rgba(0x0100_00FF);
        assert_eq!(a.average(b), Rgba(0x8000_7F7F));
        assert_eq!(a.average(a), a);
    }

    #[test]
    fn scale_alpha_clamps() {
        let c = Rgba(0xC812_3456);
        assert_eq!(c.scale_alpha(1.0), c);
        assert_eq!(c.scale_alpha(0.0), Rgba(0x0012_3456));
        assert_eq!(c.scale_alpha(4.0), c);
        assert_eq!(c.scale_alpha(0.5).a(), 100);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Rgba::parse_hex("#80FF0000"), Some(Rgba(0x80FF_0000)));
        assert_eq!(Rgba::parse_hex("00ff00"), Some(Rgba(0xFF00_FF00)));
        assert_eq!(Rgba::parse_hex("#fff"), None);
        assert_eq!(Rgba::parse_hex("#+0FF0000"), None);
    }
}

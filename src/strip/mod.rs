use std::fmt::{Debug, Display};

use common::RgbPayload;
use packed_struct::prelude::*;

use self::pack::FramePack;

pub mod pack;
pub mod transmitter;

pub use transmitter::ProtocolTransmitter;

/// Clamp any integer into a channel value. Out of range is never an error.
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

/// Two-bit check field derived from the top two bits of a channel: bit 1 is
/// set when channel bit 7 is clear, bit 0 when channel bit 6 is clear.
pub fn anti_code(channel: u8) -> u8 {
    let mut code = 0;
    if channel & 0x80 == 0 {
        code |= 0b10;
    }
    if channel & 0x40 == 0 {
        code |= 0b01;
    }
    code
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R:{}, G:{}, B:{}", self.r, self.g, self.b)
    }
}

impl From<Color> for RgbPayload {
    fn from(color: Color) -> Self {
        RgbPayload {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// The 32-bit word clocked into the chip for one color
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame(u32);

impl Frame {
    pub fn encode(color: Color) -> Frame {
        Frame(u32::from_be_bytes(FramePack::from(color).checksum_pack()))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Field view of this frame
    pub fn unpack(&self) -> Result<FramePack, PackingError> {
        FramePack::unpack(&self.0.to_be_bytes())
    }

    /// Iterate the frame bits, most significant first
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let word = self.0;
        (0..32).rev().map(move |i| (word >> i) & 1 == 1)
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame(0x{:08X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anti_code_all_channels() {
        for channel in 0..=255u8 {
            let expected = match (channel >> 7 & 1, channel >> 6 & 1) {
                (0, 0) => 0b11,
                (0, 1) => 0b10,
                (1, 0) => 0b01,
                _ => 0b00,
            };
            assert_eq!(anti_code(channel), expected, "channel {}", channel);
            assert_eq!(anti_code(channel), anti_code(channel & 0xC0));
        }
    }

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-5), 0);
        assert_eq!(clamp_channel(0), 0);
        assert_eq!(clamp_channel(128), 128);
        assert_eq!(clamp_channel(255), 255);
        assert_eq!(clamp_channel(300), 255);
        assert_eq!(clamp_channel(i64::MIN), 0);
        assert_eq!(clamp_channel(i64::MAX), 255);
    }

    #[test]
    fn test_encode_black() {
        // Header 11, all anti-codes 11, no color
        assert_eq!(Frame::encode(Color::BLACK).value(), 0xFF00_0000);
    }

    #[test]
    fn test_encode_white() {
        assert_eq!(Frame::encode(Color::new(255, 255, 255)).value(), 0xC0FF_FFFF);
    }

    #[test]
    fn test_encode_layout() {
        // b = 0x80 -> 01, g = 0x40 -> 10, r = 0x05 -> 11
        let frame = Frame::encode(Color::new(0x05, 0x40, 0x80));
        assert_eq!(
            frame.value(),
            0b11_01_10_11u32 << 24 | 0x80 << 16 | 0x40 << 8 | 0x05
        );
    }

    #[test]
    fn test_encode_header_and_bytes() {
        for &(r, g, b) in &[(0, 0, 0), (5, 6, 7), (255, 0, 128), (64, 192, 1), (10, 20, 30)] {
            let frame = Frame::encode(Color::new(r, g, b)).value();
            assert_eq!(frame >> 30, 0b11);
            assert_eq!((frame >> 28) & 0b11, anti_code(b) as u32);
            assert_eq!((frame >> 26) & 0b11, anti_code(g) as u32);
            assert_eq!((frame >> 24) & 0b11, anti_code(r) as u32);
            assert_eq!((frame >> 16) as u8, b);
            assert_eq!((frame >> 8) as u8, g);
            assert_eq!(frame as u8, r);
        }
    }

    #[test]
    fn test_frame_bits_msb_first() {
        let frame = Frame::encode(Color::BLACK);
        let bits: Vec<bool> = frame.bits().collect();
        assert_eq!(bits.len(), 32);
        assert!(bits[..8].iter().all(|bit| *bit));
        assert!(bits[8..].iter().all(|bit| !*bit));
    }

    #[test]
    fn test_unpack_roundtrip() -> Result<(), PackingError> {
        let color = Color::new(5, 6, 7);
        let pack = Frame::encode(color).unpack()?;
        assert_eq!(Color::from(pack), color);
        Ok(())
    }
}

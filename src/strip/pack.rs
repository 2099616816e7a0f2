use packed_struct::{prelude::*, types::bits::Bits};

use super::{anti_code, Color};

const HEADER: u8 = 0b11;

// bit # | Definition (msb0)
// 0..=1   | Header, always 0b11
// 2..=3   | Anti-code of blue
// 4..=5   | Anti-code of green
// 6..=7   | Anti-code of red
// 8..=15  | Blue
// 16..=23 | Green
// 24..=31 | Red
#[derive(PackedStruct, Default, Debug, PartialEq, Clone)]
#[packed_struct(bit_numbering = "msb0")]
pub struct FramePack {
    #[packed_field(bits = "0..=1")]
    pub header: Integer<u8, Bits<2>>,
    #[packed_field(bits = "2..=3")]
    pub blue_check: Integer<u8, Bits<2>>,
    #[packed_field(bits = "4..=5")]
    pub green_check: Integer<u8, Bits<2>>,
    #[packed_field(bits = "6..=7")]
    pub red_check: Integer<u8, Bits<2>>,
    #[packed_field(bits = "8..=15")]
    pub blue: u8,
    #[packed_field(bits = "16..=23")]
    pub green: u8,
    #[packed_field(bits = "24..=31")]
    pub red: u8,
}

impl FramePack {
    /// Fill in the header and anti-codes from the color bytes, then pack
    pub fn checksum_pack(&mut self) -> [u8; 4] {
        self.header = HEADER.into();
        self.blue_check = anti_code(self.blue).into();
        self.green_check = anti_code(self.green).into();
        self.red_check = anti_code(self.red).into();

        // Every field is exactly as wide as its bit range
        self.pack().expect("frame fields fit their bit ranges")
    }
}

impl From<Color> for FramePack {
    fn from(color: Color) -> Self {
        FramePack {
            red: color.r,
            green: color.g,
            blue: color.b,
            ..Default::default()
        }
    }
}

impl From<FramePack> for Color {
    fn from(pack: FramePack) -> Self {
        Color::new(pack.red, pack.green, pack.blue)
    }
}

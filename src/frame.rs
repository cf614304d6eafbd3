//! Framing of a command word into the header, command and footer fields.

use core::fmt;

use crate::transmitter::{Transmission, Waveform};
use crate::types::CommandWord;

/// Sent before every command word.
pub const HEADER: u16 = 0xD5AA;
/// Sent after every command word.
pub const FOOTER: u8 = 0xAD;

/// A value of 8 or 16 bits, transmitted most significant bit first.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Field {
    value: u16,
    width: u8,
}

impl Field {
    pub const fn word(value: u16) -> Self {
        Self { value, width: 16 }
    }

    pub const fn byte(value: u8) -> Self {
        Self {
            value: value as u16,
            width: 8,
        }
    }

    pub const fn value(self) -> u16 {
        self.value
    }

    /// Number of bits in the field.
    pub const fn width(self) -> u8 {
        self.width
    }

    /// The bit at `position`, counted from the most significant bit.
    pub(crate) const fn bit(self, position: u8) -> bool {
        (self.value >> (self.width - 1 - position)) & 1 == 1
    }

    /// The bits of the field, most significant first.
    pub fn bits(self) -> impl Iterator<Item = bool> {
        (0..self.width).map(move |n| self.bit(n))
    }
}

/// The three fields sent for one command.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Frame {
    command: CommandWord,
}

impl Frame {
    pub const fn new(command: CommandWord) -> Self {
        Self { command }
    }

    pub const fn command_word(&self) -> CommandWord {
        self.command
    }

    /// Header, command and footer, in transmission order.
    pub const fn fields(&self) -> [Field; 3] {
        [
            Field::word(HEADER),
            Field::word(self.command.bits()),
            Field::byte(FOOTER),
        ]
    }

    /// Total number of bits in the frame.
    pub const fn bit_len(&self) -> usize {
        16 + 16 + 8
    }

    /// The line states of a complete send of this frame, reset included.
    pub fn transmission(&self) -> Transmission {
        Transmission::new(self)
    }

    pub fn waveform(&self) -> Waveform {
        self.transmission().collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X} {:04X} {:02X}", HEADER, self.command, FOOTER)
    }
}

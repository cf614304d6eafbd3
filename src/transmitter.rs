//! Bit level transmission state machine.
//!
//! The CM17A is powered from the RTS and DTR lines, and decodes bits from
//! which of the two lines is dropped. Every bit takes two phases: a mark
//! phase with only RTS asserted for a one or only DTR asserted for a zero,
//! followed by an idle phase with both lines asserted. Each phase is held
//! for [`PHASE_DELAY`].
//!
//! Nothing in this module touches the hardware or sleeps. The iterators
//! yield the [`LineState`] to apply next, and the caller holds each for
//! [`PHASE_DELAY`], see [`crate::io::Session`].

use arrayvec::ArrayVec;
use core::fmt;
use core::time::Duration;

use crate::frame::{Field, Frame};

/// How long every line state is held. Set by the transceiver's timing, the
/// hardware accepts a few milliseconds of jitter either way.
pub const PHASE_DELAY: Duration = Duration::from_millis(35);

/// The level of the two control lines, `true` meaning asserted.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct LineState {
    pub rts: bool,
    pub dtr: bool,
}

impl LineState {
    /// Mark phase of a one bit.
    pub const MARK_ONE: Self = Self {
        rts: true,
        dtr: false,
    };
    /// Mark phase of a zero bit.
    pub const MARK_ZERO: Self = Self {
        rts: false,
        dtr: true,
    };
    /// Between bits, and the resting state of a powered transceiver.
    pub const IDLE: Self = Self {
        rts: true,
        dtr: true,
    };
    /// Both lines dropped, used to reset the transceiver.
    pub const RELEASED: Self = Self {
        rts: false,
        dtr: false,
    };

    /// The mark phase for `bit`.
    pub const fn mark(bit: bool) -> Self {
        if bit {
            Self::MARK_ONE
        } else {
            Self::MARK_ZERO
        }
    }

    /// One character summary: `1`, `0`, `-` for idle and `_` for released.
    pub const fn symbol(self) -> char {
        match (self.rts, self.dtr) {
            (true, false) => '1',
            (false, true) => '0',
            (true, true) => '-',
            (false, false) => '_',
        }
    }
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RTS={} DTR={}", self.rts as u8, self.dtr as u8)
    }
}

/// Line states that reset the transceiver before a frame.
pub const RESET: [LineState; 2] = [LineState::RELEASED, LineState::IDLE];

/// Number of line states in a complete send: reset plus two per frame bit.
pub const WAVEFORM_LEN: usize = RESET.len() + 2 * (16 + 16 + 8);

/// All line states of one send, in order.
pub type Waveform = ArrayVec<LineState, WAVEFORM_LEN>;

/// Yields the two phases of every bit of a [`Field`], most significant
/// bit first.
#[derive(Debug, Clone)]
pub struct BitTransmitter {
    field: Field,
    position: u8,
    mark_sent: bool,
}

impl BitTransmitter {
    pub const fn new(field: Field) -> Self {
        Self {
            field,
            position: 0,
            mark_sent: false,
        }
    }

    fn remaining(&self) -> usize {
        let bits_left = (self.field.width() - self.position) as usize;
        bits_left * 2 - self.mark_sent as usize
    }
}

impl Iterator for BitTransmitter {
    type Item = LineState;

    fn next(&mut self) -> Option<LineState> {
        if self.position == self.field.width() {
            return None;
        }
        if self.mark_sent {
            self.mark_sent = false;
            self.position += 1;
            Some(LineState::IDLE)
        } else {
            self.mark_sent = true;
            Some(LineState::mark(self.field.bit(self.position)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining();
        (len, Some(len))
    }
}

impl ExactSizeIterator for BitTransmitter {}

#[derive(Debug, Clone)]
enum Stage {
    Reset(usize),
    Field(usize, BitTransmitter),
    Done,
}

/// Yields every line state of a complete send: the reset sequence, then
/// the header, command and footer fields.
#[derive(Debug, Clone)]
pub struct Transmission {
    fields: [Field; 3],
    stage: Stage,
}

impl Transmission {
    pub fn new(frame: &Frame) -> Self {
        Self {
            fields: frame.fields(),
            stage: Stage::Reset(0),
        }
    }

    fn start_field(&self, index: usize) -> Stage {
        match self.fields.get(index) {
            Some(field) => Stage::Field(index, BitTransmitter::new(*field)),
            None => Stage::Done,
        }
    }
}

impl Iterator for Transmission {
    type Item = LineState;

    fn next(&mut self) -> Option<LineState> {
        loop {
            match &mut self.stage {
                Stage::Reset(n) => {
                    if let Some(state) = RESET.get(*n) {
                        *n += 1;
                        return Some(*state);
                    }
                    self.stage = self.start_field(0);
                }
                Stage::Field(index, bits) => {
                    if let Some(state) = bits.next() {
                        return Some(state);
                    }
                    let next = *index + 1;
                    self.stage = self.start_field(next);
                }
                Stage::Done => return None,
            }
        }
    }
}

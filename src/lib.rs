//! Sans-io implementation of the CM17A ("FireCracker") X-10 transceiver protocol.
//!
//! The CM17A plugs into a serial port and turns a pattern of RTS and DTR
//! levels into an X-10 radio command. Nothing is ever sent on the data lines.
//!
//! A command token like `A1ON` goes through these steps:
//! 1. [`parse`] turns it into a [`Command`],
//! 2. [`encode`] turns the command into a 16 bit [`CommandWord`],
//! 3. [`Frame`] wraps the word in a header and a footer,
//! 4. [`Transmission`] yields the line states for the whole frame,
//!    each to be held for [`PHASE_DELAY`].
//!
//! The [`io`] module (feature `std`) drives any [`io::ControlLines`]
//! implementation through these states, and the [`serial`] module
//! (feature `serial`) provides one for real serial ports.
//!
//! ## Example
//! ```
//! use cm17a_proto::{parse, Frame, LineState};
//!
//! let command = parse("A1ON").unwrap();
//! assert_eq!(command.encode(), 0x6000);
//!
//! let frame = Frame::new(command.encode());
//! let mut states = frame.transmission();
//! assert_eq!(states.next(), Some(LineState::RELEASED));
//! assert_eq!(states.next(), Some(LineState::IDLE));
//! // first header bit is a one
//! assert_eq!(states.next(), Some(LineState::MARK_ONE));
//! ```
#![cfg_attr(not(any(feature = "std", test)), no_std)]

mod command;
mod frame;
mod parser;
mod transmitter;
mod types;

#[cfg(feature = "std")]
pub mod io;
#[cfg(feature = "serial")]
pub mod serial;

pub use command::{encode, encode_raw, Command};
pub use frame::{Field, Frame, FOOTER, HEADER};
pub use parser::parse;
pub use transmitter::{
    BitTransmitter, LineState, Transmission, Waveform, PHASE_DELAY, RESET, WAVEFORM_LEN,
};
pub use types::{CommandWord, Error, Function, HouseCode, UnitCode};

//! Blocking transmission of commands over a pair of control lines.
//!
//! [`Session`] applies the line states of one frame and holds each for
//! [`PHASE_DELAY`]. [`Sender`] runs one session per command token, opening
//! the transport anew each time so every command starts from a freshly reset
//! transceiver.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use snafu::{ResultExt, Snafu};

use crate::command::Command;
use crate::frame::Frame;
use crate::parser::parse;
use crate::transmitter::{LineState, PHASE_DELAY};
use crate::types::Error as CommandError;

/// Error type for this module
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The transport couldn't be opened. Nothing was sent.
    #[snafu(display("Couldn't open the transceiver port: {}", source))]
    Open { source: io::Error },
    /// Setting the control lines failed partway through a frame.
    #[snafu(display("Failed to set control lines to {}: {}", state, source))]
    LineControl { state: LineState, source: io::Error },
}

/// The two output lines the transceiver listens to.
pub trait ControlLines {
    /// Drive RTS and DTR to the levels in `state`.
    /// # Errors
    /// Returns any error from the underlying device.
    fn set_lines(&mut self, state: LineState) -> io::Result<()>;
}

impl<T: ControlLines + ?Sized> ControlLines for &mut T {
    fn set_lines(&mut self, state: LineState) -> io::Result<()> {
        (**self).set_lines(state)
    }
}

impl<T: ControlLines + ?Sized> ControlLines for Box<T> {
    fn set_lines(&mut self, state: LineState) -> io::Result<()> {
        (**self).set_lines(state)
    }
}

/// Holds the current line state for a while.
pub trait Timer {
    fn hold(&mut self, duration: Duration);
}

impl<T: Timer + ?Sized> Timer for &mut T {
    fn hold(&mut self, duration: Duration) {
        (**self).hold(duration)
    }
}

/// How far behind schedule [`StdTimer`] may fall before it stops catching up.
pub const JITTER_TOLERANCE: Duration = Duration::from_millis(3);

/// [`Timer`] that sleeps the current thread.
///
/// Consecutive holds are measured from the end of the previous one rather
/// than from when `hold` is called, so the time spent toggling the lines
/// doesn't add up over a frame. When a hold starts more than
/// [`JITTER_TOLERANCE`] late, the schedule restarts from the current time.
#[derive(Debug, Default)]
pub struct StdTimer {
    deadline: Option<Instant>,
}

impl StdTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for StdTimer {
    fn hold(&mut self, duration: Duration) {
        let now = Instant::now();
        let start = match self.deadline {
            Some(last) if now.saturating_duration_since(last) <= JITTER_TOLERANCE => last,
            _ => now,
        };
        let deadline = start + duration;
        self.deadline = Some(deadline);
        if let Some(remaining) = deadline.checked_duration_since(now) {
            thread::sleep(remaining);
        }
    }
}

/// Exclusive use of the control lines for sending one command.
///
/// The lines are released when the session is dropped, which
/// [`send`](Self::send) always does, whether or not the send succeeds.
pub struct Session<L, T> {
    lines: L,
    timer: T,
}

impl<L: ControlLines, T: Timer> Session<L, T> {
    pub fn new(lines: L, timer: T) -> Self {
        Self { lines, timer }
    }

    /// Reset the transceiver and send `command`. Blocks for about three seconds.
    /// # Errors
    /// Returns [`Error::LineControl`] if the lines can't be set. The transceiver
    /// may have seen part of the frame by then.
    pub fn send(mut self, command: &Command) -> Result<(), Error> {
        let frame = Frame::new(command.encode());
        debug!("Sending {} as frame {}", command, frame);
        for state in frame.transmission() {
            trace!("{}", state);
            self.lines
                .set_lines(state)
                .context(LineControlSnafu { state })?;
            self.timer.hold(PHASE_DELAY);
        }
        Ok(())
    }
}

/// Result of sending one token.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Outcome {
    /// The token was parsed and the command sent.
    Sent(Command),
    /// The token isn't a valid command, the transport was never opened.
    Invalid(CommandError),
}

/// Sends command tokens one at a time, each in its own [`Session`].
///
/// `open` is called once for every valid token, and the lines it returns are
/// dropped before the next token is handled.
pub struct Sender<F, T> {
    open: F,
    timer: T,
}

impl<F, L, T> Sender<F, T>
where
    F: FnMut() -> io::Result<L>,
    L: ControlLines,
    T: Timer,
{
    pub fn new(open: F, timer: T) -> Self {
        Self { open, timer }
    }

    /// Parse `token` and send it if it is valid.
    /// # Errors
    /// Returns [`Error::Open`] if the transport can't be opened and
    /// [`Error::LineControl`] if it fails during the send.
    pub fn send_token(&mut self, token: &str) -> Result<Outcome, Error> {
        match parse(token) {
            Ok(command) => {
                self.send_command(&command)?;
                Ok(Outcome::Sent(command))
            }
            Err(err) => {
                warn!("{} is an invalid command: {}", token, err);
                Ok(Outcome::Invalid(err))
            }
        }
    }

    /// Open the transport, send `command` and close the transport again.
    /// # Errors
    /// See [`send_token`](Self::send_token).
    pub fn send_command(&mut self, command: &Command) -> Result<(), Error> {
        let lines = (self.open)().context(OpenSnafu)?;
        Session::new(lines, &mut self.timer).send(command)
    }
}

/// What [`send_all`] did with its tokens.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Report {
    pub sent: Vec<Command>,
    pub invalid: Vec<String>,
}

/// Send every token in order, skipping the invalid ones.
///
/// # Errors
/// Stops at the first transport error, without trying the remaining tokens.
///
/// ## Example
/// ```
/// use cm17a_proto::io::{send_all, ControlLines, Timer};
/// use cm17a_proto::LineState;
/// use std::time::Duration;
///
/// struct Lines(usize);
/// impl ControlLines for Lines {
///     fn set_lines(&mut self, _state: LineState) -> std::io::Result<()> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// struct NoWait;
/// impl Timer for NoWait {
///     fn hold(&mut self, _duration: Duration) {}
/// }
///
/// let report = send_all(vec!["A1ON", "Q1ON", "CDIM"], || Ok(Lines(0)), NoWait).unwrap();
/// assert_eq!(report.sent.len(), 2);
/// assert_eq!(report.invalid, ["Q1ON"]);
/// ```
pub fn send_all<'a, I, F, L, T>(tokens: I, open: F, timer: T) -> Result<Report, Error>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut() -> io::Result<L>,
    L: ControlLines,
    T: Timer,
{
    let mut sender = Sender::new(open, timer);
    let mut report = Report::default();
    for token in tokens {
        match sender.send_token(token)? {
            Outcome::Sent(command) => report.sent.push(command),
            Outcome::Invalid(_) => report.invalid.push(token.to_owned()),
        }
    }
    Ok(report)
}

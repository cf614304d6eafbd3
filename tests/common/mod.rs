#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Error, ErrorKind};
use std::rc::Rc;
use std::time::Duration;

use cm17a_proto::io::{ControlLines, Timer};
use cm17a_proto::LineState;

/// Simulated CM17A on a simulated serial port, recording every line change
/// and every hold, on a simulated clock.
#[derive(Default)]
pub struct Transceiver {
    /// (session number, line state) for every `set_lines` call.
    pub events: Vec<(usize, LineState)>,
    pub holds: Vec<Duration>,
    pub now: Duration,
    pub opened: usize,
    pub closed: usize,
    fail_open: bool,
    fail_lines_after: Option<usize>,
}

/// An open handle to the simulated port.
pub struct TransceiverLines {
    inner: Rc<RefCell<Transceiver>>,
    session: usize,
}

/// Clock that advances the simulated time instead of sleeping.
pub struct SimClock(Rc<RefCell<Transceiver>>);

impl Transceiver {
    pub fn new() -> Rc<RefCell<Transceiver>> {
        Rc::new(RefCell::new(Transceiver::default()))
    }

    pub fn trigger_open_error(&mut self) {
        self.fail_open = true;
    }

    /// Make `set_lines` fail once `count` more calls have succeeded.
    pub fn trigger_line_error_after(&mut self, count: usize) {
        self.fail_lines_after = Some(count);
    }

    pub fn open(this: &Rc<RefCell<Transceiver>>) -> std::io::Result<TransceiverLines> {
        let mut inner = this.borrow_mut();
        if inner.fail_open {
            return Err(Error::new(ErrorKind::NotFound, "no such port"));
        }
        inner.opened += 1;
        Ok(TransceiverLines {
            inner: Rc::clone(this),
            session: inner.opened,
        })
    }

    pub fn clock(this: &Rc<RefCell<Transceiver>>) -> SimClock {
        SimClock(Rc::clone(this))
    }

    /// Line states applied during session `session`, counting from 1.
    pub fn session_states(&self, session: usize) -> Vec<LineState> {
        self.events
            .iter()
            .filter(|(s, _)| *s == session)
            .map(|(_, state)| *state)
            .collect()
    }
}

impl ControlLines for TransceiverLines {
    fn set_lines(&mut self, state: LineState) -> std::io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        let fail_after = inner.fail_lines_after;
        match fail_after {
            Some(0) => {
                inner.fail_lines_after = None;
                return Err(Error::new(ErrorKind::BrokenPipe, "port unplugged"));
            }
            Some(n) => inner.fail_lines_after = Some(n - 1),
            None => {}
        }
        let session = self.session;
        inner.events.push((session, state));
        Ok(())
    }
}

impl Drop for TransceiverLines {
    fn drop(&mut self) {
        self.inner.borrow_mut().closed += 1;
    }
}

impl Timer for SimClock {
    fn hold(&mut self, duration: Duration) {
        let mut inner = self.0.borrow_mut();
        inner.now += duration;
        inner.holds.push(duration);
    }
}

/// Decode line states the way the transceiver does: a reset, then one bit
/// per mark phase, with an idle phase after every bit.
///
/// Returns `None` if the states don't form a valid transmission.
pub fn decode(states: &[LineState]) -> Option<Vec<bool>> {
    if states.len() < 2 {
        return None;
    }
    let (reset, rest) = states.split_at(2);
    if reset != [LineState::RELEASED, LineState::IDLE] || rest.len() % 2 != 0 {
        return None;
    }
    rest.chunks(2)
        .map(|pair| match (pair[0], pair[1]) {
            (LineState::MARK_ONE, LineState::IDLE) => Some(true),
            (LineState::MARK_ZERO, LineState::IDLE) => Some(false),
            _ => None,
        })
        .collect()
}

/// Split 40 decoded bits into header, command word and footer.
pub fn decode_frame(states: &[LineState]) -> Option<(u16, u16, u8)> {
    let bits = decode(states)?;
    if bits.len() != 40 {
        return None;
    }
    let value = |bits: &[bool]| bits.iter().fold(0u16, |acc, &b| (acc << 1) | b as u16);
    Some((
        value(&bits[..16]),
        value(&bits[16..32]),
        value(&bits[32..]) as u8,
    ))
}

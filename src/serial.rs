//! Control lines of a serial port, through the `serialport` crate.

use std::convert::Infallible;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serialport::SerialPort;

use crate::command::Command;
use crate::io::{ControlLines, Error, Session, StdTimer};
use crate::transmitter::LineState;

/// Name of the serial port the transceiver is plugged into.
///
/// A bare number is a COM port number, as printed on PC serial ports;
/// anything else is taken as a device path.
///
/// ## Example
/// ```
/// use cm17a_proto::serial::PortName;
/// let port: PortName = "/dev/ttyUSB0".parse().unwrap();
/// assert_eq!(port.as_str(), "/dev/ttyUSB0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortName(String);

impl PortName {
    /// The device for COM port `number`, counting from 1.
    #[cfg(windows)]
    pub fn from_number(number: u32) -> Self {
        Self(format!(r"\\.\COM{}", number))
    }

    /// The device for COM port `number`, counting from 1.
    #[cfg(not(windows))]
    pub fn from_number(number: u32) -> Self {
        Self(format!("/dev/ttyS{}", number.saturating_sub(1)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PortName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(number) => Ok(Self::from_number(number)),
            Err(_) => Ok(Self(s.to_string())),
        }
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RTS and DTR of an open serial port. No data is ever written to the port.
pub struct SerialLines {
    port: Box<dyn SerialPort>,
    name: PortName,
}

impl SerialLines {
    /// Open the port for exclusive use.
    /// # Errors
    /// Returns the `serialport` error if the port can't be opened.
    pub fn open(name: &PortName) -> serialport::Result<Self> {
        let port = serialport::new(name.as_str(), 9600)
            .timeout(Duration::from_millis(100))
            .open()?;
        debug!("Opened {}", name);
        Ok(Self {
            port,
            name: name.clone(),
        })
    }
}

impl ControlLines for SerialLines {
    // Raise before lowering, DTR before RTS. Between two states the
    // transceiver then never sees both lines low, which would reset it.
    fn set_lines(&mut self, state: LineState) -> io::Result<()> {
        if state.dtr {
            self.port.write_data_terminal_ready(true)?;
        }
        if state.rts {
            self.port.write_request_to_send(true)?;
        }
        if !state.dtr {
            self.port.write_data_terminal_ready(false)?;
        }
        if !state.rts {
            self.port.write_request_to_send(false)?;
        }
        Ok(())
    }
}

impl Drop for SerialLines {
    fn drop(&mut self) {
        debug!("Closing {}", self.name);
    }
}

/// Open `port`, send `command` and close the port.
/// # Errors
/// Returns [`Error::Open`] if the port can't be opened, and
/// [`Error::LineControl`] if it fails during the send.
pub fn send(port: &PortName, command: &Command) -> Result<(), Error> {
    let lines = SerialLines::open(port).map_err(|source| Error::Open {
        source: source.into(),
    })?;
    Session::new(lines, StdTimer::new()).send(command)
}

//! Validated X-10 commands and their encoding into CM17A command words.

use core::fmt;
use core::str::FromStr;

use snafu::ensure;

use crate::types::{CommandWord, Error, Function, HouseCode, InvalidCommandSnafu, UnitCode};

/// A house code, an optional unit and a function.
///
/// `On` and `Off` always carry a unit, `Bright` and `Dim` never do.
/// Use [`crate::parse`] or [`str::parse`] to create one from a token such as `A1ON`.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct Command {
    house: HouseCode,
    unit: Option<UnitCode>,
    function: Function,
}

impl Command {
    /// Create a new command, checking that `unit` is given for exactly the
    /// functions that address a unit.
    /// # Errors
    /// Returns [`Error::InvalidCommand`] if the unit doesn't match the function.
    pub fn new(
        house: HouseCode,
        unit: Option<UnitCode>,
        function: Function,
    ) -> Result<Self, Error> {
        ensure!(unit.is_some() == function.needs_unit(), InvalidCommandSnafu);
        Ok(Self {
            house,
            unit,
            function,
        })
    }

    pub const fn on(house: HouseCode, unit: UnitCode) -> Self {
        Self {
            house,
            unit: Some(unit),
            function: Function::On,
        }
    }

    pub const fn off(house: HouseCode, unit: UnitCode) -> Self {
        Self {
            house,
            unit: Some(unit),
            function: Function::Off,
        }
    }

    pub const fn bright(house: HouseCode) -> Self {
        Self {
            house,
            unit: None,
            function: Function::Bright,
        }
    }

    pub const fn dim(house: HouseCode) -> Self {
        Self {
            house,
            unit: None,
            function: Function::Dim,
        }
    }

    pub const fn house(&self) -> HouseCode {
        self.house
    }

    /// `None` for `Bright` and `Dim`.
    pub const fn unit(&self) -> Option<UnitCode> {
        self.unit
    }

    pub const fn function(&self) -> Function {
        self.function
    }

    /// The command word for this command, see [`encode`].
    pub const fn encode(&self) -> CommandWord {
        let unit_bits = match self.unit {
            Some(unit) => unit.bits(),
            None => 0,
        };
        CommandWord::from_bits(self.house.bits() | unit_bits | self.function.bits())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl fmt::Display for Command {
    /// Formats the command as a canonical token, e.g. `A1ON` or `CDIM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}{}{}", self.house, unit, self.function),
            None => write!(f, "{}{}", self.house, self.function),
        }
    }
}

/// Encode a command into the 16 bit word sent between header and footer.
///
/// The word is the bitwise union of the house, unit and function patterns.
///
/// ## Example
/// ```
/// use cm17a_proto::{encode, Command, HouseCode, UnitCode};
/// let cmd = Command::off(HouseCode::P, UnitCode::U16);
/// assert_eq!(encode(&cmd), 0x3478);
/// ```
pub const fn encode(command: &Command) -> CommandWord {
    command.encode()
}

/// Encode a command given as zero based table positions.
///
/// `unit_index` must be `None` exactly for `Bright` and `Dim`.
/// # Errors
/// Returns the lookup error for an out of range index, or
/// [`Error::InvalidCommand`] if the unit doesn't match the function.
pub fn encode_raw(
    house_index: usize,
    unit_index: Option<usize>,
    function: Function,
) -> Result<CommandWord, Error> {
    let house = HouseCode::from_index(house_index)?;
    let unit = unit_index.map(UnitCode::from_index).transpose()?;
    Ok(Command::new(house, unit, function)?.encode())
}

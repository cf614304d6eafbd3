use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{anychar, digit0};
use nom::combinator::{all_consuming, map_res, value};
use nom::IResult;

use crate::command::Command;
use crate::types::{Error, Function, HouseCode, UnitCode};

/// Parse a command token such as `A1ON`, `p16off`, `CDIM` or `ABRIGHT`.
///
/// The token is a house letter, then either a unit number in [1, 16] or
/// one of the keywords `DIM` and `BRIGHT`. A token with a unit number is
/// an `Off` command when it ends in `OFF`, and an `On` command otherwise,
/// whatever else follows the number. Matching ignores case.
///
/// # Errors
/// Returns [`Error::InvalidHouseCode`] if the first character isn't A to P,
/// and [`Error::InvalidCommand`] if the rest of the token isn't understood.
///
/// ## Example
/// ```
/// use cm17a_proto::{parse, Command, HouseCode, UnitCode};
/// assert_eq!(parse("a3"), Ok(Command::on(HouseCode::A, UnitCode::U3)));
/// assert_eq!(parse("P16OFF"), Ok(Command::off(HouseCode::P, UnitCode::U16)));
/// assert_eq!(parse("CDIM"), Ok(Command::dim(HouseCode::C)));
/// assert!(parse("A17ON").is_err());
/// ```
pub fn parse(token: &str) -> Result<Command, Error> {
    let (rest, house) = house_code(token).map_err(|_| Error::InvalidHouseCode)?;

    if let Some(unit) = unit_code(rest) {
        if has_off_suffix(token) {
            return Ok(Command::off(house, unit));
        }
        return Ok(Command::on(house, unit));
    }

    match dim_or_bright(rest) {
        Ok((_, Function::Dim)) => Ok(Command::dim(house)),
        Ok((_, Function::Bright)) => Ok(Command::bright(house)),
        _ => Err(Error::InvalidCommand),
    }
}

fn house_code(buf: &str) -> IResult<&str, HouseCode> {
    map_res(anychar, HouseCode::from_letter)(buf)
}

fn unit_number(buf: &str) -> IResult<&str, &str> {
    digit0(buf)
}

// An empty or out of range number is not an error yet, the keyword
// forms get a chance at the same input.
fn unit_code(buf: &str) -> Option<UnitCode> {
    let (_, digits) = unit_number(buf).ok()?;
    let number: u8 = digits.parse().ok()?;
    UnitCode::new(number).ok()
}

fn dim_or_bright(buf: &str) -> IResult<&str, Function> {
    all_consuming(alt((
        value(Function::Dim, tag_no_case("DIM")),
        value(Function::Bright, tag_no_case("BRIGHT")),
    )))(buf)
}

// Checked on the whole token, so `A1OFF` and `A1XOFF` both turn the unit off.
fn has_off_suffix(token: &str) -> bool {
    token.len() > 3
        && token
            .get(token.len() - 3..)
            .map_or(false, |suffix| suffix.eq_ignore_ascii_case("OFF"))
}

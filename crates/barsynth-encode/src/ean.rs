//! EAN-13 and EAN-8.

use barsynth_error::{Result, SynthError};
use barsynth_types::tables::{EAN_DIGITS, EAN_GUARD_CENTER, EAN_GUARD_NORMAL, EAN_PARITY};
use barsynth_types::{Direction, ean_check_digit};
use tracing::{debug, trace};

use crate::RULE;
use crate::sink::{WidthSink, emit, require_space};

fn digit_values(symbology: &'static str, data: &str, len: usize) -> Result<Vec<u8>> {
    if data.len() != len {
        return Err(SynthError::invalid_data(symbology, data, "wrong length"));
    }
    if !data.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SynthError::invalid_data(symbology, data, "digits only"));
    }
    Ok(data.bytes().map(|b| b - b'0').collect())
}

/// Append the EAN check digit to `data`.
///
/// Twelve digits in gives an EAN-13 payload, seven gives EAN-8.
pub fn with_ean_check(data: &str) -> Result<String> {
    if !data.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SynthError::invalid_data("EAN", data, "digits only"));
    }
    let digits: Vec<u8> = data.bytes().map(|b| b - b'0').collect();
    let mut out = String::with_capacity(data.len() + 1);
    out.push_str(data);
    out.push(char::from(b'0' + ean_check_digit(&digits)));
    Ok(out)
}

/// Encode a 13-digit EAN-13 payload (check digit included).
///
/// The leading digit is not drawn; it selects the A/B parity of the six
/// left-half digits.
pub fn encode_ean13<S>(sink: &mut S, data: &str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    let digits = digit_values("EAN-13", data, 13)?;
    require_space(sink, "EAN-13")?;
    let mut par = EAN_PARITY[usize::from(digits[0])];
    trace!("{RULE}");
    debug!("EAN-13: {data} ({par:02x})");

    trace!("    encode start guard:");
    emit(sink, EAN_GUARD_NORMAL, Direction::Forward)?;
    for &d in &digits[1..7] {
        let odd = (par >> 5) & 1 == 1;
        trace!("    encode {}{d}:", u8::from(odd));
        let direction = if odd {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        emit(sink, EAN_DIGITS[usize::from(d)], direction)?;
        par <<= 1;
    }
    trace!("    encode center guard:");
    emit(sink, EAN_GUARD_CENTER, Direction::Forward)?;
    for &d in &digits[7..] {
        trace!("    encode 0{d}:");
        emit(sink, EAN_DIGITS[usize::from(d)], Direction::Forward)?;
    }
    trace!("    encode end guard:");
    emit(sink, EAN_GUARD_NORMAL, Direction::Reverse)?;
    trace!("{RULE}");
    Ok(())
}

/// Encode an 8-digit EAN-8 payload (check digit included). All digits use
/// the A set, so no parity table is involved.
pub fn encode_ean8<S>(sink: &mut S, data: &str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    let digits = digit_values("EAN-8", data, 8)?;
    require_space(sink, "EAN-8")?;
    trace!("{RULE}");
    debug!("EAN-8: {data}");

    trace!("    encode start guard:");
    emit(sink, EAN_GUARD_NORMAL, Direction::Forward)?;
    for (i, &d) in digits.iter().enumerate() {
        if i == 4 {
            trace!("    encode center guard:");
            emit(sink, EAN_GUARD_CENTER, Direction::Forward)?;
        }
        trace!("    encode {d}:");
        emit(sink, EAN_DIGITS[usize::from(d)], Direction::Forward)?;
    }
    trace!("    encode end guard:");
    emit(sink, EAN_GUARD_NORMAL, Direction::Reverse)?;
    trace!("{RULE}");
    Ok(())
}

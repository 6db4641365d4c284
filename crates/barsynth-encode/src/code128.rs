//! Code 128, subsets B (printable ASCII) and C (digit pairs).

use barsynth_error::{Result, SynthError};
use barsynth_types::tables::{CODE128, CODE128_START_B, CODE128_START_C, CODE128_STOP};
use barsynth_types::{Direction, code128_checksum};
use tracing::{debug, trace};

use crate::RULE;
use crate::sink::{WidthSink, emit, require_space};

const SYMBOLOGY: &str = "CODE-128";

fn emit_symbol<S>(sink: &mut S, value: u8) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    emit(sink, CODE128[usize::from(value)], Direction::Reverse)
}

/// Subset B symbol value for a byte, or `None` when it has no B mapping.
fn subset_b_value(byte: u8) -> Option<u8> {
    match byte {
        0x20..=0x7f => Some(byte - 0x20),
        _ => None,
    }
}

fn emit_tail<S>(sink: &mut S, chk: u8) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    trace!("    encode checksum: {chk:02x}");
    emit_symbol(sink, chk)?;
    trace!("    encode STOP: {CODE128_STOP:02x}");
    emit_symbol(sink, CODE128_STOP)?;
    trace!("{RULE}");
    Ok(())
}

/// Encode `data` in subset B.
///
/// Bytes outside `0x20..=0x7f` have no subset B symbol and are skipped; they
/// take no checksum position either, so the emitted symbol stays valid but
/// decodes without them.
pub fn encode_code128b<S>(sink: &mut S, data: &str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    require_space(sink, SYMBOLOGY)?;
    trace!("{RULE}");
    debug!("CODE-128(B): {data}");
    trace!("    encode START_B: {CODE128_START_B:02x}");
    emit_symbol(sink, CODE128_START_B)?;

    let mut values = Vec::with_capacity(data.len());
    for byte in data.bytes() {
        let Some(value) = subset_b_value(byte) else {
            trace!("    skip unmapped byte {byte:#04x}");
            continue;
        };
        trace!("    encode '{}': {value:02x}", char::from(byte));
        emit_symbol(sink, value)?;
        values.push(value);
    }

    emit_tail(sink, code128_checksum(CODE128_START_B, values))
}

/// Encode an even-length digit string in subset C, two digits per symbol.
pub fn encode_code128c<S>(sink: &mut S, data: &str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    let bytes = data.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(SynthError::invalid_data(
            SYMBOLOGY,
            data,
            "subset C needs an even number of digits",
        ));
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(SynthError::invalid_data(
            SYMBOLOGY,
            data,
            "subset C encodes digits only",
        ));
    }
    require_space(sink, SYMBOLOGY)?;
    trace!("{RULE}");
    debug!("CODE-128(C): {data}");
    trace!("    encode START_C: {CODE128_START_C:02x}");
    emit_symbol(sink, CODE128_START_C)?;

    let mut values = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let value = (pair[0] - b'0') * 10 + (pair[1] - b'0');
        trace!(
            "    encode '{}{}': {value:02}",
            char::from(pair[0]),
            char::from(pair[1])
        );
        emit_symbol(sink, value)?;
        values.push(value);
    }

    emit_tail(sink, code128_checksum(CODE128_START_C, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(value: u8) -> Vec<u8> {
        CODE128[usize::from(value)].to_pattern(Direction::Reverse)
    }

    #[test]
    fn code128c_double_zero_layout() {
        let mut sink = Vec::new();
        encode_code128c(&mut sink, "00").unwrap();

        let mut expected = pattern(CODE128_START_C);
        expected.extend(pattern(0));
        // checksum = (105 + 1*0) mod 103 = 2
        expected.extend(pattern(2));
        expected.extend(pattern(CODE128_STOP));
        assert_eq!(sink, expected);
    }

    #[test]
    fn code128b_layout_and_checksum() {
        let mut sink = Vec::new();
        encode_code128b(&mut sink, "AB").unwrap();

        let mut expected = pattern(CODE128_START_B);
        expected.extend(pattern(b'A' - 0x20));
        expected.extend(pattern(b'B' - 0x20));
        expected.extend(pattern(102));
        expected.extend(pattern(CODE128_STOP));
        assert_eq!(sink, expected);
    }

    #[test]
    fn code128b_skips_unmapped_bytes() {
        let mut with_ctrl = Vec::new();
        encode_code128b(&mut with_ctrl, "A\tB").unwrap();
        let mut plain = Vec::new();
        encode_code128b(&mut plain, "AB").unwrap();
        assert_eq!(with_ctrl, plain);
    }

    #[test]
    fn symbol_ends_on_its_quiet_space() {
        let mut sink = Vec::new();
        encode_code128b(&mut sink, "x").unwrap();
        assert_eq!(sink.len() % 2, 1);
        assert_eq!(sink.first(), Some(&10));
        assert_eq!(sink.last(), Some(&10));
    }

    #[test]
    fn code128c_rejects_odd_length_and_letters() {
        let mut sink = Vec::new();
        assert!(matches!(
            encode_code128c(&mut sink, "123"),
            Err(SynthError::InvalidData { .. })
        ));
        assert!(matches!(
            encode_code128c(&mut sink, "12a4"),
            Err(SynthError::InvalidData { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn refuses_to_start_on_a_bar() {
        let mut sink = vec![5_u8];
        assert_eq!(
            encode_code128b(&mut sink, "A"),
            Err(SynthError::ColorMisaligned {
                symbology: SYMBOLOGY
            })
        );
    }
}

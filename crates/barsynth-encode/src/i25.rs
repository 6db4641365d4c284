//! Interleaved 2 of 5.

use barsynth_error::{Result, SynthError};
use barsynth_types::Direction;
use barsynth_types::tables::{I25, I25_END, I25_START, i25_widths};
use tracing::{debug, trace};

use crate::RULE;
use crate::sink::{WidthSink, emit, emit_widths, require_space};

const SYMBOLOGY: &str = "I2/5";

/// Encode a digit string as Interleaved 2 of 5.
///
/// Digits are consumed in pairs: the first digit of a pair is carried by the
/// bars, the second by the spaces. An odd-length payload gets a leading `0`
/// so the pairs line up, which the decoder reports as part of the payload.
///
/// Only [`Direction::Forward`] is supported; right-to-left encoding does not
/// reverse the digit order correctly and stays disabled.
pub fn encode_i25<S>(sink: &mut S, data: &str, direction: Direction) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    if direction == Direction::Reverse {
        return Err(SynthError::Unsupported(
            "interleaved 2 of 5 in reverse direction",
        ));
    }
    if !data.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SynthError::invalid_data(SYMBOLOGY, data, "digits only"));
    }
    require_space(sink, SYMBOLOGY)?;
    trace!("{RULE}");
    debug!("Interleaved 2 of 5: {data}");
    trace!("    encode start:");
    emit(sink, I25_START, Direction::Reverse)?;

    let mut digits: Vec<u8> = data.bytes().map(|b| b - b'0').collect();
    if digits.len() % 2 == 1 {
        digits.insert(0, 0);
    }
    for pair in digits.chunks_exact(2) {
        trace!("    encode '{}{}':", pair[0], pair[1]);
        let bars = i25_widths(I25[usize::from(pair[0])]);
        let spaces = i25_widths(I25[usize::from(pair[1])]);
        let mut widths = [0_u8; 10];
        for (j, (&bar, &space)) in bars.iter().zip(&spaces).enumerate() {
            widths[2 * j] = bar;
            widths[2 * j + 1] = space;
        }
        emit_widths(sink, &widths)?;
    }

    trace!("    encode end:");
    emit(sink, I25_END, Direction::Reverse)?;
    trace!("{RULE}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pair_layout() {
        let mut sink = Vec::new();
        encode_i25(&mut sink, "01", Direction::Forward).unwrap();
        // 0 = NNWWN (bars), 1 = WNNNW (spaces)
        let expected = vec![
            10, 1, 1, 1, 1, // start
            1, 2, 1, 1, 2, 1, 2, 1, 1, 2, // pair
            2, 1, 1, 10, // end
        ];
        assert_eq!(sink, expected);
    }

    #[test]
    fn odd_length_gets_leading_zero() {
        let mut odd = Vec::new();
        encode_i25(&mut odd, "123", Direction::Forward).unwrap();
        let mut padded = Vec::new();
        encode_i25(&mut padded, "0123", Direction::Forward).unwrap();
        assert_eq!(odd, padded);
    }

    #[test]
    fn reverse_direction_is_disabled() {
        let mut sink = Vec::new();
        assert!(matches!(
            encode_i25(&mut sink, "12", Direction::Reverse),
            Err(SynthError::Unsupported(_))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn rejects_non_digits() {
        let mut sink = Vec::new();
        assert!(matches!(
            encode_i25(&mut sink, "1a", Direction::Forward),
            Err(SynthError::InvalidData { .. })
        ));
    }
}

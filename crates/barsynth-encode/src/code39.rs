//! Code 39 with fixed 2:1 wide/narrow ratio and no check character.

use barsynth_error::Result;
use barsynth_types::tables::{CODE39_SENTINEL, code39_pattern, code39_widths};
use barsynth_types::{Direction, PackedWord};
use tracing::{debug, trace};

use crate::RULE;
use crate::sink::{WidthSink, emit, emit_widths, require_space};

const SYMBOLOGY: &str = "CODE-39";

/// Quiet zone before the start sentinel and after the stop sentinel.
const QUIET: u8 = 10;

/// Normal inter-character gap.
const GAP: u8 = 1;

/// Fold a payload onto the Code 39 character set.
///
/// Lowercase letters are uppercased, `[A-Z0-9 $%+./-]` is kept and anything
/// else is dropped. Applying it twice changes nothing.
pub fn normalize_code39(data: &str) -> String {
    data.chars()
        .filter_map(|c| {
            let c = c.to_ascii_uppercase();
            match c {
                'A'..='Z' | '0'..='9' | ' ' | '$' | '%' | '+' | '-' | '.' | '/' => Some(c),
                _ => None,
            }
        })
        .collect()
}

fn encode_char39<S>(sink: &mut S, c: u8, gap: u8) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    let Some(raw) = code39_pattern(c) else {
        trace!("    skip unmapped '{}'", char::from(c));
        return Ok(());
    };
    let mut widths = [0_u8; 10];
    widths[..9].copy_from_slice(&code39_widths(raw));
    widths[9] = gap;
    trace!("    encode '{}': {raw:03x}", char::from(c));
    emit_widths(sink, &widths)
}

/// Encode `data` between `*` sentinels.
///
/// Callers that need an exact payload match normalize first; characters
/// without a pattern (and literal `*`) are silently skipped.
pub fn encode_code39<S>(sink: &mut S, data: &str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    require_space(sink, SYMBOLOGY)?;
    trace!("{RULE}");
    debug!("CODE-39: {data}");
    emit(sink, PackedWord::new(u64::from(QUIET)), Direction::Forward)?;
    encode_char39(sink, CODE39_SENTINEL, GAP)?;
    for c in data.bytes().filter(|&c| c != CODE39_SENTINEL) {
        encode_char39(sink, c, GAP)?;
    }
    encode_char39(sink, CODE39_SENTINEL, QUIET)?;
    trace!("{RULE}");
    Ok(())
}

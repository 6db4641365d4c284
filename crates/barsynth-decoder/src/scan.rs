//! Backward symbol parsers.
//!
//! Every parser receives the element history ending with a quiet-zone space
//! and walks back from it: stop pattern first, then symbol characters, until
//! it meets the start pattern and its leading quiet zone. Widths are exact
//! module counts, so matching is table lookup, not thresholding.

use std::collections::HashMap;
use std::sync::LazyLock;

use barsynth_types::tables::{
    CODE128, CODE128_CODE_A, CODE128_CODE_B, CODE128_CODE_C, CODE128_FNC1, CODE128_FNC2,
    CODE128_FNC3, CODE128_SHIFT, CODE128_START_A,
    CODE128_START_B, CODE128_START_C, CODE128_STOP, CODE39, CODE39_FIRST, CODE39_SENTINEL,
    EAN_DIGITS, EAN_PARITY, I25, code39_widths, i25_widths,
};
use barsynth_types::{
    Decoded, Direction, QUIET_ZONE, SymbolType, code128_checksum, ean_check_digit,
};

/// Result of one parser on one history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A complete, checksum-valid symbol.
    Found(Decoded),
    /// The terminal pattern matched but the rest did not.
    Terminal,
    /// Not this symbology.
    NoMatch,
}

fn is_quiet(width: u8) -> bool {
    width >= QUIET_ZONE
}

/// Try every symbology against `h`, whose last element is a quiet space.
pub(crate) fn scan(h: &[u8]) -> Scan {
    let mut terminal = false;
    for parser in [scan_code128, scan_code39, scan_i25, scan_ean13, scan_ean8] {
        match parser(h) {
            Scan::Found(decoded) => return Scan::Found(decoded),
            Scan::Terminal => terminal = true,
            Scan::NoMatch => {}
        }
    }
    if terminal { Scan::Terminal } else { Scan::NoMatch }
}

// ---------------------------------------------------------------------------
// Code 128
// ---------------------------------------------------------------------------

/// Six-element character patterns, START words included (quiet stripped).
static CODE128_LOOKUP: LazyLock<HashMap<Vec<u8>, u8>> = LazyLock::new(|| {
    (0..=CODE128_START_C)
        .map(|value| {
            let mut pattern = CODE128[usize::from(value)].to_pattern(Direction::Reverse);
            if pattern.len() == 7 {
                pattern.remove(0);
            }
            (pattern, value)
        })
        .collect()
});

/// STOP without its trailing quiet zone.
static CODE128_STOP_BARS: LazyLock<Vec<u8>> = LazyLock::new(|| {
    let mut pattern = CODE128[usize::from(CODE128_STOP)].to_pattern(Direction::Reverse);
    pattern.pop();
    pattern
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    const fn shifted(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
            Self::C => Self::C,
        }
    }
}

/// Assemble the payload from symbol values (checksum excluded).
fn code128_payload(start: u8, values: &[u8]) -> Option<String> {
    let mut set = match start {
        CODE128_START_A => CodeSet::A,
        CODE128_START_B => CodeSet::B,
        _ => CodeSet::C,
    };
    let mut shift = false;
    let mut out = String::with_capacity(values.len() * 2);
    for &v in values {
        let current = if shift { set.shifted() } else { set };
        shift = false;
        match (current, v) {
            (CodeSet::C, 0..=99) => {
                out.push(char::from(b'0' + v / 10));
                out.push(char::from(b'0' + v % 10));
            }
            (CodeSet::A, 0..=63) | (CodeSet::B, 0..=95) => out.push(char::from(v + 0x20)),
            (CodeSet::A, 64..=95) => out.push(char::from(v - 64)),
            (CodeSet::A | CodeSet::B, CODE128_SHIFT) => shift = true,
            (CodeSet::A | CodeSet::B, CODE128_CODE_C) => set = CodeSet::C,
            (CodeSet::A | CodeSet::C, CODE128_CODE_B) => set = CodeSet::B,
            (CodeSet::B | CodeSet::C, CODE128_CODE_A) => set = CodeSet::A,
            // Function codes carry no data characters. FNC4 shares its value
            // with the switch to the current set.
            (_, CODE128_FNC1 | CODE128_FNC2 | CODE128_FNC3)
            | (CodeSet::A, CODE128_CODE_A)
            | (CodeSet::B, CODE128_CODE_B) => {}
            _ => return None,
        }
    }
    Some(out)
}

fn scan_code128(h: &[u8]) -> Scan {
    let n = h.len();
    let stop = CODE128_STOP_BARS.as_slice();
    if n < stop.len() + 1 || &h[n - 1 - stop.len()..n - 1] != stop {
        return Scan::NoMatch;
    }
    let mut end = n - 1 - stop.len();
    let mut values = Vec::new();
    loop {
        if end < 7 {
            return Scan::Terminal;
        }
        let Some(&value) = CODE128_LOOKUP.get(&h[end - 6..end]) else {
            return Scan::Terminal;
        };
        if value >= CODE128_START_A {
            if !is_quiet(h[end - 7]) {
                return Scan::Terminal;
            }
            values.reverse();
            let Some((&chk, data)) = values.split_last() else {
                return Scan::Terminal;
            };
            if code128_checksum(value, data.iter().copied()) != chk {
                return Scan::Terminal;
            }
            return match code128_payload(value, data) {
                Some(payload) => Scan::Found(Decoded::new(SymbolType::Code128, payload)),
                None => Scan::Terminal,
            };
        }
        values.push(value);
        end -= 6;
    }
}

// ---------------------------------------------------------------------------
// Code 39
// ---------------------------------------------------------------------------

static CODE39_LOOKUP: LazyLock<HashMap<[u8; 9], u8>> = LazyLock::new(|| {
    CODE39
        .iter()
        .zip(CODE39_FIRST..)
        .filter(|&(&raw, _)| raw != 0)
        .map(|(&raw, c)| (code39_widths(raw), c))
        .collect()
});

fn code39_char(widths: &[u8]) -> Option<u8> {
    let key: [u8; 9] = widths.try_into().ok()?;
    CODE39_LOOKUP.get(&key).copied()
}

const CODE39_GAP: u8 = 1;

fn scan_code39(h: &[u8]) -> Scan {
    let n = h.len();
    if n < 10 || code39_char(&h[n - 10..n - 1]) != Some(CODE39_SENTINEL) {
        return Scan::NoMatch;
    }
    let mut begin = n - 10;
    let mut chars = Vec::new();
    loop {
        if begin < 11 || h[begin - 1] != CODE39_GAP {
            return Scan::Terminal;
        }
        begin -= 10;
        let Some(c) = code39_char(&h[begin..begin + 9]) else {
            return Scan::Terminal;
        };
        if c == CODE39_SENTINEL {
            if begin == 0 || !is_quiet(h[begin - 1]) {
                return Scan::Terminal;
            }
            chars.reverse();
            let payload = chars.into_iter().map(char::from).collect::<String>();
            return Scan::Found(Decoded::new(SymbolType::Code39, payload));
        }
        chars.push(c);
    }
}

// ---------------------------------------------------------------------------
// Interleaved 2 of 5
// ---------------------------------------------------------------------------

static I25_LOOKUP: LazyLock<HashMap<[u8; 5], u8>> = LazyLock::new(|| {
    I25.iter()
        .zip(0_u8..)
        .map(|(&pattern, digit)| (i25_widths(pattern), digit))
        .collect()
});

const I25_START_BARS: [u8; 4] = [1, 1, 1, 1];
const I25_END_BARS: [u8; 3] = [2, 1, 1];

fn i25_pair(chunk: &[u8]) -> Option<(u8, u8)> {
    let mut bars = [0_u8; 5];
    let mut spaces = [0_u8; 5];
    for j in 0..5 {
        bars[j] = chunk[2 * j];
        spaces[j] = chunk[2 * j + 1];
    }
    Some((*I25_LOOKUP.get(&bars)?, *I25_LOOKUP.get(&spaces)?))
}

fn scan_i25(h: &[u8]) -> Scan {
    let n = h.len();
    if n < 4 || h[n - 4..n - 1] != I25_END_BARS {
        return Scan::NoMatch;
    }
    let mut end = n - 4;
    let mut pairs = Vec::new();
    loop {
        if end >= 5 && h[end - 4..end] == I25_START_BARS && is_quiet(h[end - 5]) {
            if pairs.is_empty() {
                return Scan::Terminal;
            }
            pairs.reverse();
            let payload = pairs
                .into_iter()
                .flat_map(|(d0, d1)| [char::from(b'0' + d0), char::from(b'0' + d1)])
                .collect::<String>();
            return Scan::Found(Decoded::new(SymbolType::I25, payload));
        }
        if end < 10 {
            return Scan::Terminal;
        }
        let Some(pair) = i25_pair(&h[end - 10..end]) else {
            return Scan::Terminal;
        };
        pairs.push(pair);
        end -= 10;
    }
}

// ---------------------------------------------------------------------------
// EAN-13 / EAN-8
// ---------------------------------------------------------------------------

/// Digit lookup for one parity set.
static EAN_A: LazyLock<HashMap<Vec<u8>, u8>> =
    LazyLock::new(|| ean_lookup(Direction::Forward));
static EAN_B: LazyLock<HashMap<Vec<u8>, u8>> =
    LazyLock::new(|| ean_lookup(Direction::Reverse));

fn ean_lookup(direction: Direction) -> HashMap<Vec<u8>, u8> {
    EAN_DIGITS
        .iter()
        .zip(0_u8..)
        .map(|(word, digit)| (word.to_pattern(direction), digit))
        .collect()
}

const EAN_SIDE_GUARD: [u8; 3] = [1, 1, 1];
const EAN_CENTER_GUARD: [u8; 5] = [1, 1, 1, 1, 1];
const EAN13_ELEMENTS: usize = 61;
const EAN8_ELEMENTS: usize = 45;

fn ean_frame(s: &[u8], half: usize) -> bool {
    let center = 4 + 4 * half;
    let right_end = center + 5 + 4 * half;
    is_quiet(s[0])
        && s[1..4] == EAN_SIDE_GUARD
        && s[center..center + 5] == EAN_CENTER_GUARD
        && s[right_end..right_end + 3] == EAN_SIDE_GUARD
}

fn ean_right_half(s: &[u8], half: usize, out: &mut Vec<u8>) -> Option<()> {
    let start = 4 + 4 * half + 5;
    for chunk in s[start..start + 4 * half].chunks_exact(4) {
        out.push(*EAN_A.get(chunk)?);
    }
    Some(())
}

fn ean_payload(digits: &[u8]) -> String {
    digits.iter().map(|&d| char::from(b'0' + d)).collect()
}

fn ean_terminal(h: &[u8]) -> bool {
    let n = h.len();
    n >= 4 && h[n - 4..n - 1] == EAN_SIDE_GUARD
}

fn scan_ean13(h: &[u8]) -> Scan {
    if !ean_terminal(h) {
        return Scan::NoMatch;
    }
    let n = h.len();
    if n < EAN13_ELEMENTS {
        return Scan::Terminal;
    }
    let s = &h[n - EAN13_ELEMENTS..];
    if !ean_frame(s, 6) {
        return Scan::Terminal;
    }
    let mut digits = vec![0_u8];
    let mut parity = 0_u8;
    for chunk in s[4..28].chunks_exact(4) {
        parity <<= 1;
        if let Some(&d) = EAN_A.get(chunk) {
            parity |= 1;
            digits.push(d);
        } else if let Some(&d) = EAN_B.get(chunk) {
            digits.push(d);
        } else {
            return Scan::Terminal;
        }
    }
    let Some((_, first)) = EAN_PARITY.iter().zip(0_u8..).find(|&(&p, _)| p == parity) else {
        return Scan::Terminal;
    };
    digits[0] = first;
    if ean_right_half(s, 6, &mut digits).is_none() {
        return Scan::Terminal;
    }
    if ean_check_digit(&digits[..12]) != digits[12] {
        return Scan::Terminal;
    }
    Scan::Found(Decoded::new(SymbolType::Ean13, ean_payload(&digits)))
}

fn scan_ean8(h: &[u8]) -> Scan {
    if !ean_terminal(h) {
        return Scan::NoMatch;
    }
    let n = h.len();
    if n < EAN8_ELEMENTS {
        return Scan::Terminal;
    }
    let s = &h[n - EAN8_ELEMENTS..];
    if !ean_frame(s, 4) {
        return Scan::Terminal;
    }
    let mut digits = Vec::with_capacity(8);
    for chunk in s[4..20].chunks_exact(4) {
        let Some(&d) = EAN_A.get(chunk) else {
            return Scan::Terminal;
        };
        digits.push(d);
    }
    if ean_right_half(s, 4, &mut digits).is_none() {
        return Scan::Terminal;
    }
    if ean_check_digit(&digits[..7]) != digits[7] {
        return Scan::Terminal;
    }
    Scan::Found(Decoded::new(SymbolType::Ean8, ean_payload(&digits)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code128_lookup_covers_all_characters() {
        assert_eq!(CODE128_LOOKUP.len(), usize::from(CODE128_START_C) + 1);
        assert_eq!(CODE128_STOP_BARS.as_slice(), &[2, 3, 3, 1, 1, 1, 2]);
    }

    #[test]
    fn code128_payload_switches_sets() {
        // B "A", CODE_C, 12, CODE_A, ctrl-A (65)
        let values = [33, CODE128_CODE_C, 12, CODE128_CODE_A, 65];
        assert_eq!(
            code128_payload(CODE128_START_B, &values).as_deref(),
            Some("A12\u{1}")
        );
    }

    #[test]
    fn code128_payload_shift_applies_once() {
        // A: SHIFT then 'a' (65 in set B), then 65 again in set A
        let values = [CODE128_SHIFT, 65, 65];
        assert_eq!(
            code128_payload(CODE128_START_A, &values).as_deref(),
            Some("a\u{1}")
        );
    }

    #[test]
    fn code128_payload_skips_function_codes() {
        let values = [CODE128_FNC1, 33, CODE128_FNC3, CODE128_CODE_B, 34, CODE128_FNC2];
        assert_eq!(
            code128_payload(CODE128_START_B, &values).as_deref(),
            Some("AB")
        );
    }

    #[test]
    fn code128_payload_rejects_start_values() {
        assert_eq!(code128_payload(CODE128_START_C, &[CODE128_START_A]), None);
    }

    #[test]
    fn lookups_are_complete() {
        assert_eq!(I25_LOOKUP.len(), 10);
        assert_eq!(EAN_A.len(), 10);
        assert_eq!(EAN_B.len(), 10);
        assert_eq!(CODE39_LOOKUP.get(&code39_widths(0x094)), Some(&b'*'));
    }

    #[test]
    fn noise_ending_in_guard_is_only_terminal() {
        let h = [3, 9, 4, 1, 1, 1, 12];
        assert_eq!(scan(&h), Scan::Terminal);
    }

    #[test]
    fn i25_frame_without_pairs_is_not_a_symbol() {
        let h = [10, 1, 1, 1, 1, 2, 1, 1, 10];
        assert_eq!(scan_i25(&h), Scan::Terminal);
    }

    #[test]
    fn plain_quiet_is_no_match() {
        assert_eq!(scan(&[5, 6, 3, 10]), Scan::NoMatch);
    }
}

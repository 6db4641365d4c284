//! Symbology tables.
//!
//! Width words are [`PackedWord`]s; Code 39 and Interleaved 2-of-5 keep
//! their native narrow/wide bit patterns and expand through helpers here.

use crate::packed::PackedWord;

const fn w(raw: u64) -> PackedWord {
    PackedWord::new(raw)
}

// ---------------------------------------------------------------------------
// Code 128
// ---------------------------------------------------------------------------

pub const CODE128_FNC3: u8 = 0x60;
pub const CODE128_FNC2: u8 = 0x61;
pub const CODE128_SHIFT: u8 = 0x62;
pub const CODE128_CODE_C: u8 = 0x63;
pub const CODE128_CODE_B: u8 = 0x64;
pub const CODE128_CODE_A: u8 = 0x65;
pub const CODE128_FNC1: u8 = 0x66;
pub const CODE128_START_A: u8 = 0x67;
pub const CODE128_START_B: u8 = 0x68;
pub const CODE128_START_C: u8 = 0x69;
pub const CODE128_STOP: u8 = 0x6a;

/// Checksum modulus.
pub const CODE128_MODULUS: u32 = 103;

/// Code 128 symbol words, emitted in [`Direction::Reverse`](crate::Direction).
///
/// Values `0x00..=0x66` are six elements of eleven modules. The three START
/// words carry a leading quiet zone and STOP carries the trailing one.
pub const CODE128: [PackedWord; 107] = [
    w(0x212222), w(0x222122), w(0x222221), w(0x121223), // 0x00
    w(0x121322), w(0x131222), w(0x122213), w(0x122312), // 0x04
    w(0x132212), w(0x221213), w(0x221312), w(0x231212), // 0x08
    w(0x112232), w(0x122132), w(0x122231), w(0x113222), // 0x0c
    w(0x123122), w(0x123221), w(0x223211), w(0x221132), // 0x10
    w(0x221231), w(0x213212), w(0x223112), w(0x312131), // 0x14
    w(0x311222), w(0x321122), w(0x321221), w(0x312212), // 0x18
    w(0x322112), w(0x322211), w(0x212123), w(0x212321), // 0x1c
    w(0x232121), w(0x111323), w(0x131123), w(0x131321), // 0x20
    w(0x112313), w(0x132113), w(0x132311), w(0x211313), // 0x24
    w(0x231113), w(0x231311), w(0x112133), w(0x112331), // 0x28
    w(0x132131), w(0x113123), w(0x113321), w(0x133121), // 0x2c
    w(0x313121), w(0x211331), w(0x231131), w(0x213113), // 0x30
    w(0x213311), w(0x213131), w(0x311123), w(0x311321), // 0x34
    w(0x331121), w(0x312113), w(0x312311), w(0x332111), // 0x38
    w(0x314111), w(0x221411), w(0x431111), w(0x111224), // 0x3c
    w(0x111422), w(0x121124), w(0x121421), w(0x141122), // 0x40
    w(0x141221), w(0x112214), w(0x112412), w(0x122114), // 0x44
    w(0x122411), w(0x142112), w(0x142211), w(0x241211), // 0x48
    w(0x221114), w(0x413111), w(0x241112), w(0x134111), // 0x4c
    w(0x111242), w(0x121142), w(0x121241), w(0x114212), // 0x50
    w(0x124112), w(0x124211), w(0x411212), w(0x421112), // 0x54
    w(0x421211), w(0x212141), w(0x214121), w(0x412121), // 0x58
    w(0x111143), w(0x111341), w(0x131141), w(0x114113), // 0x5c
    w(0x114311), w(0x411113), w(0x411311), w(0x113141), // 0x60
    w(0x114131), w(0x311141), w(0x411131), // 0x64
    w(0xa211412), w(0xa211214), w(0xa211232), // START_A..=START_C
    w(0x2331112a), // STOP
];

// ---------------------------------------------------------------------------
// Code 39
// ---------------------------------------------------------------------------

/// First character covered by [`CODE39`].
pub const CODE39_FIRST: u8 = 0x20;

/// Nine-bit narrow/wide patterns for `0x20..=0x5a`, bit 8 first.
///
/// Zero entries are characters Code 39 cannot represent.
pub const CODE39: [u16; 59] = [
    0x0c4, 0x000, 0x000, 0x000, 0x0a8, 0x02a, 0x000, 0x000, // 0x20
    0x000, 0x000, 0x094, 0x08a, 0x000, 0x085, 0x184, 0x0a2, // 0x28
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, // 0x30
    0x124, 0x064, 0x000, 0x000, 0x000, 0x000, 0x000, 0x000, // 0x38
    0x000, 0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00d, // 0x40
    0x10c, 0x04c, 0x01c, 0x103, 0x043, 0x142, 0x013, 0x112, // 0x48
    0x052, 0x007, 0x106, 0x046, 0x016, 0x181, 0x0c1, 0x1c0, // 0x50
    0x091, 0x190, 0x0d0, // 0x58
];

/// Code 39 start/stop sentinel.
pub const CODE39_SENTINEL: u8 = b'*';

/// Look up the pattern for `c`, or `None` when it is unmapped.
pub fn code39_pattern(c: u8) -> Option<u16> {
    let idx = usize::from(c.checked_sub(CODE39_FIRST)?);
    CODE39.get(idx).copied().filter(|&raw| raw != 0)
}

/// Expand a nine-bit pattern into its element widths (set bit -> 2).
pub fn code39_widths(raw: u16) -> [u8; 9] {
    let mut out = [1; 9];
    for (j, slot) in out.iter_mut().enumerate() {
        if raw & (0x100 >> j) != 0 {
            *slot = 2;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Interleaved 2 of 5
// ---------------------------------------------------------------------------

/// Five-bit narrow/wide patterns per digit, bit 4 first.
pub const I25: [u8; 10] = [0x06, 0x11, 0x09, 0x18, 0x05, 0x14, 0x0c, 0x03, 0x12, 0x0a];

/// Forward start word: quiet zone then four narrow elements.
pub const I25_START: PackedWord = w(0xa1111);

/// Forward end word: wide bar, narrow space, narrow bar, quiet zone.
pub const I25_END: PackedWord = w(0x211a);

/// Expand a five-bit pattern into its element widths (set bit -> 2).
pub fn i25_widths(pattern: u8) -> [u8; 5] {
    let mut out = [1; 5];
    for (j, slot) in out.iter_mut().enumerate() {
        if pattern & (0x10 >> j) != 0 {
            *slot = 2;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// EAN / UPC
// ---------------------------------------------------------------------------

/// Digit words. Forward gives the A (odd parity) set, reverse the B set;
/// right-half digits reuse the forward widths starting on a bar.
pub const EAN_DIGITS: [PackedWord; 10] = [
    w(0x1123), w(0x1222), w(0x2212), w(0x1141), w(0x2311),
    w(0x1321), w(0x4111), w(0x2131), w(0x3121), w(0x2113),
];

/// Normal start/end guard, with its quiet zone in the low nibble.
pub const EAN_GUARD_NORMAL: PackedWord = w(0x1117);
/// Center guard.
pub const EAN_GUARD_CENTER: PackedWord = w(0x11111);

/// EAN-13 left-half parity per leading digit; six bits read high to low,
/// set bit selects the A set.
pub const EAN_PARITY: [u8; 10] = [
    0x3f, // AAAAAA
    0x34, // AABABB
    0x32, // AABBAB
    0x31, // AABBBA
    0x2c, // ABAABB
    0x26, // ABBAAB
    0x23, // ABBBAA
    0x2a, // ABABAB
    0x29, // ABABBA
    0x25, // ABBABA
];

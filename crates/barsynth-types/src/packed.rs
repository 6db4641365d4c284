//! Run-length code words packed one element width per nibble.
//!
//! Tables are written as hex literals whose digits read like the element
//! widths they describe (`0x212222` is bar 2, space 1, bar 2, ...). The
//! [`Direction`] decides which end of the word is emitted first.

use std::fmt;

/// Physical emission order for a [`PackedWord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Least-significant nibble first.
    Forward,
    /// Most-significant non-zero nibble first.
    Reverse,
}

/// A sequence of element widths, one per 4-bit nibble.
///
/// Zero nibbles at either end are padding, not elements. Nibble `0xA` is
/// the literal width 10 used for quiet zones in start/stop words.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedWord(u64);

impl PackedWord {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Iterate over the element widths in `direction` order.
    pub const fn widths(self, direction: Direction) -> Widths {
        let mut word = self.0;
        if matches!(direction, Direction::Reverse) && word != 0 {
            while word >> 60 == 0 {
                word <<= 4;
            }
        }
        Widths { word, direction }
    }

    /// Expand into an ordered width pattern.
    pub fn to_pattern(self, direction: Direction) -> Vec<u8> {
        self.widths(direction).collect()
    }

    /// Number of elements in the word, padding excluded.
    pub fn len(self) -> usize {
        self.widths(Direction::Reverse).count()
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Total module count of the word.
    pub fn modules(self) -> u32 {
        self.widths(Direction::Reverse).map(u32::from).sum()
    }
}

impl fmt::Debug for PackedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedWord({:#x})", self.0)
    }
}

/// Iterator over the widths of a [`PackedWord`].
#[derive(Debug, Clone)]
pub struct Widths {
    word: u64,
    direction: Direction,
}

impl Iterator for Widths {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.word == 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let w = match self.direction {
            Direction::Forward => {
                let w = (self.word & 0xf) as u8;
                self.word >>= 4;
                w
            }
            Direction::Reverse => {
                let w = (self.word >> 60) as u8;
                self.word <<= 4;
                w
            }
        };
        Some(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_reads_low_nibble_first() {
        let w = PackedWord::new(0x1117);
        assert_eq!(w.to_pattern(Direction::Forward), vec![7, 1, 1, 1]);
    }

    #[test]
    fn reverse_normalizes_then_reads_high_nibble_first() {
        let w = PackedWord::new(0x1117);
        assert_eq!(w.to_pattern(Direction::Reverse), vec![1, 1, 1, 7]);
    }

    #[test]
    fn quiet_marker_is_literal_ten() {
        let start_b = PackedWord::new(0xa21_1214);
        assert_eq!(
            start_b.to_pattern(Direction::Reverse),
            vec![10, 2, 1, 1, 2, 1, 4]
        );
        let stop = PackedWord::new(0x2331_112a);
        assert_eq!(
            stop.to_pattern(Direction::Reverse),
            vec![2, 3, 3, 1, 1, 1, 2, 10]
        );
    }

    #[test]
    fn trailing_zero_nibbles_are_padding() {
        let w = PackedWord::new(0x2130);
        assert_eq!(w.to_pattern(Direction::Reverse), vec![2, 1, 3]);
        assert_eq!(w.len(), 3);
        assert!(!w.is_empty());
        assert!(PackedWord::new(0).is_empty());
        assert!(PackedWord::new(0).widths(Direction::Reverse).next().is_none());
    }

    #[test]
    fn modules_sum_widths() {
        assert_eq!(PackedWord::new(0x212222).modules(), 11);
        assert_eq!(PackedWord::new(0x212222).len(), 6);
    }
}

//! Shared vocabulary for the barsynth crates: symbol types, element colors,
//! packed width words and the symbology tables both the encoders and the
//! reference decoder are built from.

pub mod checksum;
pub mod packed;
pub mod symbol;
pub mod tables;

pub use checksum::{code128_checksum, ean_check_digit};
pub use packed::{Direction, PackedWord, Widths};
pub use symbol::{Color, Decoded, SymbolType};

/// Narrowest space the reference decoder accepts as a quiet zone.
pub const QUIET_ZONE: u8 = 7;

/// Widest element the junk injector produces.
pub const MAX_JUNK_WIDTH: u8 = 20;

//! Width-sequence encoders.
//!
//! Each encoder turns a payload into the exact bar/space element widths a
//! scan of the printed symbol would produce and pushes them, one at a time,
//! into a [`WidthSink`]. Checksums and parity are computed here; whether
//! they appear in the decoded payload is up to the symbology.

pub mod code128;
pub mod code39;
pub mod ean;
pub mod i25;
pub mod sink;

pub use code128::{encode_code128b, encode_code128c};
pub use code39::{encode_code39, normalize_code39};
pub use ean::{encode_ean8, encode_ean13, with_ean_check};
pub use i25::encode_i25;
pub use sink::{WidthSink, emit, emit_widths};

/// Separator printed around each symbol at trace level.
pub(crate) const RULE: &str = "----------------------------------------------------------";

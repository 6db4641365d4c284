//! Synthetic-signal test oracle for barcode decoders.
//!
//! A [`FuzzDriver`] draws seeded payloads, encodes them as element widths
//! into a [`ScanContext`], and the [`ExpectationOracle`] checks that every
//! symbol decodes exactly once, in order, with the right payload, while the
//! [`JunkInjector`] noise between symbols decodes as nothing.

pub mod context;
pub mod driver;
pub mod junk;
pub mod oracle;
pub mod payload;

pub use context::ScanContext;
pub use driver::{DEFAULT_JUNK_LEN, DEFAULT_SEED, DriverConfig, FuzzDriver};
pub use junk::JunkInjector;
pub use oracle::{Expectation, ExpectationOracle};

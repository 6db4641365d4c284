//! Decoding-engine capability and a reference implementation.
//!
//! The harness only ever talks to a [`Decoder`]. [`ModuleDecoder`] is an
//! exact-module engine good enough to close the loop without a native
//! scanner library: it recognizes the five linear symbologies the encoders
//! produce, validates their check characters, and stays quiet on noise.

pub mod module;
mod scan;
pub mod traits;

pub use module::ModuleDecoder;
pub use traits::Decoder;

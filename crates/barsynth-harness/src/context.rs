use barsynth_decoder::Decoder;
use barsynth_encode::WidthSink;
use barsynth_error::Result;
use barsynth_types::{Color, SymbolType};

use crate::oracle::ExpectationOracle;

/// Explicit per-run state: the decoding engine plus the oracle it reports to.
///
/// Every width pushed through the [`WidthSink`] impl goes to the decoder;
/// any result comes back synchronously and is checked before `put` returns,
/// so a violation surfaces at the exact element that caused it.
pub struct ScanContext {
    decoder: Box<dyn Decoder>,
    oracle: ExpectationOracle,
    elements: u64,
}

impl ScanContext {
    pub fn new(decoder: Box<dyn Decoder>, seed: u32) -> Self {
        Self {
            decoder,
            oracle: ExpectationOracle::new(seed),
            elements: 0,
        }
    }

    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }

    pub const fn oracle(&self) -> &ExpectationOracle {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut ExpectationOracle {
        &mut self.oracle
    }

    /// Total widths fed to the decoder.
    pub const fn elements(&self) -> u64 {
        self.elements
    }

    /// Arm (or, with [`SymbolType::None`], disarm) the oracle.
    pub fn expect(&mut self, symbol: SymbolType, data: Option<&str>) -> Result<()> {
        self.oracle.expect(symbol, data)?;
        Ok(())
    }
}

impl WidthSink for ScanContext {
    fn color(&self) -> Color {
        self.decoder.color()
    }

    fn put(&mut self, width: u8) -> Result<()> {
        self.elements += 1;
        if let Some(decoded) = self.decoder.decode_width(width) {
            self.oracle.observe(&decoded)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ScanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanContext")
            .field("decoder", &self.decoder.name())
            .field("oracle", &self.oracle)
            .field("elements", &self.elements)
            .finish()
    }
}

//! Single-slot expectation oracle.
//!
//! The oracle holds at most one pending expectation. Setting a new one while
//! the previous is still armed means the previous symbol never decoded;
//! a reportable decode while idle means the decoder invented a symbol.
//! Both are fatal, as is any type or payload disagreement.

use barsynth_error::OracleViolation;
use barsynth_types::{Decoded, SymbolType};
use tracing::trace;

/// What the next reportable decode must be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub symbol: SymbolType,
    /// `None` accepts any payload of the right type.
    pub data: Option<String>,
}

impl Expectation {
    fn accepts(&self, decoded: &Decoded) -> bool {
        self.symbol == decoded.symbol
            && self.data.as_deref().is_none_or(|data| data == decoded.data)
    }
}

/// Oracle state: idle, or armed with exactly one expectation.
#[derive(Debug, Clone, Default)]
pub struct ExpectationOracle {
    pending: Option<Expectation>,
    seed: u32,
    matched: u64,
}

impl ExpectationOracle {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Seed echoed in violation reports.
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Number of decodes that satisfied an expectation so far.
    pub const fn matched(&self) -> u64 {
        self.matched
    }

    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Arm the slot for the next symbol.
    ///
    /// [`SymbolType::None`] disarms it instead, which is how the driver
    /// asserts that the last symbol of a pass was consumed.
    pub fn expect(
        &mut self,
        symbol: SymbolType,
        data: Option<&str>,
    ) -> Result<(), OracleViolation> {
        if let Some(stale) = self.pending.take() {
            return Err(OracleViolation::Missing {
                symbol: stale.symbol.name(),
                data: stale.data,
                seed: self.seed,
            });
        }
        if symbol != SymbolType::None {
            self.pending = Some(Expectation {
                symbol,
                data: data.map(str::to_owned),
            });
        }
        Ok(())
    }

    /// Check one decoder result against the slot.
    ///
    /// Partial and other non-reportable results are ignored.
    pub fn observe(&mut self, decoded: &Decoded) -> Result<(), OracleViolation> {
        if !decoded.symbol.is_reportable() {
            trace!(symbol = %decoded.symbol, "ignored");
            return Ok(());
        }
        let Some(expected) = self.pending.take() else {
            return Err(OracleViolation::Unexpected {
                symbol: decoded.symbol.name(),
                data: decoded.data.clone(),
                seed: self.seed,
            });
        };
        if !expected.accepts(decoded) {
            return Err(OracleViolation::Mismatch {
                expected_symbol: expected.symbol.name(),
                expected_data: expected.data,
                observed_symbol: decoded.symbol.name(),
                observed_data: decoded.data.clone(),
                seed: self.seed,
            });
        }
        trace!("decode {decoded}");
        trace!(
            "expect {}:{}",
            expected.symbol,
            expected.data.as_deref().unwrap_or("")
        );
        self.matched += 1;
        Ok(())
    }
}

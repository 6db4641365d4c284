//! Seeded fuzz driver.
//!
//! One iteration reseeds the PRNG from the current seed, draws a numeric
//! and a printable payload, and pushes each through every symbology that
//! can carry it, separated by junk. The oracle is armed before each symbol
//! and must be idle again at the end of each pass.

use std::time::{SystemTime, UNIX_EPOCH};

use barsynth_decoder::Decoder;
use barsynth_encode::{
    encode_code39, encode_code128b, encode_code128c, encode_ean8, encode_ean13, encode_i25,
    normalize_code39, with_ean_check,
};
use barsynth_error::{Result, SynthError};
use barsynth_types::{Direction, SymbolType};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::context::ScanContext;
use crate::junk::JunkInjector;
use crate::payload::{NUMERIC_LEN, PRINTABLE_LEN, numeric_payload, printable_payload};

/// Seed used when none is given, or when zero is given.
pub const DEFAULT_SEED: u32 = 0xbabe_face;

/// Junk elements between symbols. Odd, so the color comes back to space.
pub const DEFAULT_JUNK_LEN: usize = 9;

const EAN13_DIGITS: std::ops::Range<usize> = 2..NUMERIC_LEN;
const EAN8_DIGITS: std::ops::Range<usize> = 7..NUMERIC_LEN;

const RULE: &str = "----------------------------------------------------------";

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Initial seed; zero selects [`DEFAULT_SEED`].
    pub seed: u32,
    /// Junk elements between symbols.
    pub junk_len: usize,
    /// Minimum payload length applied to every symbology of the decoder.
    pub min_len: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            junk_len: DEFAULT_JUNK_LEN,
            min_len: 0,
        }
    }
}

/// Generates payloads, encodes them into a [`ScanContext`] and keeps the
/// oracle informed of what should come out.
#[derive(Debug)]
pub struct FuzzDriver {
    ctx: ScanContext,
    junk: JunkInjector,
    rng: StdRng,
    seed: u32,
    iteration: u64,
}

impl FuzzDriver {
    /// Wrap `decoder`, apply the configured minimum length and feed the
    /// warm-up junk.
    pub fn new(mut decoder: Box<dyn Decoder>, config: DriverConfig) -> Result<Self> {
        if config.junk_len % 2 == 0 {
            return Err(SynthError::usage(format!(
                "junk length must be odd, got {}",
                config.junk_len
            )));
        }
        decoder.set_min_len(None, config.min_len);
        let seed = nonzero_seed(config.seed);
        let mut driver = Self {
            ctx: ScanContext::new(decoder, seed),
            junk: JunkInjector::new(config.junk_len),
            rng: StdRng::seed_from_u64(u64::from(seed)),
            seed,
            iteration: 0,
        };
        debug!(
            decoder = driver.ctx.decoder().name(),
            junk_len = config.junk_len,
            min_len = config.min_len,
            "driver ready"
        );
        driver.junk.warm_up(&mut driver.ctx, &mut driver.rng)?;
        Ok(driver)
    }

    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed of the next iteration. Zero selects [`DEFAULT_SEED`].
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = nonzero_seed(seed);
    }

    /// Iterations completed or started so far.
    pub const fn iterations(&self) -> u64 {
        self.iteration
    }

    pub const fn context(&self) -> &ScanContext {
        &self.ctx
    }

    /// Pick a seed from the wall clock, mixed through the PRNG.
    pub fn reseed_from_time(&mut self) -> u32 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()));
        self.rng = StdRng::seed_from_u64(now);
        self.seed = self.next_seed();
        self.seed
    }

    /// Run `count` iterations, deriving each following seed from the PRNG.
    pub fn run(&mut self, count: u64) -> Result<()> {
        for _ in 0..count {
            self.run_iteration()?;
            self.seed = self.next_seed();
        }
        Ok(())
    }

    /// One numeric pass and one alphanumeric pass from the current seed.
    pub fn run_iteration(&mut self) -> Result<()> {
        debug!("{RULE}");
        info!("[{}] SEED={}", self.iteration, self.seed);
        self.iteration += 1;
        self.rng = StdRng::seed_from_u64(u64::from(self.seed));
        self.ctx.oracle_mut().set_seed(self.seed);

        let numeric = numeric_payload(&mut self.rng, NUMERIC_LEN);
        self.numeric_pass(&numeric)?;
        let printable = printable_payload(&mut self.rng, PRINTABLE_LEN);
        self.alpha_pass(&printable)
    }

    /// Code 128-C, I-2/5, EAN-13 and EAN-8 from one digit string.
    ///
    /// The string is truncated to even length for the first two; the EAN
    /// payloads are cut from its last twelve and seven digits.
    pub fn numeric_pass(&mut self, digits: &str) -> Result<()> {
        if digits.len() < NUMERIC_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SynthError::invalid_data(
                "numeric pass",
                digits,
                "needs at least 14 digits",
            ));
        }
        let even = &digits[..digits.len() & !1];

        self.ctx.expect(SymbolType::Code128, Some(even))?;
        encode_code128c(&mut self.ctx, even)?;
        self.junk()?;

        self.ctx.expect(SymbolType::I25, Some(even))?;
        encode_i25(&mut self.ctx, even, Direction::Forward)?;
        self.junk()?;

        let ean13 = with_ean_check(&digits[EAN13_DIGITS])?;
        self.ctx.expect(SymbolType::Ean13, Some(&ean13))?;
        encode_ean13(&mut self.ctx, &ean13)?;
        self.junk()?;

        let ean8 = with_ean_check(&digits[EAN8_DIGITS])?;
        self.ctx.expect(SymbolType::Ean8, Some(&ean8))?;
        encode_ean8(&mut self.ctx, &ean8)?;
        self.junk()?;

        self.ctx.expect(SymbolType::None, None)
    }

    /// Code 128-B from the raw string, Code 39 from its normalized form.
    pub fn alpha_pass(&mut self, data: &str) -> Result<()> {
        self.ctx.expect(SymbolType::Code128, Some(data))?;
        encode_code128b(&mut self.ctx, data)?;
        self.junk()?;

        let code39 = normalize_code39(data);
        self.ctx.expect(SymbolType::Code39, Some(&code39))?;
        encode_code39(&mut self.ctx, &code39)?;
        self.junk()?;

        self.ctx.expect(SymbolType::None, None)
    }

    fn junk(&mut self) -> Result<()> {
        self.junk.inject(&mut self.ctx, &mut self.rng)
    }

    fn next_seed(&mut self) -> u32 {
        loop {
            let seed = self.rng.next_u32();
            if seed != 0 {
                return seed;
            }
        }
    }
}

const fn nonzero_seed(seed: u32) -> u32 {
    if seed == 0 { DEFAULT_SEED } else { seed }
}

#[cfg(test)]
mod tests {
    use barsynth_decoder::ModuleDecoder;
    use barsynth_error::OracleViolation;

    use super::*;

    fn driver(seed: u32) -> FuzzDriver {
        let config = DriverConfig {
            seed,
            ..DriverConfig::default()
        };
        FuzzDriver::new(Box::new(ModuleDecoder::new()), config).unwrap()
    }

    #[test]
    fn zero_seed_means_default() {
        assert_eq!(driver(0).seed(), DEFAULT_SEED);
        let mut d = driver(5);
        d.set_seed(0);
        assert_eq!(d.seed(), DEFAULT_SEED);
    }

    #[test]
    fn even_junk_len_is_rejected() {
        let config = DriverConfig {
            junk_len: 8,
            ..DriverConfig::default()
        };
        let err = FuzzDriver::new(Box::new(ModuleDecoder::new()), config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn default_seed_iteration_passes() {
        let mut d = driver(DEFAULT_SEED);
        d.run_iteration().unwrap();
        assert_eq!(d.iterations(), 1);
        assert_eq!(d.context().oracle().matched(), 6);
        assert!(d.context().oracle().is_idle());
    }

    #[test]
    fn run_advances_seed() {
        let mut d = driver(1);
        d.run(3).unwrap();
        assert_eq!(d.iterations(), 3);
        assert_ne!(d.seed(), 1);
        assert_eq!(d.context().oracle().matched(), 18);
    }

    #[test]
    fn same_seed_same_schedule() {
        let mut a = driver(42);
        let mut b = driver(42);
        a.run(2).unwrap();
        b.run(2).unwrap();
        assert_eq!(a.seed(), b.seed());
        assert_eq!(a.context().elements(), b.context().elements());
    }

    #[test]
    fn numeric_pass_rejects_short_input() {
        let mut d = driver(1);
        assert!(matches!(
            d.numeric_pass("1234"),
            Err(SynthError::InvalidData { .. })
        ));
        assert!(d.numeric_pass("1234567890123é").is_err());
    }

    #[test]
    fn odd_numeric_input_is_truncated() {
        let mut d = driver(1);
        d.numeric_pass("123456789012345").unwrap();
        assert_eq!(d.context().oracle().matched(), 4);
    }

    #[test]
    fn alpha_pass_drops_what_code39_cannot_carry() {
        let mut d = driver(1);
        d.alpha_pass("a*b!c d~").unwrap();
        assert_eq!(d.context().oracle().matched(), 2);
    }

    #[test]
    fn reseed_from_time_is_nonzero() {
        let mut d = driver(1);
        assert_ne!(d.reseed_from_time(), 0);
        d.run_iteration().unwrap();
    }

    #[test]
    fn violation_carries_current_seed() {
        let mut d = driver(321);
        d.ctx.expect(SymbolType::Ean8, Some("00000000")).unwrap();
        let err = d.run_iteration().unwrap_err();
        assert!(matches!(
            err,
            SynthError::Oracle(OracleViolation::Missing { seed: 321, .. })
        ));
    }
}

use thiserror::Error;

/// Primary error type for barsynth operations.
///
/// Usage and data errors are recoverable in the usual sense. Oracle
/// violations are not: the driver stops at the first one and the CLI aborts
/// the process after echoing the seed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    // === Invocation Errors ===
    /// Malformed or missing command-line argument.
    #[error("{0}")]
    Usage(String),

    // === Encoding Errors ===
    /// Payload cannot be represented in the requested symbology.
    #[error("{symbology}: invalid data \"{data}\": {detail}")]
    InvalidData {
        symbology: &'static str,
        data: String,
        detail: &'static str,
    },

    /// Decoder was not expecting a space when a new symbol started.
    #[error("{symbology}: decoder expects a bar at symbol start")]
    ColorMisaligned { symbology: &'static str },

    /// Encoding variant that is known to be broken and stays disabled.
    #[error("unsupported encoding: {0}")]
    Unsupported(&'static str),

    // === Oracle Errors ===
    /// Decoder output disagreed with the pending expectation.
    #[error(transparent)]
    Oracle(#[from] OracleViolation),
}

/// A fatal disagreement between the decoder and the expectation slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleViolation {
    /// A new expectation was set while the previous one was still pending,
    /// i.e. the previous symbol never decoded.
    #[error("MISSING {symbol}:{}\nSEED={seed}", display_data(.data.as_deref()))]
    Missing {
        symbol: &'static str,
        data: Option<String>,
        seed: u32,
    },

    /// The decoder reported a symbol while nothing was expected.
    #[error("decode {symbol}:{data}\nUNEXPECTED!\nSEED={seed}")]
    Unexpected {
        symbol: &'static str,
        data: String,
        seed: u32,
    },

    /// The decoder reported a different symbol type or payload.
    #[error(
        "decode {observed_symbol}:{observed_data}\nexpect {expected_symbol}:{}\nSEED={seed}",
        display_data(.expected_data.as_deref())
    )]
    Mismatch {
        expected_symbol: &'static str,
        expected_data: Option<String>,
        observed_symbol: &'static str,
        observed_data: String,
        seed: u32,
    },
}

fn display_data(data: Option<&str>) -> &str {
    data.unwrap_or("(null)")
}

impl OracleViolation {
    /// Root seed of the run that produced this violation.
    pub const fn seed(&self) -> u32 {
        match self {
            Self::Missing { seed, .. }
            | Self::Unexpected { seed, .. }
            | Self::Mismatch { seed, .. } => *seed,
        }
    }
}

impl SynthError {
    /// Create a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create an invalid-data error for `symbology`.
    pub fn invalid_data(symbology: &'static str, data: &str, detail: &'static str) -> Self {
        Self::InvalidData {
            symbology,
            data: data.to_owned(),
            detail,
        }
    }

    /// Whether the process must abort rather than exit cleanly.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Oracle(_))
    }

    /// Process exit code for non-fatal errors.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias using `SynthError`.
pub type Result<T> = std::result::Result<T, SynthError>;

use std::fmt;

/// Symbol type reported by a decoding engine.
///
/// Discriminants follow the conventional decoder numbering, so the ordering
/// places the non-symbol results (`None`, `Partial`) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SymbolType {
    /// Nothing decoded.
    None = 0,
    /// Intermediate result; a symbol may be in progress.
    Partial = 1,
    /// EAN-8.
    Ean8 = 8,
    /// EAN-13 (UPC-A is reported as EAN-13 with a leading zero).
    Ean13 = 13,
    /// Interleaved 2 of 5.
    I25 = 25,
    /// Code 39.
    Code39 = 39,
    /// Reserved 2D category; never expected by the oracle.
    QrCode = 64,
    /// Code 128.
    Code128 = 128,
}

impl SymbolType {
    /// Diagnostic name, as printed in oracle messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Partial => "PARTIAL",
            Self::Ean8 => "EAN-8",
            Self::Ean13 => "EAN-13",
            Self::I25 => "I2/5",
            Self::Code39 => "CODE-39",
            Self::QrCode => "QR-Code",
            Self::Code128 => "CODE-128",
        }
    }

    /// Whether a decode of this type carries a complete linear symbol.
    ///
    /// Partial results and the 2D category are not symbols for the oracle.
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::None | Self::Partial | Self::QrCode)
    }

    /// The linear symbologies a decoder can be configured for.
    pub const LINEAR: [Self; 5] = [
        Self::Ean8,
        Self::Ean13,
        Self::I25,
        Self::Code39,
        Self::Code128,
    ];
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color of the next element a decoder expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Light element. A fresh decoder starts here.
    #[default]
    Space,
    /// Dark element.
    Bar,
}

impl Color {
    /// The color after one more element.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Space => Self::Bar,
            Self::Bar => Self::Space,
        }
    }
}

/// One completed (or partial) decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub symbol: SymbolType,
    pub data: String,
}

impl Decoded {
    pub fn new(symbol: SymbolType, data: impl Into<String>) -> Self {
        Self {
            symbol,
            data: data.into(),
        }
    }

    /// A partial result with no payload.
    pub fn partial() -> Self {
        Self::new(SymbolType::Partial, String::new())
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbol, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_symbols_sort_first() {
        for sym in SymbolType::LINEAR {
            assert!(sym > SymbolType::Partial);
            assert!(sym.is_reportable());
        }
        assert!(!SymbolType::None.is_reportable());
        assert!(!SymbolType::Partial.is_reportable());
        assert!(!SymbolType::QrCode.is_reportable());
    }

    #[test]
    fn color_alternates() {
        let c = Color::default();
        assert_eq!(c, Color::Space);
        assert_eq!(c.toggled(), Color::Bar);
        assert_eq!(c.toggled().toggled(), Color::Space);
    }

    #[test]
    fn decoded_display_matches_oracle_format() {
        let d = Decoded::new(SymbolType::I25, "0123");
        assert_eq!(d.to_string(), "I2/5:0123");
    }
}

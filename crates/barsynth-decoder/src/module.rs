use std::collections::{HashMap, VecDeque};

use barsynth_types::{Color, Decoded, QUIET_ZONE, SymbolType};
use tracing::{debug, trace};

use crate::scan::{Scan, scan};
use crate::traits::Decoder;

/// Elements kept for backward parsing. Comfortably more than the longest
/// symbol the harness produces.
const MAX_HISTORY: usize = 1024;

/// Reference decoder working on exact module widths.
///
/// Each quiet-zone space triggers a backward parse of the element history.
/// A complete symbol is reported and consumed; a recognized stop/end
/// pattern without a valid symbol in front of it is reported as
/// [`SymbolType::Partial`].
#[derive(Debug, Clone)]
pub struct ModuleDecoder {
    history: VecDeque<u8>,
    color: Color,
    min_len: HashMap<SymbolType, usize>,
}

impl Default for ModuleDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDecoder {
    /// Create a decoder with the conventional minimum lengths.
    pub fn new() -> Self {
        let min_len = HashMap::from([
            (SymbolType::Ean8, 0),
            (SymbolType::Ean13, 0),
            (SymbolType::I25, 6),
            (SymbolType::Code39, 1),
            (SymbolType::Code128, 1),
        ]);
        Self {
            history: VecDeque::with_capacity(MAX_HISTORY),
            color: Color::Space,
            min_len,
        }
    }

    /// Minimum payload length currently configured for `symbol`.
    pub fn min_len(&self, symbol: SymbolType) -> usize {
        self.min_len.get(&symbol).copied().unwrap_or(0)
    }

    fn consume_symbol(&mut self) {
        // The quiet zone that ended the symbol may lead the next one.
        let keep = self.history.back().copied();
        self.history.clear();
        self.history.extend(keep);
    }
}

impl Decoder for ModuleDecoder {
    fn name(&self) -> &'static str {
        "module"
    }

    fn set_min_len(&mut self, symbology: Option<SymbolType>, min_len: usize) {
        match symbology {
            Some(sym) => {
                self.min_len.insert(sym, min_len);
            }
            None => {
                for sym in SymbolType::LINEAR {
                    self.min_len.insert(sym, min_len);
                }
            }
        }
    }

    fn color(&self) -> Color {
        self.color
    }

    fn decode_width(&mut self, width: u8) -> Option<Decoded> {
        let color = self.color;
        self.color = color.toggled();
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(width);

        if color != Color::Space || width < QUIET_ZONE {
            return None;
        }
        match scan(self.history.make_contiguous()) {
            Scan::Found(decoded) => {
                self.consume_symbol();
                let min = self.min_len(decoded.symbol);
                if decoded.data.len() < min {
                    debug!(
                        symbol = %decoded.symbol,
                        len = decoded.data.len(),
                        min,
                        "decode below minimum length dropped"
                    );
                    return None;
                }
                trace!(symbol = %decoded.symbol, data = %decoded.data, "decoded");
                Some(decoded)
            }
            Scan::Terminal => Some(Decoded::partial()),
            Scan::NoMatch => None,
        }
    }

    fn reset(&mut self) {
        self.history.clear();
        self.color = Color::Space;
    }
}

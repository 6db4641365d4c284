use barsynth_types::{Color, Decoded, SymbolType};

/// A width-stream decoding engine.
///
/// Modeled after a linear-barcode decoder core: it consumes one element
/// width at a time, tracks the bar/space color itself, and synchronously
/// reports a result whenever an element completes (or partially completes)
/// a symbol. Creating and dropping the value are the engine's lifecycle.
pub trait Decoder {
    /// The name of this engine (e.g. "module").
    fn name(&self) -> &'static str;

    /// Suppress decodes whose payload is shorter than `min_len`.
    ///
    /// `None` applies the limit to every symbology.
    fn set_min_len(&mut self, symbology: Option<SymbolType>, min_len: usize);

    /// Color of the element the engine expects next.
    fn color(&self) -> Color;

    /// Consume one element width.
    ///
    /// Returns the decode this element completed, if any. Callers must treat
    /// `SymbolType::Partial` results as progress reports, not symbols.
    fn decode_width(&mut self, width: u8) -> Option<Decoded>;

    /// Drop all accumulated state and expect a space again.
    fn reset(&mut self);
}

use barsynth_error::{Result, SynthError};
use barsynth_types::{Color, Direction, PackedWord};
use tracing::trace;

/// Consumer of element widths, normally a decoding engine.
///
/// The sink owns the bar/space color state: every `put` toggles it.
pub trait WidthSink {
    /// Color of the next element the sink expects.
    fn color(&self) -> Color;

    /// Feed one element width.
    fn put(&mut self, width: u8) -> Result<()>;
}

/// Recording sink: collects widths, starting on a space.
impl WidthSink for Vec<u8> {
    fn color(&self) -> Color {
        if self.len() % 2 == 0 {
            Color::Space
        } else {
            Color::Bar
        }
    }

    fn put(&mut self, width: u8) -> Result<()> {
        self.push(width);
        Ok(())
    }
}

/// Feed every width of `word` in `direction` order.
pub fn emit<S>(sink: &mut S, word: PackedWord, direction: Direction) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    let arrow = match direction {
        Direction::Forward => '<',
        Direction::Reverse => '>',
    };
    trace!(" raw={:x}{arrow}", word.raw());
    for width in word.widths(direction) {
        sink.put(width)?;
    }
    Ok(())
}

/// Feed an already expanded width pattern.
pub fn emit_widths<S>(sink: &mut S, widths: &[u8]) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    trace!(" widths={widths:?}");
    for &width in widths {
        sink.put(width)?;
    }
    Ok(())
}

/// Symbols always start on a space (the leading quiet zone).
pub(crate) fn require_space<S>(sink: &S, symbology: &'static str) -> Result<()>
where
    S: WidthSink + ?Sized,
{
    if sink.color() == Color::Space {
        Ok(())
    } else {
        Err(SynthError::ColorMisaligned { symbology })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_tracks_color() {
        let mut sink = Vec::new();
        assert_eq!(sink.color(), Color::Space);
        sink.put(3).unwrap();
        assert_eq!(sink.color(), Color::Bar);
        sink.put(1).unwrap();
        assert_eq!(sink.color(), Color::Space);
    }

    #[test]
    fn emit_follows_direction() {
        let mut fwd = Vec::new();
        emit(&mut fwd, PackedWord::new(0x1123), Direction::Forward).unwrap();
        let mut rev = Vec::new();
        emit(&mut rev, PackedWord::new(0x1123), Direction::Reverse).unwrap();
        assert_eq!(fwd, vec![3, 2, 1, 1]);
        assert_eq!(rev, vec![1, 1, 2, 3]);
    }

    #[test]
    fn require_space_rejects_bar() {
        let sink = vec![1_u8];
        let err = require_space(&sink, "EAN-8").unwrap_err();
        assert_eq!(err, SynthError::ColorMisaligned { symbology: "EAN-8" });
    }
}

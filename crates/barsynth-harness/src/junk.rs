use barsynth_encode::WidthSink;
use barsynth_error::Result;
use barsynth_types::MAX_JUNK_WIDTH;
use rand::Rng;
use tracing::trace;

/// Feeds random element widths between symbols.
///
/// Noise must never decode as a symbol, and an odd count keeps the sink
/// on the color it started on: a symbol that ended on its trailing space
/// is followed by junk that also ends on a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunkInjector {
    len: usize,
}

impl JunkInjector {
    pub const fn new(len: usize) -> Self {
        Self { len }
    }

    /// One inter-symbol run of junk.
    pub fn inject<S, R>(&self, sink: &mut S, rng: &mut R) -> Result<()>
    where
        S: WidthSink + ?Sized,
        R: Rng,
    {
        inject(sink, rng, self.len)
    }

    /// Start-up junk: one element longer than a regular run, so the decoder
    /// is left expecting a space.
    pub fn warm_up<S, R>(&self, sink: &mut S, rng: &mut R) -> Result<()>
    where
        S: WidthSink + ?Sized,
        R: Rng,
    {
        inject(sink, rng, self.len + 1)
    }
}

/// Feed `count` widths drawn uniformly from `1..=MAX_JUNK_WIDTH`.
pub fn inject<S, R>(sink: &mut S, rng: &mut R, count: usize) -> Result<()>
where
    S: WidthSink + ?Sized,
    R: Rng,
{
    if count > 1 {
        trace!("encode random junk...");
    }
    for _ in 0..count {
        sink.put(rng.gen_range(1..=MAX_JUNK_WIDTH))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use barsynth_types::Color;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn widths_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = Vec::new();
        inject(&mut sink, &mut rng, 500).unwrap();
        assert_eq!(sink.len(), 500);
        assert!(sink.iter().all(|&w| (1..=MAX_JUNK_WIDTH).contains(&w)));
    }

    #[test]
    fn odd_run_preserves_color_and_warm_up_flips_it() {
        let junk = JunkInjector::new(9);
        let mut rng = StdRng::seed_from_u64(2);
        let mut sink: Vec<u8> = vec![10];
        assert_eq!(sink.color(), Color::Bar);
        junk.inject(&mut sink, &mut rng).unwrap();
        assert_eq!(sink.color(), Color::Space);

        let mut sink = Vec::new();
        junk.warm_up(&mut sink, &mut rng).unwrap();
        assert_eq!(sink.len(), 10);
        assert_eq!(sink.color(), Color::Space);
    }

    #[test]
    fn same_seed_same_junk() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        inject(&mut a, &mut StdRng::seed_from_u64(3), 32).unwrap();
        inject(&mut b, &mut StdRng::seed_from_u64(3), 32).unwrap();
        assert_eq!(a, b);
    }
}

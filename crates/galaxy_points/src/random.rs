//! Random sources and the small sampling helpers built on top of them.

use rand::Rng;

/// Anything that can hand out independent uniform floats in `[0, 1)`.
///
/// Every [`rand::Rng`] qualifies, so a seeded `StdRng` gives reproducible galaxies.
/// [`ReplaySource`] plays back a recorded sequence instead.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed sequence of samples, wrapping around at the end.
///
/// Values are returned as-is; callers are expected to record samples in `[0, 1)`.
/// An empty sequence yields `0.0` forever.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    values: Vec<f32>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of samples handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Uniform float in `[low, high)`.
pub fn rand_float<R: RandomSource + ?Sized>(low: f32, high: f32, rng: &mut R) -> f32 {
    low + rng.next_f32() * (high - low)
}

/// Uniform integer in `[low, high]`, both ends inclusive.
pub fn rand_int<R: RandomSource + ?Sized>(low: i32, high: i32, rng: &mut R) -> i32 {
    let span = (high - low + 1) as f32;
    let step = (rng.next_f32() * span).floor() as i32;
    // guards against sources that return exactly 1.0
    low + step.min(high - low)
}

/// Picks one element uniformly, or `None` for an empty slice.
pub fn pick_random<'a, T, R: RandomSource + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = (rng.next_f32() * items.len() as f32).floor() as usize;
    items.get(index.min(items.len() - 1))
}

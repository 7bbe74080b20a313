//! Random source for behavioral triggers
//!
//! Every probabilistic decision in the simulation goes through [`Rolls`] so
//! a run is reproducible from its seed and tests can script exact outcomes.

use std::collections::VecDeque;

use rand::Rng;

/// Uniform draws consumed by the tick engine
pub trait Rolls {
    /// Uniform sample in `[0, 1)`
    fn roll(&mut self) -> f64;

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn pick(&mut self, len: usize) -> usize;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.roll() < p
    }
}

impl<R: Rng> Rolls for R {
    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Pre-recorded draws, for asserting trigger/no-trigger outcomes.
///
/// When a queue runs dry, `roll` returns `fallback` and `pick` returns 0.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    picks: VecDeque<usize>,
    fallback: f64,
}

impl ScriptedRolls {
    /// Script that never fires any trigger
    pub fn never() -> Self {
        Self {
            rolls: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: 0.999_999,
        }
    }

    /// Script that fires every trigger
    pub fn always() -> Self {
        Self {
            fallback: 0.0,
            ..Self::never()
        }
    }

    /// Queue explicit roll values, consumed in order before the fallback
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue explicit pick indices
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl Rolls for ScriptedRolls {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}

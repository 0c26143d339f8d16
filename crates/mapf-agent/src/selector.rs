//! Epsilon-greedy algorithm selection over per-algorithm Q-values.
//!
//! Each agent carries one [`Selector`].  On every replan the selector either
//! explores (probability epsilon, uniform draw over the three algorithms) or
//! exploits (highest Q-value, first-listed on ties).  Rewards update the
//! chosen algorithm's Q-value by the standard incremental rule
//! `Q += alpha * (reward - Q)`.

use mapf_core::{AgentRng, Algorithm};

/// Reward credited to the active algorithm when the agent reaches its target.
pub const REWARD_FINISH: f32 = 1.0;

/// Penalty charged when the agent loses an arbitration, goes stuck, or has
/// its move vetoed.
pub const REWARD_COLLISION: f32 = -1.0;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selector {
    /// Q-value per algorithm, indexed by [`Algorithm::index`].
    q: [f32; Algorithm::ALL.len()],
    epsilon: f32,
}

impl Selector {
    pub fn new(epsilon: f32) -> Self {
        Self { q: [0.0; Algorithm::ALL.len()], epsilon }
    }

    /// Draw the preferred algorithm: explore with probability epsilon,
    /// otherwise exploit the current Q-values.
    ///
    /// The exploit branch breaks Q-value ties by fixed algorithm order, so a
    /// fresh selector (all zeros) deterministically prefers A*.
    pub fn choose(&self, rng: &mut AgentRng) -> Algorithm {
        if self.epsilon > 0.0 && rng.gen_bool(self.epsilon as f64) {
            Algorithm::ALL[rng.gen_range(0..Algorithm::ALL.len())]
        } else {
            self.best()
        }
    }

    /// Highest-Q algorithm, first-listed on ties.
    pub fn best(&self) -> Algorithm {
        let mut best = Algorithm::ALL[0];
        for &a in &Algorithm::ALL[1..] {
            if self.q[a.index()] > self.q[best.index()] {
                best = a;
            }
        }
        best
    }

    /// Incremental Q-value update for `algorithm`.
    pub fn update(&mut self, algorithm: Algorithm, reward: f32, alpha: f32) {
        let q = &mut self.q[algorithm.index()];
        *q += alpha * (reward - *q);
    }

    /// Multiply epsilon by `factor`, shifting from exploration toward
    /// exploitation.
    pub fn decay_epsilon(&mut self, factor: f32) {
        self.epsilon *= factor;
    }

    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    #[inline]
    pub fn q_value(&self, algorithm: Algorithm) -> f32 {
        self.q[algorithm.index()]
    }
}

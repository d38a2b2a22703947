//! Transitions and per-run reward traces

use serde::{Deserialize, Serialize};

use crate::state::{Action, Reward};

/// A single transition (s, a, r, s') by state index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: usize,
    pub action: Action,
    pub reward: Reward,
    pub next_state: usize,
}

impl Experience {
    pub fn new(state: usize, action: Action, reward: Reward, next_state: usize) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
        }
    }
}

/// Allocator rewards and random-baseline rewards for one training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardTrace {
    allocator: Vec<Reward>,
    random: Vec<Reward>,
}

impl RewardTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one episode; both sequences always grow together
    pub fn push(&mut self, allocator: Reward, random: Reward) {
        self.allocator.push(allocator);
        self.random.push(random);
    }

    pub fn allocator(&self) -> &[Reward] {
        &self.allocator
    }

    pub fn random(&self) -> &[Reward] {
        &self.random
    }

    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    pub fn clear(&mut self) {
        self.allocator.clear();
        self.random.clear();
    }

    pub fn average_allocator(&self) -> Reward {
        mean(&self.allocator)
    }

    pub fn average_random(&self) -> Reward {
        mean(&self.random)
    }

    /// Mean of each consecutive window of `window` episodes, as
    /// (allocator, random) pairs. The last window may be shorter.
    pub fn window_averages(&self, window: usize) -> Vec<(Reward, Reward)> {
        if window == 0 {
            return Vec::new();
        }
        self.allocator
            .chunks(window)
            .zip(self.random.chunks(window))
            .map(|(a, r)| (mean(a), mean(r)))
            .collect()
    }
}

fn mean(values: &[Reward]) -> Reward {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<Reward>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_creation() {
        let exp = Experience::new(5, 0, 10.0, 13);
        assert_eq!(exp.state, 5);
        assert_eq!(exp.next_state, 13);
        assert_eq!(exp.reward, 10.0);
    }

    #[test]
    fn test_trace_push_and_len() {
        let mut trace = RewardTrace::new();
        assert!(trace.is_empty());

        trace.push(10.0, -10.0);
        trace.push(10.0, 10.0);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.allocator(), &[10.0, 10.0]);
        assert_eq!(trace.random(), &[-10.0, 10.0]);
    }

    #[test]
    fn test_trace_averages() {
        let mut trace = RewardTrace::new();
        trace.push(10.0, -10.0);
        trace.push(-10.0, -10.0);
        trace.push(10.0, 10.0);
        trace.push(10.0, -10.0);

        assert_eq!(trace.average_allocator(), 5.0);
        assert_eq!(trace.average_random(), -5.0);
    }

    #[test]
    fn test_empty_trace_averages_zero() {
        let trace = RewardTrace::new();
        assert_eq!(trace.average_allocator(), 0.0);
        assert_eq!(trace.average_random(), 0.0);
    }

    #[test]
    fn test_trace_clear() {
        let mut trace = RewardTrace::new();
        trace.push(10.0, 10.0);
        trace.clear();
        assert_eq!(trace.len(), 0);
        assert!(trace.random().is_empty());
    }

    #[test]
    fn test_window_averages() {
        let mut trace = RewardTrace::new();
        for i in 0..5 {
            let r = if i % 2 == 0 { 10.0 } else { -10.0 };
            trace.push(r, -r);
        }

        let windows = trace.window_averages(2);
        assert_eq!(windows, vec![(0.0, 0.0), (0.0, 0.0), (10.0, -10.0)]);
        assert!(trace.window_averages(0).is_empty());
    }
}

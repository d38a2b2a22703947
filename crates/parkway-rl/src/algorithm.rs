//! Allocator trait and the tabular Q-learning implementation

use ndarray::Array2;
use rand::{Rng, RngCore};
use tracing::warn;

use crate::experience::Experience;
use crate::state::{state_space_size, Action};

/// Step size of the temporal-difference update
pub const LEARNING_RATE: f64 = 0.1;

/// Weight of the successor's best value
pub const DISCOUNT_FACTOR: f64 = 0.9;

/// Probability of a uniformly random action during training
pub const EXPLORATION_RATE: f64 = 0.2;

/// Trait for slot allocators
pub trait Allocator: Send + Sync {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Number of actions (slots)
    fn action_space_size(&self) -> usize;

    /// Epsilon-greedy choice for a state row
    fn choose_action(&self, state: usize, exploration_rate: f64, rng: &mut dyn RngCore) -> Action;

    /// Highest-valued action for a state, first index on ties
    fn best_action(&self, state: usize) -> Action;

    /// Highest estimated value for a state
    fn best_value(&self, state: usize) -> f64;

    /// Estimated value of one (state, action) cell
    fn value(&self, state: usize, action: Action) -> f64;

    /// Apply one update; returns the new value of the cell
    fn update(&mut self, experience: &Experience) -> f64;

    /// Get algorithm parameters as JSON
    fn params(&self) -> serde_json::Value;

    /// Forget everything learned so far
    fn reset(&mut self);
}

/// Q-learning over a dense `states x slots` table
pub struct TabularQAllocator {
    q_table: Array2<f64>,
    learning_rate: f64,
    discount_factor: f64,
}

impl TabularQAllocator {
    /// Zero-initialised table for a lot of `total_slots`
    pub fn new(total_slots: usize) -> Self {
        Self::with_rates(total_slots, LEARNING_RATE, DISCOUNT_FACTOR)
    }

    pub fn with_rates(total_slots: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_table: Array2::zeros((state_space_size(total_slots), total_slots)),
            learning_rate,
            discount_factor,
        }
    }

    pub fn state_space_size(&self) -> usize {
        self.q_table.nrows()
    }

    pub fn table(&self) -> &Array2<f64> {
        &self.q_table
    }

    /// Rows touched at least once
    pub fn visited_states(&self) -> usize {
        self.q_table
            .rows()
            .into_iter()
            .filter(|row| row.iter().any(|v| *v != 0.0))
            .count()
    }
}

impl Allocator for TabularQAllocator {
    fn name(&self) -> &str {
        "tabular_q"
    }

    fn action_space_size(&self) -> usize {
        self.q_table.ncols()
    }

    fn choose_action(&self, state: usize, exploration_rate: f64, rng: &mut dyn RngCore) -> Action {
        if rng.gen::<f64>() < exploration_rate {
            rng.gen_range(0..self.action_space_size())
        } else {
            self.best_action(state)
        }
    }

    fn best_action(&self, state: usize) -> Action {
        if state >= self.q_table.nrows() {
            return 0;
        }
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (action, value) in self.q_table.row(state).iter().enumerate() {
            if *value > best_value {
                best = action;
                best_value = *value;
            }
        }
        best
    }

    fn best_value(&self, state: usize) -> f64 {
        if state >= self.q_table.nrows() {
            return 0.0;
        }
        self.q_table
            .row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn value(&self, state: usize, action: Action) -> f64 {
        self.q_table.get((state, action)).copied().unwrap_or(0.0)
    }

    fn update(&mut self, experience: &Experience) -> f64 {
        let best_next = self.best_value(experience.next_state);
        let Some(cell) = self
            .q_table
            .get_mut((experience.state, experience.action))
        else {
            warn!(
                "Ignoring update outside the table: state {}, action {}",
                experience.state, experience.action
            );
            return 0.0;
        };

        let old = *cell;
        let target = experience.reward + self.discount_factor * best_next;
        *cell = old + self.learning_rate * (target - old);
        *cell
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "learning_rate": self.learning_rate,
            "discount_factor": self.discount_factor,
            "exploration_rate": EXPLORATION_RATE,
            "states": self.q_table.nrows(),
            "actions": self.q_table.ncols(),
            "visited_states": self.visited_states()
        })
    }

    fn reset(&mut self) {
        self.q_table.fill(0.0);
    }
}

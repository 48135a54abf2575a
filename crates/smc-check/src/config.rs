//! Checker settings.

use smc_eval::Tolerance;

/// Checker configuration.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Verbose logging: list every matching state for min/max filters.
    pub verbose: bool,
    /// Retain the full result vector of every `check` call.
    pub store_vector: bool,
    /// Minimise the model (through the configured minimiser) before checking.
    pub do_bisim: bool,
    /// Tolerance for "states with (approximately) this value" queries.
    pub close_tolerance: Tolerance,
    /// How many matching states min/max filters list when not verbose.
    pub max_matching_states_shown: usize,
    /// Attach filter explanations to results.
    pub explanations: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            store_vector: false,
            do_bisim: false,
            close_tolerance: Tolerance::default(),
            max_matching_states_shown: 10,
            explanations: true,
        }
    }
}

//! The model interface the checker evaluates expressions against.

use crate::state_set::StateSet;
use smc_expr::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Model error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("label \"{name}\" already exists")]
    DuplicateLabel { name: String },

    #[error("state {state} out of range (model has {num_states} states)")]
    StateOutOfRange { state: usize, num_states: usize },

    #[error("state {state} has {found} variable values, expected {expected}")]
    ValuationArity {
        state: usize,
        expected: usize,
        found: usize,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Family of state-transition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    Dtmc,
    Ctmc,
    Mdp,
    Pomdp,
    Ctmdp,
    Csg,
    Stpg,
    Smg,
    Posmg,
    Idtmc,
    Imdp,
    Lts,
}

impl ModelType {
    /// Models whose states carry an observation.
    pub fn is_partially_observable(&self) -> bool {
        matches!(self, ModelType::Pomdp | ModelType::Posmg)
    }

    /// Models with more than one player.
    pub fn is_game(&self) -> bool {
        matches!(
            self,
            ModelType::Csg | ModelType::Stpg | ModelType::Smg | ModelType::Posmg
        )
    }

    /// Models with interval-valued transition probabilities.
    pub fn is_interval(&self) -> bool {
        matches!(self, ModelType::Idtmc | ModelType::Imdp)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ModelType::Dtmc => "dtmc",
            ModelType::Ctmc => "ctmc",
            ModelType::Mdp => "mdp",
            ModelType::Pomdp => "pomdp",
            ModelType::Ctmdp => "ctmdp",
            ModelType::Csg => "csg",
            ModelType::Stpg => "stpg",
            ModelType::Smg => "smg",
            ModelType::Posmg => "posmg",
            ModelType::Idtmc => "idtmc",
            ModelType::Imdp => "imdp",
            ModelType::Lts => "lts",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_uppercase())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "dtmc" => ModelType::Dtmc,
            "ctmc" => ModelType::Ctmc,
            "mdp" => ModelType::Mdp,
            "pomdp" => ModelType::Pomdp,
            "ctmdp" => ModelType::Ctmdp,
            "csg" => ModelType::Csg,
            "stpg" => ModelType::Stpg,
            "smg" => ModelType::Smg,
            "posmg" => ModelType::Posmg,
            "idtmc" => ModelType::Idtmc,
            "imdp" => ModelType::Imdp,
            "lts" => ModelType::Lts,
            other => return Err(format!("unknown model type \"{}\"", other)),
        })
    }
}

/// A finite-state model with stable state indices `0..num_states()`.
///
/// Evaluation only reads the model. The label registry is the one mutable
/// part: extraction of maximal state formulas registers generated labels.
pub trait Model {
    fn model_type(&self) -> ModelType;

    fn num_states(&self) -> usize;

    fn num_initial_states(&self) -> usize;

    fn is_initial_state(&self, s: usize) -> bool;

    fn is_deadlock_state(&self, s: usize) -> bool;

    /// Satisfaction set of a label attached directly to the model.
    fn label_states(&self, name: &str) -> Option<&StateSet>;

    /// Names of labels attached directly to the model.
    fn label_names(&self) -> Vec<String>;

    /// Attach a new label. Fails if the name is taken.
    fn add_label(&mut self, name: &str, states: StateSet) -> ModelResult<()>;

    /// Value of state variable `var` in state `s`.
    fn var_value(&self, s: usize, var: usize) -> Option<Value>;

    /// Value of observable `observable` in the observation of state `s`.
    /// `None` for models without observations.
    fn observation_value(&self, _s: usize, _observable: usize) -> Option<Value> {
        None
    }

    /// Text used for state `s` in result listings.
    fn describe_state(&self, s: usize) -> String {
        s.to_string()
    }

    fn has_label(&self, name: &str) -> bool {
        self.label_states(name).is_some()
    }

    /// Set of initial states.
    fn initial_states(&self) -> StateSet {
        (0..self.num_states())
            .filter(|&s| self.is_initial_state(s))
            .collect()
    }

    /// Attach a label under a fresh name: `prefix` if free, else
    /// `prefix_0`, `prefix_1`, ... The name must be unused on the model and
    /// absent from `defined` (labels defined elsewhere, e.g. a property
    /// file). Returns the chosen name.
    fn add_unique_label(
        &mut self,
        prefix: &str,
        states: StateSet,
        defined: &BTreeSet<String>,
    ) -> ModelResult<String> {
        let mut name = prefix.to_string();
        let mut i = 0;
        while self.has_label(&name) || defined.contains(&name) {
            name = format!("{}_{}", prefix, i);
            i += 1;
        }
        self.add_label(&name, states)?;
        Ok(name)
    }
}

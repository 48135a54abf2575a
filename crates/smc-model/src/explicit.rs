//! Explicit-state model: per-state valuations, initial states, successor
//! lists, labels and (for partially observable models) observations.

use crate::model::{Model, ModelError, ModelResult, ModelType};
use crate::state_set::StateSet;
use smc_expr::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Explicit-state model stored as flat per-state vectors.
#[derive(Debug, Clone)]
pub struct ExplicitModel {
    model_type: ModelType,
    var_names: Vec<String>,
    /// Variable valuation of each state.
    states: Vec<Vec<Value>>,
    initial: StateSet,
    successors: Vec<Vec<usize>>,
    labels: BTreeMap<String, StateSet>,
    /// Observation of each state, if partially observable.
    observations: Vec<Vec<Value>>,
}

impl ExplicitModel {
    /// Create an empty model.
    pub fn new(model_type: ModelType, var_names: Vec<String>) -> Self {
        Self {
            model_type,
            var_names,
            states: Vec::new(),
            initial: StateSet::new(),
            successors: Vec::new(),
            labels: BTreeMap::new(),
            observations: Vec::new(),
        }
    }

    /// Add a state with the given variable valuation; returns its index.
    pub fn add_state(&mut self, values: Vec<Value>) -> ModelResult<usize> {
        let index = self.states.len();
        if values.len() != self.var_names.len() {
            return Err(ModelError::ValuationArity {
                state: index,
                expected: self.var_names.len(),
                found: values.len(),
            });
        }
        self.states.push(values);
        self.successors.push(Vec::new());
        Ok(index)
    }

    pub fn add_initial_state(&mut self, s: usize) -> ModelResult<()> {
        self.check_state(s)?;
        self.initial.insert(s);
        Ok(())
    }

    /// Add a transition `from -> to`. States with no outgoing transition are
    /// deadlocks.
    pub fn add_transition(&mut self, from: usize, to: usize) -> ModelResult<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        if !self.successors[from].contains(&to) {
            self.successors[from].push(to);
        }
        Ok(())
    }

    /// Set the observation of state `s` (partially observable models).
    pub fn set_observation(&mut self, s: usize, observation: Vec<Value>) -> ModelResult<()> {
        self.check_state(s)?;
        if self.observations.len() < self.states.len() {
            self.observations.resize(self.states.len(), Vec::new());
        }
        self.observations[s] = observation;
        Ok(())
    }

    pub fn successors(&self, s: usize) -> &[usize] {
        self.successors.get(s).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    /// Index of a variable by name.
    pub fn var_index(&self, name: &str) -> Option<usize> {
        self.var_names.iter().position(|v| v == name)
    }

    /// Valuation of state `s`, e.g. `(x=1,b=true)`.
    pub fn state_string(&self, s: usize) -> String {
        match self.states.get(s) {
            Some(values) => {
                let parts: Vec<String> = self
                    .var_names
                    .iter()
                    .zip(values)
                    .map(|(n, v)| format!("{}={}", n, v))
                    .collect();
                format!("({})", parts.join(","))
            }
            None => format!("({})", s),
        }
    }

    /// Restrict to states where `keep` holds, renumbering in index order.
    /// Transitions to dropped states are removed.
    pub fn restrict(&self, keep: &StateSet) -> ExplicitModel {
        let mut map = vec![None; self.states.len()];
        for (new, old) in keep.iter().filter(|&s| s < self.states.len()).enumerate() {
            map[old] = Some(new);
        }
        let mut out = ExplicitModel::new(self.model_type, self.var_names.clone());
        for old in keep.iter().filter(|&s| s < self.states.len()) {
            out.states.push(self.states[old].clone());
            out.successors.push(
                self.successors[old]
                    .iter()
                    .filter_map(|&t| map[t])
                    .collect(),
            );
            if !self.observations.is_empty() {
                out.observations
                    .push(self.observations.get(old).cloned().unwrap_or_default());
            }
            if self.initial.contains(old) {
                if let Some(new) = map[old] {
                    out.initial.insert(new);
                }
            }
        }
        for (name, set) in &self.labels {
            let renumbered = set.iter().filter_map(|s| map.get(s).copied().flatten()).collect();
            out.labels.insert(name.clone(), renumbered);
        }
        debug!(
            from = self.states.len(),
            to = out.states.len(),
            "restricted explicit model"
        );
        out
    }

    fn check_state(&self, s: usize) -> ModelResult<()> {
        if s >= self.states.len() {
            return Err(ModelError::StateOutOfRange {
                state: s,
                num_states: self.states.len(),
            });
        }
        Ok(())
    }
}

impl Model for ExplicitModel {
    fn model_type(&self) -> ModelType {
        self.model_type
    }

    fn num_states(&self) -> usize {
        self.states.len()
    }

    fn num_initial_states(&self) -> usize {
        self.initial.len()
    }

    fn is_initial_state(&self, s: usize) -> bool {
        self.initial.contains(s)
    }

    fn is_deadlock_state(&self, s: usize) -> bool {
        s < self.successors.len() && self.successors[s].is_empty()
    }

    fn label_states(&self, name: &str) -> Option<&StateSet> {
        self.labels.get(name)
    }

    fn label_names(&self) -> Vec<String> {
        self.labels.keys().cloned().collect()
    }

    fn add_label(&mut self, name: &str, states: StateSet) -> ModelResult<()> {
        if self.labels.contains_key(name) {
            return Err(ModelError::DuplicateLabel {
                name: name.to_string(),
            });
        }
        debug!(label = name, states = states.len(), "added label");
        self.labels.insert(name.to_string(), states);
        Ok(())
    }

    fn var_value(&self, s: usize, var: usize) -> Option<Value> {
        self.states.get(s)?.get(var).copied()
    }

    fn observation_value(&self, s: usize, observable: usize) -> Option<Value> {
        if !self.model_type.is_partially_observable() {
            return None;
        }
        self.observations.get(s)?.get(observable).copied()
    }

    fn describe_state(&self, s: usize) -> String {
        format!("{}:{}", s, self.state_string(s))
    }

    fn initial_states(&self) -> StateSet {
        self.initial.clone()
    }
}

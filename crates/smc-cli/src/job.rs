//! Job files: an explicit model plus the labels, constants and properties
//! to check against it, stored as JSON.

use serde::Deserialize;
use smc_check::ModelCheckingInfo;
use smc_expr::Value;
use smc_model::{ExplicitModel, Model, ModelError, ModelType, StateSet};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{0}")]
    ModelType(String),

    #[error("label \"{label}\" refers to state {state}, but the model has {num_states} states")]
    LabelState {
        label: String,
        state: usize,
        num_states: usize,
    },

    #[error("{found} observations given for {num_states} states")]
    Observations { found: usize, num_states: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type JobResult<T> = Result<T, JobError>;

/// Top-level job file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub model: ModelSpec,
    #[serde(default)]
    pub info: ModelCheckingInfo,
}

/// Explicit model description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    #[serde(rename = "type")]
    pub model_type: String,
    #[serde(default)]
    pub vars: Vec<String>,
    /// One valuation per state, in variable order.
    pub states: Vec<Vec<Value>>,
    #[serde(default)]
    pub initial: Vec<usize>,
    #[serde(default)]
    pub transitions: Vec<(usize, usize)>,
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<usize>>,
    /// Per-state observations; empty unless partially observable.
    #[serde(default)]
    pub observations: Vec<Vec<Value>>,
}

impl ModelSpec {
    pub fn build(&self) -> JobResult<ExplicitModel> {
        let model_type: ModelType = self.model_type.parse().map_err(JobError::ModelType)?;
        let mut model = ExplicitModel::new(model_type, self.vars.clone());
        for values in &self.states {
            model.add_state(values.clone())?;
        }
        for &s in &self.initial {
            model.add_initial_state(s)?;
        }
        for &(from, to) in &self.transitions {
            model.add_transition(from, to)?;
        }

        let n = self.states.len();
        for (name, states) in &self.labels {
            let mut set = StateSet::new();
            for &s in states {
                if s >= n {
                    return Err(JobError::LabelState {
                        label: name.clone(),
                        state: s,
                        num_states: n,
                    });
                }
                set.insert(s);
            }
            model.add_label(name, set)?;
        }

        if !self.observations.is_empty() {
            if self.observations.len() != n {
                return Err(JobError::Observations {
                    found: self.observations.len(),
                    num_states: n,
                });
            }
            for (s, obs) in self.observations.iter().enumerate() {
                model.set_observation(s, obs.clone())?;
            }
        }

        debug!(
            model_type = %model_type,
            states = n,
            initial = self.initial.len(),
            labels = self.labels.len(),
            "built model"
        );
        Ok(model)
    }
}

impl Job {
    /// Build the model and fold its label names into the checking info.
    pub fn load(mut self) -> JobResult<(ExplicitModel, ModelCheckingInfo)> {
        let model = self.model.build()?;
        for name in self.model.labels.keys() {
            if !self.info.model_label_names.contains(name) {
                self.info.model_label_names.push(name.clone());
            }
        }
        Ok((model, self.info))
    }
}

/// Parse a command-line value: integer, then double, then boolean.
pub fn parse_value(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::Int(n));
    }
    if let Ok(d) = s.parse::<f64>() {
        return Some(Value::Double(d));
    }
    match s {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Byte offset of a 1-based line/column position in `source`.
pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

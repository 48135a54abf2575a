//! Named definitions the checker resolves references against.

use serde::{Deserialize, Serialize};
use smc_expr::{Expr, Value};
use std::collections::BTreeMap;

/// A named expression: a label definition or a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
    pub expr: Expr,
}

/// Label list, property list, constant values and observables available
/// while checking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCheckingInfo {
    /// Labels defined alongside the properties, in declaration order.
    pub labels: Vec<Named>,
    /// Named properties that `Prop` references resolve to.
    pub properties: Vec<Named>,
    pub constants: BTreeMap<String, Value>,
    /// Observable names; position is the observable index.
    pub observables: Vec<String>,
    /// Labels defined by the model description itself.
    pub model_label_names: Vec<String>,
    /// Parameter values, copied into every result.
    pub parameters: Option<String>,
}

impl ModelCheckingInfo {
    pub fn label(&self, name: &str) -> Option<&Expr> {
        self.labels.iter().find(|l| l.name == name).map(|l| &l.expr)
    }

    pub fn property(&self, name: &str) -> Option<&Expr> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.expr)
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).copied()
    }

    pub fn observable_index(&self, name: &str) -> Option<usize> {
        self.observables.iter().position(|o| o == name)
    }

    pub fn add_label(&mut self, name: impl Into<String>, expr: Expr) {
        self.labels.push(Named {
            name: name.into(),
            expr,
        });
    }

    pub fn add_property(&mut self, name: impl Into<String>, expr: Expr) {
        self.properties.push(Named {
            name: name.into(),
            expr,
        });
    }
}

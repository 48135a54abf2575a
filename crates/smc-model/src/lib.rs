//! State sets and the model interface for the smc state model checker.

pub mod explicit;
pub mod model;
pub mod state_set;

pub use explicit::ExplicitModel;
pub use model::{Model, ModelError, ModelResult, ModelType};
pub use state_set::StateSet;

//! Evaluation of state expressions over explicit models: the recursive
//! dispatcher, short-circuit domain propagation, filter reduction and
//! maximal state formula extraction.

pub mod checker;
pub mod collab;
pub mod config;
mod domain;
pub mod error;
pub mod extract;
mod filter;
pub mod info;
pub mod result;

pub use checker::Checker;
pub use collab::{Minimiser, QuantSolver, RewardConstructor, Rewards, SolverRequest};
pub use config::CheckerConfig;
pub use error::{CheckError, CheckResult};
pub use extract::Extracted;
pub use info::{ModelCheckingInfo, Named};
pub use result::{CheckOutcome, FilterHint, ModelCheckResult, ResultValue};

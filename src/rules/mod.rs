pub mod library;
pub mod registry;
pub mod rule_model;
pub mod runner;

pub use registry::RuleProvider;
pub use rule_model::{A11yCriteria, EvaluationCode, Rule, RuleDefinition, RuleId, RuleInfo, RuleOptions, RunResult};
pub use runner::RuleRunner;

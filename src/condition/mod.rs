pub mod condition;
pub mod context;
pub mod properties;
pub mod relationships;
pub mod string_property;
pub mod value;

pub use condition::{Condition, EvalResult, fixed_point};
pub use context::{ConditionContext, ContextScope};
pub use string_property::StringProperty;
pub use value::{CompareOp, Operand, ValueCondition};

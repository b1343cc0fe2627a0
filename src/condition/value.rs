use std::fmt;
use std::sync::Arc;

use crate::condition::condition::{Condition, ConditionKind};
use crate::condition::context::ConditionContext;
use crate::element::Element;
use crate::error::EvaluationError;

type ValueFn =
    Arc<dyn for<'a> Fn(Element<'a>, &mut ConditionContext<'a>) -> Result<i32, EvaluationError> + Send + Sync>;

/// Integer-valued measurement of an element (child count, string length, ...)
/// that turns into a [`Condition`] through a comparison.
#[derive(Clone)]
pub struct ValueCondition {
    getter: ValueFn,
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn apply(self, left: i32, right: i32) -> bool {
        match self {
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone)]
pub enum Operand {
    Int(i32),
    Value(ValueCondition),
}

impl From<i32> for Operand {
    fn from(i: i32) -> Self {
        Operand::Int(i)
    }
}

impl From<ValueCondition> for Operand {
    fn from(v: ValueCondition) -> Self {
        Operand::Value(v)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(i) => write!(f, "{}", i),
            Operand::Value(v) => write!(f, "{}", v),
        }
    }
}

impl ValueCondition {
    /// Value computed from the element and the current context.
    pub fn with_context<F>(description: &str, getter: F) -> Self
    where
        F: for<'a> Fn(Element<'a>, &mut ConditionContext<'a>) -> Result<i32, EvaluationError>
            + Send
            + Sync
            + 'static,
    {
        Self { getter: Arc::new(getter), description: description.to_string() }
    }

    /// Value computed from the element alone.
    pub fn new<F>(description: &str, getter: F) -> Self
    where
        F: Fn(Element<'_>) -> i32 + Send + Sync + 'static,
    {
        Self::with_context(description, move |e, _ctx| Ok(getter(e)))
    }

    pub fn value<'a>(&self, e: Element<'a>, ctx: &mut ConditionContext<'a>) -> Result<i32, EvaluationError> {
        (self.getter)(e, ctx)
    }

    fn compare(&self, op: CompareOp, right: impl Into<Operand>) -> Condition {
        Condition::from_kind(ConditionKind::Compare { left: self.clone(), op, right: right.into() })
    }

    pub fn lt(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Lt, right)
    }

    pub fn le(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Le, right)
    }

    pub fn gt(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Gt, right)
    }

    pub fn ge(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Ge, right)
    }

    pub fn eq(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Eq, right)
    }

    pub fn ne(&self, right: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Ne, right)
    }
}

impl fmt::Display for ValueCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::{Arc, OnceLock, Weak};

use crate::condition::context::ConditionContext;
use crate::condition::value::{CompareOp, Operand, ValueCondition};
use crate::element::control_type;
use crate::element::{Element, PatternData};
use crate::error::EvaluationError;

pub type EvalResult = Result<bool, EvaluationError>;

pub(crate) type PredicateFn = Arc<dyn Fn(Element<'_>) -> EvalResult + Send + Sync>;
pub(crate) type PatternValidator = Arc<dyn Fn(&PatternData) -> bool + Send + Sync>;

// ============================================================================
// Condition node
// ============================================================================

#[derive(Clone)]
pub(crate) enum ConditionKind {
    True,
    False,
    ControlType(i32),
    Pattern { id: i32, validator: Option<PatternValidator> },
    Predicate(PredicateFn),
    Not(Condition),
    And(Condition, Condition),
    Or(Condition, Condition),
    ExactlyOne(Vec<Condition>),
    Any(Vec<Condition>),
    All(Vec<Condition>),
    Parent(Condition),
    /// Pushes the evaluated element onto the context while testing children.
    AnyChild(Condition),
    AnyDescendant(Condition),
    HasSameType,
    SecondChild,
    Compare { left: ValueCondition, op: CompareOp, right: Operand },
    /// Owner of a late-bound body. The body refers back through `RecursiveRef`.
    Recursive(Arc<OnceLock<Condition>>),
    RecursiveRef(Weak<OnceLock<Condition>>),
}

struct ConditionNode {
    kind: ConditionKind,
    description: Option<String>,
}

/// Composable predicate over an [`Element`].
///
/// Cloning is cheap (shared node). Conditions hold no evaluation state, so one
/// instance can be evaluated from many threads at once.
#[derive(Clone)]
pub struct Condition(Arc<ConditionNode>);

impl Condition {
    pub(crate) fn from_kind(kind: ConditionKind) -> Self {
        Condition(Arc::new(ConditionNode { kind, description: None }))
    }

    pub(crate) fn kind(&self) -> &ConditionKind {
        &self.0.kind
    }

    pub fn always() -> Self {
        Self::from_kind(ConditionKind::True)
    }

    pub fn never() -> Self {
        Self::from_kind(ConditionKind::False)
    }

    pub fn control_type(id: i32) -> Self {
        Self::from_kind(ConditionKind::ControlType(id))
    }

    /// Matches elements that support pattern `id`.
    pub fn pattern(id: i32) -> Self {
        Self::from_kind(ConditionKind::Pattern { id, validator: None })
    }

    /// Matches elements that support pattern `id` and whose pattern data
    /// satisfies `validator`.
    pub fn pattern_with<F>(id: i32, validator: F) -> Self
    where
        F: Fn(&PatternData) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(ConditionKind::Pattern { id, validator: Some(Arc::new(validator)) })
    }

    /// Leaf predicate that may fail.
    pub fn create<F>(f: F) -> Self
    where
        F: Fn(Element<'_>) -> EvalResult + Send + Sync + 'static,
    {
        Self::from_kind(ConditionKind::Predicate(Arc::new(f)))
    }

    /// Infallible leaf predicate.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Element<'_>) -> bool + Send + Sync + 'static,
    {
        Self::create(move |e| Ok(f(e)))
    }

    /// Same condition with a human-readable description.
    pub fn described(&self, description: &str) -> Self {
        Condition(Arc::new(ConditionNode {
            kind: self.0.kind.clone(),
            description: Some(description.to_string()),
        }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Evaluate with a fresh context owned by this call.
    pub fn matches(&self, e: Element<'_>) -> EvalResult {
        let mut ctx = ConditionContext::new();
        self.evaluate(e, &mut ctx)
    }

    /// Evaluate inside an existing context.
    pub fn evaluate<'a>(&self, e: Element<'a>, ctx: &mut ConditionContext<'a>) -> EvalResult {
        match &self.0.kind {
            ConditionKind::True => Ok(true),
            ConditionKind::False => Ok(false),
            ConditionKind::ControlType(id) => Ok(e.control_type_id == *id),
            ConditionKind::Pattern { id, validator } => Ok(match e.pattern(*id) {
                Some(p) => validator.as_ref().is_none_or(|v| v(p)),
                None => false,
            }),
            ConditionKind::Predicate(f) => f(e),
            ConditionKind::Not(c) => Ok(!c.evaluate(e, ctx)?),
            ConditionKind::And(a, b) => Ok(a.evaluate(e, ctx)? && b.evaluate(e, ctx)?),
            ConditionKind::Or(a, b) => Ok(a.evaluate(e, ctx)? || b.evaluate(e, ctx)?),
            ConditionKind::ExactlyOne(cs) => {
                let mut count = 0;
                for c in cs {
                    if c.evaluate(e, ctx)? {
                        count += 1;
                        if count > 1 {
                            return Ok(false);
                        }
                    }
                }
                Ok(count == 1)
            }
            ConditionKind::Any(cs) => {
                for c in cs {
                    if c.evaluate(e, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionKind::All(cs) => {
                for c in cs {
                    if !c.evaluate(e, ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionKind::Parent(c) => match e.parent() {
                Some(p) => c.evaluate(p, ctx),
                None => Ok(false),
            },
            ConditionKind::AnyChild(c) => {
                let mut scope = ctx.enter(e);
                for child in e.children() {
                    if c.evaluate(child, &mut scope)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionKind::AnyDescendant(c) => {
                for d in e.descendants() {
                    if c.evaluate(d, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionKind::HasSameType => {
                let reference = ctx.reference_element().ok_or(EvaluationError::MissingContext)?;
                Ok(reference.control_type_id == e.control_type_id)
            }
            ConditionKind::SecondChild => Ok(match e.parent() {
                Some(p) => p.children().nth(1) == Some(e),
                None => false,
            }),
            ConditionKind::Compare { left, op, right } => {
                let l = left.value(e, ctx)?;
                let r = match right {
                    Operand::Int(i) => *i,
                    Operand::Value(v) => v.value(e, ctx)?,
                };
                Ok(op.apply(l, r))
            }
            ConditionKind::Recursive(cell) => match cell.get() {
                Some(body) => body.evaluate(e, ctx),
                None => Err(EvaluationError::UnboundRecursion),
            },
            ConditionKind::RecursiveRef(weak) => {
                let cell = weak.upgrade().ok_or(EvaluationError::UnboundRecursion)?;
                let body = cell.get().ok_or(EvaluationError::UnboundRecursion)?.clone();
                body.evaluate(e, ctx)
            }
        }
    }
}

/// Build a self-referential condition.
///
/// `build` receives a placeholder that evaluates to the finished condition.
/// The placeholder holds only a weak link to its owner, so no reference cycle
/// is formed and the whole structure is freed with the returned condition.
pub fn fixed_point<F>(build: F) -> Condition
where
    F: FnOnce(Condition) -> Condition,
{
    let cell: Arc<OnceLock<Condition>> = Arc::new(OnceLock::new());
    let recurse = Condition::from_kind(ConditionKind::RecursiveRef(Arc::downgrade(&cell)));
    let body = build(recurse);
    // A fresh cell cannot already be set.
    let _ = cell.set(body);
    Condition::from_kind(ConditionKind::Recursive(cell))
}

// ============================================================================
// Operators
// ============================================================================

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        Condition::from_kind(ConditionKind::And(self, rhs))
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        Condition::from_kind(ConditionKind::Or(self, rhs))
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        Condition::from_kind(ConditionKind::Not(self))
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn join(cs: &[Condition]) -> String {
    cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = &self.0.description {
            return write!(f, "{}", d);
        }
        match &self.0.kind {
            ConditionKind::True => write!(f, "True"),
            ConditionKind::False => write!(f, "False"),
            ConditionKind::ControlType(id) => {
                write!(f, "{}", control_type::control_type_name(*id).unwrap_or("Unknown"))
            }
            ConditionKind::Pattern { id, .. } => write!(f, "Pattern({})", id),
            ConditionKind::Predicate(_) => write!(f, "Predicate"),
            ConditionKind::Not(c) => write!(f, "NOT({})", c),
            ConditionKind::And(a, b) => write!(f, "({} AND {})", a, b),
            ConditionKind::Or(a, b) => write!(f, "({} OR {})", a, b),
            ConditionKind::ExactlyOne(cs) => write!(f, "ExactlyOne({})", join(cs)),
            ConditionKind::Any(cs) => write!(f, "Any({})", join(cs)),
            ConditionKind::All(cs) => write!(f, "All({})", join(cs)),
            ConditionKind::Parent(c) => write!(f, "Parent({})", c),
            ConditionKind::AnyChild(c) => write!(f, "AnyChild({})", c),
            ConditionKind::AnyDescendant(c) => write!(f, "AnyDescendant({})", c),
            ConditionKind::HasSameType => write!(f, "HasSameType"),
            ConditionKind::SecondChild => write!(f, "SecondChild"),
            ConditionKind::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            ConditionKind::Recursive(cell) => match cell.get() {
                Some(body) => write!(f, "{}", body),
                None => write!(f, "Unbound"),
            },
            ConditionKind::RecursiveRef(_) => write!(f, "Recurse"),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self)
    }
}

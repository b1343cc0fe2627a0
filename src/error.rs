use thiserror::Error;

/// Failure raised while evaluating a condition or a rule test against one element.
///
/// These never abort a batch: the runner downgrades them into a
/// `RuleExecutionError` result for the element being scanned.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error("condition requires a reference element but the context is empty")]
    MissingContext,

    #[error("recursive condition evaluated before its body was bound")]
    UnboundRecursion,

    #[error("property {property} is missing on element {element}")]
    MissingProperty { element: i32, property: String },

    #[error("invalid regular expression '{pattern}': {message}")]
    Regex { pattern: String, message: String },

    #[error("{0}")]
    Rule(String),
}

impl EvaluationError {
    pub fn rule<S: Into<String>>(message: S) -> Self {
        Self::Rule(message.into())
    }

    pub fn missing_property<S: Into<String>>(element: i32, property: S) -> Self {
        Self::MissingProperty { element, property: property.into() }
    }
}

/// How badly an external provider call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The call failed for this node only. Its data is treated as absent.
    Failed,
    /// The provider itself is gone. The scan cannot continue.
    Unavailable,
}

#[derive(Debug, Clone, Error)]
#[error("provider call failed ({kind:?}): {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self { kind: ProviderErrorKind::Failed, message: message.into() }
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self { kind: ProviderErrorKind::Unavailable, message: message.into() }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == ProviderErrorKind::Unavailable
    }
}

/// Errors that reach the caller of a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid parameter '{name}': {reason}")]
    Parameter { name: String, reason: String },

    #[error("scan was cancelled")]
    Cancelled,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScanError {
    pub fn parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::Parameter { name: name.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

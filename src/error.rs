//! Error types: structural errors (abort the parse) and `ParseFail` (the
//! currency of backtracking).

use std::fmt;

/// A backtracking failure: the input didn't conform to some alternative.
///
/// Represented as a plain sum-type value rather than a thrown exception so
/// that ordinary backtracking doesn't pay throw/catch overhead on the hot
/// path (see design notes on `ParseFail`).
#[derive(Debug, Clone)]
pub struct ParseFail {
    pub position: usize,
    pub message: String,
    pub children: Vec<ParseFail>,
    /// A triggered failure forbids the enclosing rule from trying further
    /// alternatives. It is re-raised immediately by the engine, then
    /// unwrapped to an ordinary failure one frame up.
    pub triggered: bool,
}

impl ParseFail {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        ParseFail {
            position,
            message: message.into(),
            children: Vec::new(),
            triggered: false,
        }
    }

    pub fn triggered(mut self) -> Self {
        self.triggered = true;
        self
    }

    /// Strip the triggered flag, as happens one frame above where it was raised.
    pub fn untrigger(mut self) -> Self {
        self.triggered = false;
        self
    }

    /// Combine several failed alternatives into one, per §4.2 step 3.
    pub fn combine(position: usize, children: Vec<ParseFail>) -> Self {
        if children.len() == 1 {
            return children.into_iter().next().unwrap();
        }
        let message = format!(
            "All alternatives failed:\n{}",
            children
                .iter()
                .map(|c| format!("    {}", c.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
        ParseFail {
            position,
            message,
            children,
            triggered: false,
        }
    }
}

impl fmt::Display for ParseFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at position {})", self.message, self.position)
    }
}

impl std::error::Error for ParseFail {}

/// Errors raised when reading a specification or resolving a reference —
/// programmer-directed, never caught by the engine's backtracking.
#[derive(thiserror::Error, Debug)]
pub enum StructuralError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unresolved name: {0}")]
    Name(String),
    #[error("type error: {0}")]
    Type(String),
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

impl StructuralError {
    pub fn syntax(msg: impl Into<String>) -> Self {
        StructuralError::Syntax(msg.into())
    }
    pub fn name(msg: impl Into<String>) -> Self {
        StructuralError::Name(msg.into())
    }
    pub fn type_err(msg: impl Into<String>) -> Self {
        StructuralError::Type(msg.into())
    }
}

/// The external file-loader collaborator's error type (§1, §6): failures
/// resolving or reading an `include`d sibling specification.
#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    #[error("cannot resolve include '{0}': {1}")]
    NotFound(String, std::io::Error),
}

/// Top-level error a `Parser::parse` call can return.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Fail(#[from] ParseFail),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

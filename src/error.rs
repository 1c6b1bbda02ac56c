use crate::Position;
use std::fmt::{Display, Formatter};

/// The single error type raised by every fallible operation in this crate.
///
/// There is no hierarchy of error kinds: a `JsonError` is a message, an optional
/// [`Position`] snapshot taken at the point of failure, and an optional wrapped
/// cause. Callers distinguish failures by inspecting the message, matching the
/// teacher crate's `ParseError`/`ImplementationError` shape rather than pulling
/// in a derive-based error crate.
#[derive(Debug)]
pub struct JsonError {
    message: String,
    position: Option<Position>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl JsonError {
    /// A free-form message with no position or cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            source: None,
        }
    }

    /// Alias for [`JsonError::new`]; reads better at call sites that already
    /// have a `msg` in scope.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// An unexpected character encountered by the lexer.
    pub fn unexpected_char(c: char, position: Position) -> Self {
        Self {
            message: format!("unexpected character '{}'", c),
            position: Some(position),
            source: None,
        }
    }

    /// An unexpected terminal seen while expanding `nonterminal` in the parse table.
    pub fn unexpected_token(nonterminal: &str, terminal: &str, position: Position) -> Self {
        Self {
            message: format!(
                "invalid token '{}' in input string while parsing {}",
                terminal, nonterminal
            ),
            position: Some(position),
            source: None,
        }
    }

    /// Wraps an underlying cause (e.g. an I/O error from a `CharSource`/`CharSink`).
    pub fn wrapping(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            position: None,
            source: Some(Box::new(cause)),
        }
    }

    /// Attaches or replaces the position snapshot on this error.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} at {}", self.message, position),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|b| b.as_ref() as &(dyn std::error::Error + 'static))
    }
}

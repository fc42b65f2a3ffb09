use std::fmt;

use thiserror::Error;

use crate::tokenizer::Location;

pub type Result<T> = std::result::Result<T, Error>;

/// Any failure surfaced by the crate's public entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// No sub-lexer recognized the input at `location`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to lex token{}, at {location}", .hint.as_ref().map(|h| format!(" after {h}")).unwrap_or_default())]
pub struct LexError {
    pub location: Location,
    /// Value of the last token produced before the failure, if any.
    pub hint: Option<String>,
}

/// A mandatory grammar element that was absent, recorded where it was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]: expected {}, got {}",
            self.location, self.expected, self.found
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// No statement form matched at `location`. `diagnostics` holds what each
    /// partially matched alternative was missing.
    #[error("failed to parse at {location}: expected {expected}, got {found}")]
    Unexpected {
        location: Location,
        expected: String,
        found: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// Two statements follow each other without a `;` in between.
    #[error("missing semicolon between statements at {location}, got {found}")]
    MissingSeparator { location: Location, found: String },
}

impl ParseError {
    /// Diagnostics gathered from partially matched statement forms.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Unexpected { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

/// Failures of the table engine when applying a statement to the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("table does not exist: {0}")]
    TableDoesNotExist(String),

    #[error("column does not exist: {0}")]
    ColumnDoesNotExist(String),

    #[error("select item is not valid: {0}")]
    InvalidSelectItem(String),

    #[error("invalid datatype: {0}")]
    InvalidDatatype(String),

    #[error("missing values: {0}")]
    MissingValues(String),

    #[error("invalid value {value:?} for {datatype} column {column}")]
    InvalidValue {
        column: String,
        datatype: String,
        value: String,
    },
}

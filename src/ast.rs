use crate::tokenizer::Token;

/// One parsed statement. A parse produces these in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    CreateTable(CreateTableStatement),
}

/// An expression in a select list or a `VALUES` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A single identifier, text or integer token.
    Literal(Token),
    /// The `*` select item, expanded to every column of the source table.
    Wildcard(Token),
}

impl Expression {
    /// The token the expression was parsed from.
    pub fn token(&self) -> &Token {
        match self {
            Self::Literal(token) | Self::Wildcard(token) => token,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: Token,
    /// A type keyword; only `int` and `text` are accepted by the engine.
    pub datatype: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub name: Token,
    /// In declaration order, which is also the physical row layout.
    pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: Token,
    /// Matched positionally against the full table schema.
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub items: Vec<Expression>,
    pub from: Option<Token>,
}

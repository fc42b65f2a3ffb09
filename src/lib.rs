pub mod ast;
pub mod cell;
pub mod data_type;
pub mod database;
pub mod error;
pub mod parser;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use ast::{
    ColumnDefinition, CreateTableStatement, Expression, InsertStatement, SelectStatement,
    Statement,
};
pub use cell::Cell;
pub use data_type::DataType;
pub use database::{Database, ExecutionResult, ResultColumn, ResultSet};
pub use error::{Diagnostic, EngineError, Error, LexError, ParseError, Result};
pub use parser::{Parser, parse};
pub use table::{ColumnDef, Schema, Table};
pub use tokenizer::{Token, TokenKind, Tokenizer};
pub use value::Value;

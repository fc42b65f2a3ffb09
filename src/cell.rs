use crate::data_type::DataType;
use crate::tokenizer::{Token, TokenKind};
use crate::value::Value;

/// A stored value in its encoded byte form.
///
/// The cell does not know its own type: `int` cells hold 4 big-endian bytes
/// and `text` cells hold raw UTF-8, and the column's declared [DataType]
/// decides how they are read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell(Box<[u8]>);

impl Cell {
    /// Encodes a 32-bit integer as 4 big-endian bytes.
    pub fn from_i32(value: i32) -> Self {
        Self(Box::new(value.to_be_bytes()))
    }

    /// Stores the UTF-8 bytes of `value` unchanged.
    pub fn from_text(value: &str) -> Self {
        Self(value.as_bytes().into())
    }

    /// Encodes a literal token for a column of type `data_type`.
    ///
    /// Returns `None` when the literal cannot be stored in that type: `int`
    /// takes integer literals that fit in an `i32`, `text` takes text literals.
    ///
    /// # Example
    /// ```
    /// # use minisql::{Cell, DataType};
    /// # use minisql::tokenizer::{Location, Token, TokenKind};
    /// let token = Token::new("42", TokenKind::Integer, Location::default());
    /// let cell = Cell::from_literal(&token, DataType::Int).unwrap();
    /// assert_eq!(cell.as_bytes(), &[0, 0, 0, 42]);
    /// assert_eq!(cell.as_i32(), Some(42));
    /// ```
    pub fn from_literal(token: &Token, data_type: DataType) -> Option<Self> {
        match (data_type, token.kind) {
            (DataType::Int, TokenKind::Integer) => token.value.parse::<i32>().ok().map(Self::from_i32),
            (DataType::Text, TokenKind::Text) => Some(Self::from_text(&token.value)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Reads the cell as a big-endian `i32`. `None` if it is not 4 bytes long.
    pub fn as_i32(&self) -> Option<i32> {
        let bytes = <[u8; 4]>::try_from(&self.0[..]).ok()?;
        Some(i32::from_be_bytes(bytes))
    }

    /// Reads the cell as text. `None` if the bytes are not valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Interprets the cell according to the column type it belongs to.
    pub fn decode(&self, data_type: DataType) -> Option<Value> {
        match data_type {
            DataType::Int => self.as_i32().map(Value::Int),
            DataType::Text => self.as_text().map(|s| Value::Text(s.into())),
        }
    }
}

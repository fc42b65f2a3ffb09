use crate::tokenizer::{Keyword, Token, TokenKind};

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and how their cells are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// A 32-bit signed integer, stored as 4 big-endian bytes.
    Int,
    /// A variable-length UTF-8 character string.
    Text,
}

impl DataType {
    /// Resolves the data type named by a type keyword token (`int` or `text`).
    ///
    /// Returns `None` for any other token, including other keywords.
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Keyword {
            return None;
        }
        match Keyword::lookup(&token.value)? {
            Keyword::Int => Some(Self::Int),
            Keyword::Text => Some(Self::Text),
            _ => None,
        }
    }

    /// The lowercase SQL name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_keywords() {
        assert_eq!(
            DataType::from_token(&Token::keyword(Keyword::Int)),
            Some(DataType::Int)
        );
        assert_eq!(
            DataType::from_token(&Token::keyword(Keyword::Text)),
            Some(DataType::Text)
        );
    }

    #[test]
    fn test_other_tokens_are_not_types() {
        assert_eq!(DataType::from_token(&Token::keyword(Keyword::Into)), None);
        let ident = Token::new("int", TokenKind::Identifier, Default::default());
        assert_eq!(DataType::from_token(&ident), None);
    }
}

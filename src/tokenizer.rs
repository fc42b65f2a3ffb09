use std::fmt;

use crate::error::LexError;

/// A zero-based position in the source text, used for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The lexical class of a [Token].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    /// A single-quoted string literal.
    Text,
    /// A numeric literal (digits, optional fraction, optional exponent).
    Integer,
}

/// The reserved words of the language. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Select,
    From,
    Table,
    Insert,
    Into,
    Values,
    // --- Data Types ---
    Int,
    Text,
}

impl Keyword {
    pub const ALL: [Keyword; 9] = [
        Keyword::Create,
        Keyword::Select,
        Keyword::From,
        Keyword::Table,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Int,
        Keyword::Text,
    ];

    /// The canonical (lowercase) spelling of the keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Select => "select",
            Self::From => "from",
            Self::Table => "table",
            Self::Insert => "insert",
            Self::Into => "into",
            Self::Values => "values",
            Self::Int => "int",
            Self::Text => "text",
        }
    }

    /// Looks up a keyword by its canonical spelling.
    pub fn lookup(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == word)
    }
}

/// Punctuation recognized by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Statement terminator `;`
    Semicolon,
    /// Wildcard `*`
    Asterisk,
    /// Comma `,`
    Comma,
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Comma,
        Symbol::Semicolon,
        Symbol::Asterisk,
        Symbol::LeftParen,
        Symbol::RightParen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semicolon => ";",
            Self::Asterisk => "*",
            Self::Comma => ",",
            Self::LeftParen => "(",
            Self::RightParen => ")",
        }
    }
}

/// The smallest meaningful unit of the query language.
///
/// Two tokens are equal when their `value` and `kind` match; the location is
/// diagnostic metadata and takes no part in comparisons.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub location: Location,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.kind == other.kind
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind, location: Location) -> Self {
        Self {
            value: value.into(),
            kind,
            location,
        }
    }

    /// A location-less keyword token, used as a template to compare against.
    pub fn keyword(keyword: Keyword) -> Self {
        Self::new(keyword.as_str(), TokenKind::Keyword, Location::default())
    }

    /// A location-less symbol token, used as a template to compare against.
    pub fn symbol(symbol: Symbol) -> Self {
        Self::new(symbol.as_str(), TokenKind::Symbol, Location::default())
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.value == keyword.as_str()
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol.as_str()
    }
}

/// Position of the scanner: an index into the character buffer plus the
/// line/column it corresponds to.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    pointer: usize,
    location: Location,
}

impl Cursor {
    /// Returns the cursor moved past `c`. A newline starts a new line.
    fn step(self, c: char) -> Self {
        let location = if c == '\n' {
            Location {
                line: self.location.line + 1,
                column: 0,
            }
        } else {
            Location {
                line: self.location.line,
                column: self.location.column + 1,
            }
        };
        Self {
            pointer: self.pointer + 1,
            location,
        }
    }

    /// Returns the cursor moved past `n` characters on the current line.
    fn skip(self, n: usize) -> Self {
        Self {
            pointer: self.pointer + n,
            location: Location {
                line: self.location.line,
                column: self.location.column + n,
            },
        }
    }
}

/// Result of a sub-lexer: `None` when it does not apply at the cursor,
/// otherwise the produced token (absent for whitespace) and the advanced cursor.
type Lexed = Option<(Option<Token>, Cursor)>;

/// A sub-lexer, tried at the current cursor in a fixed order.
type SubLexer = fn(&Tokenizer, Cursor) -> Lexed;

/// A lexical scanner (lexer) that converts raw source text into a sequence of [Token]s.
///
/// Every sub-lexer is a pure function of the cursor it is given: on a miss
/// the caller's cursor is untouched and the next sub-lexer is tried.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy indexing.
    input: Vec<char>,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
        }
    }

    /// Processes the entire input and returns its tokens in source order.
    ///
    /// # Errors
    /// Returns a [LexError] at the first position where no sub-lexer applies,
    /// carrying the value of the previous token as a hint.
    ///
    /// # Example
    /// ```
    /// # use minisql::tokenizer::{Tokenizer, TokenKind};
    /// let tokens = Tokenizer::new("SELECT name").tokenize().unwrap();
    /// assert_eq!(tokens[0].value, "select");
    /// assert_eq!(tokens[1].kind, TokenKind::Identifier);
    /// ```
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        const LEXERS: [SubLexer; 5] = [
            Tokenizer::lex_keyword,
            Tokenizer::lex_symbol,
            Tokenizer::lex_string,
            Tokenizer::lex_number,
            Tokenizer::lex_identifier,
        ];

        let mut tokens: Vec<Token> = Vec::new();
        let mut cursor = Cursor::default();

        'lex: while cursor.pointer < self.input.len() {
            for lexer in LEXERS {
                if let Some((token, next)) = lexer(self, cursor) {
                    cursor = next;
                    tokens.extend(token);
                    continue 'lex;
                }
            }

            return Err(LexError {
                location: cursor.location,
                hint: tokens.last().map(|t| t.value.clone()),
            });
        }

        Ok(tokens)
    }

    fn char_at(&self, pointer: usize) -> Option<char> {
        self.input.get(pointer).copied()
    }

    fn is_identifier_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '$'
    }

    // --- Sub-lexers ---

    /// Matches the longest keyword at the cursor.
    ///
    /// A match directly followed by an identifier character is rejected so that
    /// words such as `intox` or `selection` are left to the identifier lexer.
    fn lex_keyword(&self, ic: Cursor) -> Lexed {
        let options = Keyword::ALL.map(|k| k.as_str());
        let matched = self.longest_match(ic, &options)?;

        let next = ic.skip(matched.len());
        if self.char_at(next.pointer).is_some_and(Self::is_identifier_char) {
            return None;
        }

        Some((
            Some(Token::new(matched, TokenKind::Keyword, ic.location)),
            next,
        ))
    }

    /// Matches whitespace (producing no token) or the longest symbol.
    fn lex_symbol(&self, ic: Cursor) -> Lexed {
        let c = self.char_at(ic.pointer)?;
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            return Some((None, ic.step(c)));
        }

        let options = Symbol::ALL.map(|s| s.as_str());
        let matched = self.longest_match(ic, &options)?;

        Some((
            Some(Token::new(matched, TokenKind::Symbol, ic.location)),
            ic.skip(matched.len()),
        ))
    }

    fn lex_string(&self, ic: Cursor) -> Lexed {
        let (value, cursor) = self.lex_delimited(ic, '\'')?;
        Some((
            Some(Token::new(value, TokenKind::Text, ic.location)),
            cursor,
        ))
    }

    /// Reads a numeric literal: digits with at most one decimal point and an
    /// optional exponent (`e`, optional sign, at least one digit).
    ///
    /// Any malformed sequence is a miss; no partial token is produced.
    fn lex_number(&self, ic: Cursor) -> Lexed {
        let mut cursor = ic;
        let mut period_found = false;
        let mut exponent_found = false;
        let mut digits = 0;

        while let Some(c) = self.char_at(cursor.pointer) {
            match c {
                '0'..='9' => digits += 1,
                '.' => {
                    if period_found || exponent_found {
                        return None;
                    }
                    period_found = true;
                }
                'e' | 'E' if digits > 0 => {
                    if exponent_found {
                        return None;
                    }
                    exponent_found = true;
                    cursor = cursor.step(c);

                    if let Some(sign @ ('+' | '-')) = self.char_at(cursor.pointer) {
                        cursor = cursor.step(sign);
                    }
                    // the exponent needs at least one digit of its own
                    if !self.char_at(cursor.pointer).is_some_and(|d| d.is_ascii_digit()) {
                        return None;
                    }
                    continue;
                }
                _ => break,
            }
            cursor = cursor.step(c);
        }

        if digits == 0 {
            return None;
        }

        let value: String = self.input[ic.pointer..cursor.pointer].iter().collect();
        Some((
            Some(Token::new(value, TokenKind::Integer, ic.location)),
            cursor,
        ))
    }

    /// Reads a bare identifier (`[A-Za-z][A-Za-z0-9_$]*`, folded to lowercase)
    /// or a double-quoted one (kept verbatim).
    fn lex_identifier(&self, ic: Cursor) -> Lexed {
        if let Some((value, cursor)) = self.lex_delimited(ic, '"') {
            return Some((
                Some(Token::new(value, TokenKind::Identifier, ic.location)),
                cursor,
            ));
        }

        let first = self.char_at(ic.pointer)?;
        if !first.is_ascii_alphabetic() {
            return None;
        }

        let mut cursor = ic.step(first);
        while let Some(c) = self.char_at(cursor.pointer) {
            if !Self::is_identifier_char(c) {
                break;
            }
            cursor = cursor.step(c);
        }

        let value: String = self.input[ic.pointer..cursor.pointer].iter().collect();
        Some((
            Some(Token::new(
                value.to_lowercase(),
                TokenKind::Identifier,
                ic.location,
            )),
            cursor,
        ))
    }

    // --- Shared scanning logic ---

    /// Scans a literal enclosed in `delimiter`. A doubled delimiter inside the
    /// literal stands for one delimiter character (SQL escaping, not backslash).
    ///
    /// Returns the unescaped content and the cursor past the closing delimiter,
    /// or `None` if the cursor is not on a delimiter or the literal is unterminated.
    fn lex_delimited(&self, ic: Cursor, delimiter: char) -> Option<(String, Cursor)> {
        if self.char_at(ic.pointer)? != delimiter {
            return None;
        }

        let mut cursor = ic.step(delimiter);
        let mut value = String::new();

        while let Some(c) = self.char_at(cursor.pointer) {
            cursor = cursor.step(c);

            if c == delimiter {
                if self.char_at(cursor.pointer) == Some(delimiter) {
                    value.push(delimiter);
                    cursor = cursor.step(delimiter);
                    continue;
                }
                return Some((value, cursor));
            }

            value.push(c);
        }

        None
    }

    /// Finds the longest option matching the input at the cursor.
    ///
    /// Characters are accumulated one at a time (lowercased) while the set of
    /// options sharing the accumulated prefix is narrowed. An exact match is
    /// remembered but scanning goes on, so `into` wins over `int`.
    fn longest_match(&self, ic: Cursor, options: &[&'static str]) -> Option<&'static str> {
        let mut value = String::new();
        let mut candidates = options.to_vec();
        let mut best = None;

        for &c in &self.input[ic.pointer..] {
            value.extend(c.to_lowercase());

            candidates.retain(|option| {
                if *option == value {
                    best = Some(*option);
                    return false;
                }
                option.starts_with(value.as_str())
            });

            if candidates.is_empty() {
                break;
            }
        }

        best
    }
}

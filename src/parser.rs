use tracing::trace;

use crate::ast::*;
use crate::error::{Diagnostic, ParseError};
use crate::tokenizer::{Keyword, Location, Symbol, Token, TokenKind, Tokenizer};

/// Why a trial parse produced no node.
#[derive(Debug)]
enum Miss {
    /// The construct does not start at the cursor; the next alternative is tried.
    NoMatch,
    /// The construct started but a mandatory element is missing.
    Failed(Diagnostic),
}

/// A trial parse: the node and the cursor past it, or a [Miss].
///
/// On a miss the caller still holds its own cursor; nothing is consumed.
type Attempt<T> = Result<(T, usize), Miss>;

type StatementParser = fn(&Parser, usize) -> Attempt<Statement>;

/// Tokenizes and parses `source` into its statements, in source order.
///
/// # Errors
/// Returns [ParseError::Lex] when tokenizing fails, [ParseError::Unexpected]
/// when no statement form matches and [ParseError::MissingSeparator] when two
/// statements are not separated by `;`.
///
/// # Example
/// ```
/// # use minisql::{parse, Statement};
/// let statements = parse("CREATE TABLE t (id INT); SELECT id FROM t").unwrap();
/// assert_eq!(statements.len(), 2);
/// assert!(matches!(statements[1], Statement::Select(_)));
/// ```
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = Tokenizer::new(source).tokenize()?;
    Parser::new(tokens).parse()
}

/// Recursive-descent parser with backtracking between statement forms.
///
/// Every `parse_*` method is a function of the token buffer and a starting
/// cursor; none of them mutates the parser.
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Creates a parser, appending a `;` if the tokens do not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let terminator = Token::symbol(Symbol::Semicolon);
        if let Some(last) = tokens.last() {
            if *last != terminator {
                let location = last.location;
                tokens.push(Token {
                    location,
                    ..terminator
                });
            }
        }
        Self { tokens }
    }

    /// Parses every statement. Statements must be separated by at least one `;`,
    /// extra consecutive terminators are consumed.
    pub fn parse(&self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        let mut cursor = 0;

        while cursor < self.tokens.len() {
            let (statement, next) = self.parse_statement(cursor).map_err(|diagnostics| {
                let (location, found) = self.describe(cursor);
                ParseError::Unexpected {
                    location,
                    expected: "statement".into(),
                    found,
                    diagnostics,
                }
            })?;
            statements.push(statement);
            cursor = next;

            let mut terminated = false;
            while let Some(next) = self.expect_symbol(cursor, Symbol::Semicolon) {
                cursor = next;
                terminated = true;
            }

            if !terminated {
                let (location, found) = self.describe(cursor);
                return Err(ParseError::MissingSeparator { location, found });
            }
        }

        Ok(statements)
    }

    /// Tries SELECT, then INSERT, then CREATE TABLE from the same cursor.
    ///
    /// Returns the diagnostics of every form that started to match but failed.
    fn parse_statement(&self, ic: usize) -> Result<(Statement, usize), Vec<Diagnostic>> {
        let alternatives: [(&str, StatementParser); 3] = [
            ("select", Parser::select_statement),
            ("insert", Parser::insert_statement),
            ("create table", Parser::create_table_statement),
        ];

        let mut diagnostics = Vec::new();
        for (name, alternative) in alternatives {
            match alternative(self, ic) {
                Ok(parsed) => return Ok(parsed),
                Err(Miss::NoMatch) => {}
                Err(Miss::Failed(diagnostic)) => {
                    trace!(statement = name, %diagnostic, "statement alternative failed");
                    diagnostics.push(diagnostic);
                }
            }
        }

        Err(diagnostics)
    }

    fn select_statement(&self, ic: usize) -> Attempt<Statement> {
        self.parse_select(ic)
            .map(|(select, cursor)| (Statement::Select(select), cursor))
    }

    fn insert_statement(&self, ic: usize) -> Attempt<Statement> {
        self.parse_insert(ic)
            .map(|(insert, cursor)| (Statement::Insert(insert), cursor))
    }

    fn create_table_statement(&self, ic: usize) -> Attempt<Statement> {
        self.parse_create_table(ic)
            .map(|(create, cursor)| (Statement::CreateTable(create), cursor))
    }

    /// `SELECT <expr-list> [FROM <identifier>]`
    fn parse_select(&self, ic: usize) -> Attempt<SelectStatement> {
        let cursor = self
            .expect_keyword(ic, Keyword::Select)
            .ok_or(Miss::NoMatch)?;

        let delimiters = [
            Token::keyword(Keyword::From),
            Token::symbol(Symbol::Semicolon),
        ];
        let (items, cursor) = self.parse_expressions(cursor, &delimiters, true)?;

        let Some(cursor) = self.expect_keyword(cursor, Keyword::From) else {
            return Ok((SelectStatement { items, from: None }, cursor));
        };

        let (from, cursor) = self
            .token_of_kind(cursor, TokenKind::Identifier)
            .ok_or_else(|| self.miss(cursor, "table name after FROM"))?;

        Ok((
            SelectStatement {
                items,
                from: Some(from.clone()),
            },
            cursor,
        ))
    }

    /// `INSERT INTO <identifier> VALUES ( <expr-list> )`
    fn parse_insert(&self, ic: usize) -> Attempt<InsertStatement> {
        let cursor = self
            .expect_keyword(ic, Keyword::Insert)
            .ok_or(Miss::NoMatch)?;
        let cursor = self
            .expect_keyword(cursor, Keyword::Into)
            .ok_or_else(|| self.miss(cursor, "keyword INTO"))?;

        let (table, cursor) = self
            .token_of_kind(cursor, TokenKind::Identifier)
            .ok_or_else(|| self.miss(cursor, "table name"))?;

        let cursor = self
            .expect_keyword(cursor, Keyword::Values)
            .ok_or_else(|| self.miss(cursor, "keyword VALUES"))?;
        let cursor = self
            .expect_symbol(cursor, Symbol::LeftParen)
            .ok_or_else(|| self.miss(cursor, "'('"))?;

        let delimiters = [Token::symbol(Symbol::RightParen)];
        let (values, cursor) = self.parse_expressions(cursor, &delimiters, false)?;

        let cursor = self
            .expect_symbol(cursor, Symbol::RightParen)
            .ok_or_else(|| self.miss(cursor, "')'"))?;

        Ok((
            InsertStatement {
                table: table.clone(),
                values,
            },
            cursor,
        ))
    }

    /// `CREATE TABLE <identifier> ( <column-def-list> )`
    fn parse_create_table(&self, ic: usize) -> Attempt<CreateTableStatement> {
        let cursor = self
            .expect_keyword(ic, Keyword::Create)
            .ok_or(Miss::NoMatch)?;
        let cursor = self
            .expect_keyword(cursor, Keyword::Table)
            .ok_or_else(|| self.miss(cursor, "keyword TABLE"))?;

        let (name, cursor) = self
            .token_of_kind(cursor, TokenKind::Identifier)
            .ok_or_else(|| self.miss(cursor, "table name"))?;

        let cursor = self
            .expect_symbol(cursor, Symbol::LeftParen)
            .ok_or_else(|| self.miss(cursor, "'('"))?;

        let (columns, cursor) =
            self.parse_column_definitions(cursor, &Token::symbol(Symbol::RightParen))?;

        let cursor = self
            .expect_symbol(cursor, Symbol::RightParen)
            .ok_or_else(|| self.miss(cursor, "')'"))?;

        Ok((
            CreateTableStatement {
                name: name.clone(),
                columns,
            },
            cursor,
        ))
    }

    /// One or more comma-separated expressions, ending before any of `delimiters`.
    fn parse_expressions(
        &self,
        ic: usize,
        delimiters: &[Token],
        allow_wildcard: bool,
    ) -> Attempt<Vec<Expression>> {
        let mut cursor = ic;
        let mut expressions = Vec::new();

        loop {
            if self.tokens.get(cursor).is_some_and(|t| delimiters.contains(t)) {
                if expressions.is_empty() {
                    return Err(self.miss(cursor, "expression"));
                }
                break;
            }

            if !expressions.is_empty() {
                cursor = self
                    .expect_symbol(cursor, Symbol::Comma)
                    .ok_or_else(|| self.miss(cursor, "','"))?;
            }

            let (expression, next) = self.parse_expression(cursor, allow_wildcard)?;
            expressions.push(expression);
            cursor = next;
        }

        Ok((expressions, cursor))
    }

    /// A literal token, or `*` where a wildcard is allowed.
    fn parse_expression(&self, cursor: usize, allow_wildcard: bool) -> Attempt<Expression> {
        let token = self
            .tokens
            .get(cursor)
            .ok_or_else(|| self.miss(cursor, "expression"))?;

        match token.kind {
            TokenKind::Identifier | TokenKind::Text | TokenKind::Integer => {
                Ok((Expression::Literal(token.clone()), cursor + 1))
            }
            TokenKind::Symbol if token.is_symbol(Symbol::Asterisk) => {
                if !allow_wildcard {
                    return Err(self.miss(cursor, "expression ('*' is only valid as a select item)"));
                }
                Ok((Expression::Wildcard(token.clone()), cursor + 1))
            }
            _ => Err(self.miss(cursor, "expression")),
        }
    }

    /// One or more `<identifier> <keyword>` pairs separated by commas, ending
    /// before `delimiter`. The type keyword is checked by the engine.
    fn parse_column_definitions(
        &self,
        ic: usize,
        delimiter: &Token,
    ) -> Attempt<Vec<ColumnDefinition>> {
        let mut cursor = ic;
        let mut columns = Vec::new();

        loop {
            if self.tokens.get(cursor) == Some(delimiter) {
                if columns.is_empty() {
                    return Err(self.miss(cursor, "column definition"));
                }
                break;
            }

            if !columns.is_empty() {
                cursor = self
                    .expect_symbol(cursor, Symbol::Comma)
                    .ok_or_else(|| self.miss(cursor, "','"))?;
            }

            let (name, next) = self
                .token_of_kind(cursor, TokenKind::Identifier)
                .ok_or_else(|| self.miss(cursor, "column name"))?;
            cursor = next;

            let (datatype, next) = self
                .token_of_kind(cursor, TokenKind::Keyword)
                .ok_or_else(|| self.miss(cursor, "column type"))?;
            cursor = next;

            columns.push(ColumnDefinition {
                name: name.clone(),
                datatype: datatype.clone(),
            });
        }

        Ok((columns, cursor))
    }

    // --- Helpers ---

    fn expect_token(&self, cursor: usize, expected: &Token) -> Option<usize> {
        self.tokens
            .get(cursor)
            .filter(|token| *token == expected)
            .map(|_| cursor + 1)
    }

    fn expect_keyword(&self, cursor: usize, keyword: Keyword) -> Option<usize> {
        self.expect_token(cursor, &Token::keyword(keyword))
    }

    fn expect_symbol(&self, cursor: usize, symbol: Symbol) -> Option<usize> {
        self.expect_token(cursor, &Token::symbol(symbol))
    }

    fn token_of_kind(&self, cursor: usize, kind: TokenKind) -> Option<(&Token, usize)> {
        self.tokens
            .get(cursor)
            .filter(|token| token.kind == kind)
            .map(|token| (token, cursor + 1))
    }

    /// Location and text of the token at `cursor`, for error messages.
    ///
    /// Every list stops at the trailing `;`, so a cursor past the buffer only
    /// comes from an empty source and falls back to the last token.
    fn describe(&self, cursor: usize) -> (Location, String) {
        self.tokens
            .get(cursor)
            .or_else(|| self.tokens.last())
            .map(|token| (token.location, token.value.clone()))
            .unwrap_or_default()
    }

    fn miss(&self, cursor: usize, expected: &str) -> Miss {
        let (location, found) = self.describe(cursor);
        Miss::Failed(Diagnostic {
            location,
            expected: expected.into(),
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    fn parse_one(sql: &str) -> Statement {
        let mut statements = parse(sql).unwrap();
        assert_eq!(statements.len(), 1);
        statements.remove(0)
    }

    fn values(expressions: &[Expression]) -> Vec<&str> {
        expressions
            .iter()
            .map(|e| e.token().value.as_str())
            .collect()
    }

    #[test]
    fn test_parse_create_table() {
        let statement = parse_one("CREATE TABLE users (id INT, name TEXT)");

        match statement {
            Statement::CreateTable(ct) => {
                assert_eq!(ct.name.value, "users");
                assert_eq!(ct.columns.len(), 2);
                assert_eq!(ct.columns[0].name.value, "id");
                assert_eq!(
                    DataType::from_token(&ct.columns[0].datatype),
                    Some(DataType::Int)
                );
                assert_eq!(ct.columns[1].name.value, "name");
                assert_eq!(
                    DataType::from_token(&ct.columns[1].datatype),
                    Some(DataType::Text)
                );
            }
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_parse_insert() {
        match parse_one("INSERT INTO users VALUES (1, 'Alice');") {
            Statement::Insert(insert) => {
                assert_eq!(insert.table.value, "users");
                assert_eq!(values(&insert.values), vec!["1", "Alice"]);
                assert_eq!(insert.values[1].token().kind, TokenKind::Text);
            }
            _ => panic!("Expected Insert"),
        }
    }

    #[test]
    fn test_parse_select() {
        match parse_one("SELECT name, id FROM users") {
            Statement::Select(select) => {
                assert_eq!(values(&select.items), vec!["name", "id"]);
                assert_eq!(select.from.map(|t| t.value), Some("users".to_string()));
            }
            _ => panic!("Expected Select"),
        }
    }

    #[test]
    fn test_parse_select_without_from() {
        match parse_one("select 1, 'a'") {
            Statement::Select(select) => {
                assert_eq!(values(&select.items), vec!["1", "a"]);
                assert!(select.from.is_none());
            }
            _ => panic!("Expected Select"),
        }
    }

    #[test]
    fn test_parse_select_star() {
        match parse_one("SELECT * FROM users") {
            Statement::Select(select) => {
                assert!(matches!(select.items[..], [Expression::Wildcard(_)]));
            }
            _ => panic!("Expected Select"),
        }
    }

    #[test]
    fn test_star_rejected_in_values() {
        let err = parse("INSERT INTO t VALUES (*)").unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].expected.contains("select item"));
        assert_eq!(diagnostics[0].found, "*");
    }

    #[test]
    fn test_parse_statement_batch() {
        let statements = parse(
            "CREATE TABLE t (a INT);; INSERT INTO t VALUES (1);\nSELECT a FROM t;",
        )
        .unwrap();

        assert!(matches!(statements[0], Statement::CreateTable(_)));
        assert!(matches!(statements[1], Statement::Insert(_)));
        assert!(matches!(statements[2], Statement::Select(_)));
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("  \n").unwrap(), vec![]);
    }

    #[test]
    fn test_missing_separator() {
        let err = parse("SELECT a FROM t SELECT b FROM t;").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingSeparator {
                location: Location { line: 0, column: 16 },
                found: "select".into(),
            }
        );
    }

    #[test]
    fn test_expected_statement() {
        let err = parse("FROM t").unwrap_err();
        match err {
            ParseError::Unexpected {
                expected,
                found,
                diagnostics,
                ..
            } => {
                assert_eq!(expected, "statement");
                assert_eq!(found, "from");
                assert!(diagnostics.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_diagnostic_names_offending_token() {
        let err = parse("INSERT INTO users (1, 2)").unwrap_err();
        assert_eq!(
            err.diagnostics(),
            &[Diagnostic {
                location: Location { line: 0, column: 18 },
                expected: "keyword VALUES".into(),
                found: "(".into(),
            }]
        );
    }

    #[test]
    fn test_missing_comma_in_column_list() {
        let err = parse("CREATE TABLE t (a INT b TEXT)").unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics[0].expected, "','");
        assert_eq!(diagnostics[0].found, "b");
    }

    #[test]
    fn test_empty_lists_are_rejected() {
        assert!(parse("CREATE TABLE t ()").is_err());
        assert!(parse("INSERT INTO t VALUES ()").is_err());
        assert!(parse("SELECT FROM t").is_err());
    }

    #[test]
    fn test_any_keyword_parses_as_column_type() {
        match parse_one("CREATE TABLE t (a values)") {
            Statement::CreateTable(ct) => assert_eq!(ct.columns[0].datatype.value, "values"),
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_failed_alternative_does_not_consume() {
        // the select attempt fails on the missing table name; the batch
        // then reports from the start of the statement
        let err = parse("SELECT a FROM 'x'").unwrap_err();
        match err {
            ParseError::Unexpected {
                location,
                found,
                diagnostics,
                ..
            } => {
                assert_eq!(location, Location { line: 0, column: 0 });
                assert_eq!(found, "select");
                assert_eq!(diagnostics[0].expected, "table name after FROM");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_lists_report_the_terminator() {
        let err = parse("INSERT INTO t VALUES (1, 2").unwrap_err();
        assert_eq!(
            err.diagnostics(),
            &[Diagnostic {
                location: Location { line: 0, column: 25 },
                expected: "','".into(),
                found: ";".into(),
            }]
        );

        let err = parse("CREATE TABLE t (a INT").unwrap_err();
        assert_eq!(err.diagnostics()[0].expected, "','");
        assert_eq!(err.diagnostics()[0].found, ";");

        let err = parse("SELECT a,").unwrap_err();
        assert_eq!(err.diagnostics()[0].expected, "expression");
        assert_eq!(err.diagnostics()[0].found, ";");
    }

    #[test]
    fn test_lex_error_is_propagated() {
        assert!(matches!(parse("SELECT #"), Err(ParseError::Lex(_))));
    }
}

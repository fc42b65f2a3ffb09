use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    Cell, DataType, Value,
    ast::{CreateTableStatement, Expression, InsertStatement, SelectStatement, Statement},
    error::EngineError,
    parser::parse,
    table::{ColumnDef, Schema, Table},
    tokenizer::{Token, TokenKind},
};

/// The in-memory table store and the engine applying statements to it.
///
/// Each instance is independent; nothing is shared between databases and
/// nothing outlives the value. Callers must serialize access.
#[derive(Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub data_type: DataType,
    pub name: String,
}

/// Represents the result of a `SELECT`: columns in select-list order and
/// rows of cells positionally aligned with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    /// Decodes every row using the declared type of its column.
    ///
    /// Returns `None` if a cell does not decode as its column type.
    pub fn values(&self) -> Option<Vec<Vec<Value>>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .map(|(cell, column)| cell.decode(column.data_type))
                    .collect()
            })
            .collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Outcome of applying one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Created { table: String },
    Inserted { table: String },
    Rows(ResultSet),
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns a list of all table names currently stored in the database.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Parses `sql` and applies its statements in source order.
    ///
    /// Later statements see the effects of earlier ones. The first failure
    /// stops the batch; statements already applied stay applied.
    ///
    /// # Example
    /// ```
    /// use minisql::{Database, ExecutionResult, Value};
    ///
    /// let mut db = Database::new();
    /// let results = db
    ///     .execute("CREATE TABLE products (name TEXT, price INT);
    ///               INSERT INTO products VALUES ('Laptop', 1200);
    ///               SELECT price, name FROM products")
    ///     .unwrap();
    ///
    /// let ExecutionResult::Rows(result) = &results[2] else { panic!() };
    /// assert_eq!(result.column_names(), vec!["price", "name"]);
    /// assert_eq!(
    ///     result.values().unwrap(),
    ///     vec![vec![Value::Int(1200), Value::Text("Laptop".into())]]
    /// );
    /// ```
    pub fn execute(&mut self, sql: &str) -> crate::Result<Vec<ExecutionResult>> {
        let statements = parse(sql)?;

        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            results.push(self.apply(statement)?);
        }
        Ok(results)
    }

    /// Applies a single parsed statement to the store.
    pub fn apply(&mut self, statement: &Statement) -> Result<ExecutionResult, EngineError> {
        match statement {
            Statement::CreateTable(create) => {
                self.create_table(create)?;
                Ok(ExecutionResult::Created {
                    table: create.name.value.clone(),
                })
            }
            Statement::Insert(insert) => {
                self.insert(insert)?;
                Ok(ExecutionResult::Inserted {
                    table: insert.table.value.clone(),
                })
            }
            Statement::Select(select) => self.select(select).map(ExecutionResult::Rows),
        }
    }

    /// Registers a table, replacing any existing table with the same name.
    ///
    /// # Errors
    /// - [EngineError::InvalidDatatype] if a column type is not `int` or `text`.
    /// - [EngineError::MissingValues] if the statement declares no columns.
    pub fn create_table(&mut self, create: &CreateTableStatement) -> Result<(), EngineError> {
        let name = &create.name.value;
        let columns = create
            .columns
            .iter()
            .map(|column| {
                let data_type = DataType::from_token(&column.datatype)
                    .ok_or_else(|| EngineError::InvalidDatatype(column.datatype.value.clone()))?;
                Ok(ColumnDef {
                    name: column.name.value.clone(),
                    data_type,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let schema = Schema { columns };
        if schema.is_empty() {
            return Err(EngineError::MissingValues(format!(
                "table {name} declares no columns"
            )));
        }

        let table = Table::new(name.clone(), schema);
        debug!(table = %name, columns = table.schema.len(), "creating table");

        if self.tables.insert(name.clone(), table).is_some() {
            warn!(table = %name, "table re-created, previous rows discarded");
        }
        Ok(())
    }

    /// Appends one row, matching values positionally against the schema.
    ///
    /// # Errors
    /// - [EngineError::TableDoesNotExist] if the target table is unknown.
    /// - [EngineError::MissingValues] if the value count differs from the column count.
    /// - [EngineError::InvalidValue] if a literal does not fit its column type.
    pub fn insert(&mut self, insert: &InsertStatement) -> Result<(), EngineError> {
        let table = self
            .tables
            .get_mut(&insert.table.value)
            .ok_or_else(|| EngineError::TableDoesNotExist(insert.table.value.clone()))?;

        let mut literals = Vec::with_capacity(insert.values.len());
        for value in &insert.values {
            match value {
                Expression::Literal(token) => literals.push(token),
                other => warn!(
                    table = %table.name,
                    value = %other.token().value,
                    "skipping non-literal insert value"
                ),
            }
        }

        if literals.len() != table.schema.len() {
            return Err(EngineError::MissingValues(format!(
                "table {} has {} columns, got {} values",
                table.name,
                table.schema.len(),
                literals.len()
            )));
        }

        let row = table
            .schema
            .columns
            .iter()
            .zip(literals)
            .map(|(column, token)| {
                Cell::from_literal(token, column.data_type).ok_or_else(|| {
                    EngineError::InvalidValue {
                        column: column.name.clone(),
                        datatype: column.data_type.to_string(),
                        value: token.value.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        debug!(table = %table.name, "inserting row");
        table.insert(row)
    }

    /// Evaluates a `SELECT` into a [ResultSet].
    ///
    /// The projection is resolved against the schema before any row is read,
    /// so an empty table still reports its result columns. `*` expands to
    /// every column in declaration order.
    ///
    /// # Errors
    /// - [EngineError::TableDoesNotExist] if the source table is unknown.
    /// - [EngineError::ColumnDoesNotExist] if an item names no column of the table.
    /// - [EngineError::InvalidSelectItem] if an item is a text or integer literal.
    pub fn select(&self, select: &SelectStatement) -> Result<ResultSet, EngineError> {
        let Some(from) = &select.from else {
            return select_literals(&select.items);
        };

        let table = self
            .get_table(&from.value)
            .ok_or_else(|| EngineError::TableDoesNotExist(from.value.clone()))?;

        let mut projection = Vec::with_capacity(select.items.len());
        for item in &select.items {
            match item {
                Expression::Wildcard(_) => projection.extend(0..table.schema.len()),
                Expression::Literal(token) if token.kind == TokenKind::Identifier => {
                    let idx = table
                        .schema
                        .position(&token.value)
                        .ok_or_else(|| EngineError::ColumnDoesNotExist(token.value.clone()))?;
                    projection.push(idx);
                }
                Expression::Literal(token) => {
                    return Err(EngineError::InvalidSelectItem(token.value.clone()));
                }
            }
        }

        let columns = projection
            .iter()
            .map(|&idx| {
                let column = &table.schema.columns[idx];
                ResultColumn {
                    data_type: column.data_type,
                    name: column.name.clone(),
                }
            })
            .collect();

        let rows = table
            .rows()
            .iter()
            .map(|row| projection.iter().map(|&idx| row[idx].clone()).collect())
            .collect();

        Ok(ResultSet { columns, rows })
    }
}

/// Evaluates a `SELECT` without `FROM`: one row holding the literal items.
fn select_literals(items: &[Expression]) -> Result<ResultSet, EngineError> {
    let mut columns = Vec::with_capacity(items.len());
    let mut row = Vec::with_capacity(items.len());

    for item in items {
        let token: &Token = match item {
            Expression::Literal(token) => token,
            Expression::Wildcard(token) => {
                return Err(EngineError::InvalidSelectItem(token.value.clone()));
            }
        };

        let (data_type, cell) = match token.kind {
            TokenKind::Integer => {
                let cell = Cell::from_literal(token, DataType::Int)
                    .ok_or_else(|| EngineError::InvalidSelectItem(token.value.clone()))?;
                (DataType::Int, cell)
            }
            TokenKind::Text => (DataType::Text, Cell::from_text(&token.value)),
            _ => return Err(EngineError::ColumnDoesNotExist(token.value.clone())),
        };

        columns.push(ResultColumn {
            data_type,
            name: token.value.clone(),
        });
        row.push(cell);
    }

    Ok(ResultSet {
        columns,
        rows: vec![row],
    })
}

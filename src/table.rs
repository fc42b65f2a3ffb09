use crate::cell::Cell;
use crate::data_type::DataType;
use crate::error::EngineError;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

/// Ordered column definitions; the order is the physical layout of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Ordinal position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A named table: a schema plus rows of cells aligned positionally with it.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        Self {
            name,
            schema,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Every row holds exactly one cell per column.
    pub fn insert(&mut self, row: Vec<Cell>) -> Result<(), EngineError> {
        if row.len() != self.schema.len() {
            return Err(EngineError::MissingValues(format!(
                "table {} has {} columns, got {} values",
                self.name,
                self.schema.len(),
                row.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> Schema {
        Schema {
            columns: vec![
                ColumnDef {
                    name: "id".into(),
                    data_type: DataType::Int,
                },
                ColumnDef {
                    name: "name".into(),
                    data_type: DataType::Text,
                },
            ],
        }
    }

    #[test]
    fn test_table_creation() {
        let table = Table::new("users".into(), users_schema());
        assert_eq!(table.schema.len(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_table_insert_and_get() {
        let mut table = Table::new("users".into(), users_schema());

        table
            .insert(vec![Cell::from_i32(1), Cell::from_text("Alice")])
            .unwrap();
        table
            .insert(vec![Cell::from_i32(2), Cell::from_text("Bob")])
            .unwrap();

        assert_eq!(table.row_count(), 2);
        let row1 = &table.rows()[1];
        assert_eq!(row1[0].as_i32(), Some(2));
        assert_eq!(row1[1].as_text(), Some("Bob"));
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut table = Table::new("users".into(), users_schema());

        let result = table.insert(vec![Cell::from_i32(1)]);
        assert!(matches!(result, Err(EngineError::MissingValues(_))));

        let result = table.insert(vec![
            Cell::from_i32(1),
            Cell::from_text("a"),
            Cell::from_text("b"),
        ]);
        assert!(matches!(result, Err(EngineError::MissingValues(_))));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_schema_position() {
        let table = Table::new("users".into(), users_schema());

        assert_eq!(table.schema.position("name"), Some(1));
        assert_eq!(table.schema.position("age"), None);
    }
}

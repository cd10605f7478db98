use plait::Value;
use std::fmt::Write;

/// Rows to seed storage with, independent of the backend.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    tables: Vec<Table>,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table. A table with no rows still exists in storage.
    pub fn table(mut self, name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        for row in &rows {
            assert_eq!(row.len(), columns.len(), "row width of `{name}`");
        }

        self.tables.push(Table {
            name: name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows,
        });
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// DDL and inserts recreating the fixture in SQLite.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        for table in &self.tables {
            let columns = table
                .columns
                .iter()
                .map(|column| format!("\"{column}\""))
                .collect::<Vec<_>>()
                .join(", ");

            writeln!(sql, "CREATE TABLE \"{}\" ({columns});", table.name).unwrap();

            for row in &table.rows {
                let values = row.iter().map(literal).collect::<Vec<_>>().join(", ");
                writeln!(sql, "INSERT INTO \"{}\" VALUES ({values});", table.name).unwrap();
            }
        }

        sql
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(v) => i64::from(*v).to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::String(v) => format!("'{}'", v.replace('\'', "''")),
        value => panic!("cannot store {value:?} in a fixture"),
    }
}

use plait_core::driver::operation::{Column, SelectBy, SelectThrough};

use std::fmt::Write;

/// Quotes an identifier, doubling embedded quotes.
fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn placeholders(count: usize) -> String {
    let mut out = String::new();
    for index in 1..=count {
        if index > 1 {
            out.push_str(", ");
        }
        let _ = write!(out, "?{index}");
    }
    out
}

fn column_list(prefix: Option<&str>, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| match prefix {
            Some(prefix) => format!("{prefix}.{}", ident(&column.name)),
            None => ident(&column.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `keys` is the number of keys bound to this statement.
pub(crate) fn select_by(op: &SelectBy, keys: usize) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} IN ({})",
        column_list(None, &op.columns),
        ident(&op.table),
        ident(&op.filter_column),
        placeholders(keys),
    )
}

pub(crate) fn select_through(op: &SelectThrough, keys: usize) -> String {
    let mut columns = column_list(Some("t"), &op.columns);
    if !columns.is_empty() {
        columns.push_str(", ");
    }
    let _ = write!(columns, "l.{}", ident(&op.link.source_column));

    format!(
        "SELECT {columns} FROM {} AS l JOIN {} AS t ON t.{} = l.{} WHERE l.{} IN ({})",
        ident(&op.link.table),
        ident(&op.table),
        ident(&op.key_column),
        ident(&op.link.target_column),
        ident(&op.link.source_column),
        placeholders(keys),
    )
}

use tabula_schema::{ID_COLUMN, prelude::*};

/// `CREATE TABLE` statement for a model: the primary key, then each column
/// in declaration order.
#[must_use]
pub fn create_table(model: &ModelElement, columns: &[ColumnElement]) -> String {
    let mut definitions = vec![format!("{ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
    definitions.extend(columns.iter().map(ColumnElement::definition));

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        model.table,
        definitions.join(", ")
    )
}

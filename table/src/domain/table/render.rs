//! Plain-text rendering of table pages

use crate::domain::schema::{
    ColumnTypeInfo, EntitySchema, FieldSchema, format_field_value, operators_for,
    parse_field_annotation,
};
use crate::utils::string::{CELL_MAX_LENGTH, pad_right, truncate_preview};

use super::state::TableRow;

const COLUMN_GAP: &str = "  ";

/// A rendered column: field name, header label and type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub label: String,
    pub info: ColumnTypeInfo,
}

impl Column {
    fn from_field(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            label: field.display_label().to_string(),
            info: parse_field_annotation(field),
        }
    }

    fn untyped(name: &str) -> Self {
        Self::from_field(&FieldSchema {
            name: name.to_string(),
            ..FieldSchema::default()
        })
    }
}

/// Columns to show: visible schema fields, or the keys of the rows when
/// the schema has no fields
pub fn visible_columns(schema: Option<&EntitySchema>, rows: &[TableRow]) -> Vec<Column> {
    if let Some(schema) = schema.filter(|s| !s.fields.is_empty()) {
        return schema
            .fields
            .iter()
            .filter(|(_, field)| !field.is_hidden_initially())
            .map(|(name, field)| {
                let mut column = Column::from_field(field);
                if column.name.is_empty() {
                    column.name = name.clone();
                }
                column
            })
            .collect();
    }

    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.row.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }
    names.into_iter().map(Column::untyped).collect()
}

fn render_grid(header: Vec<String>, body: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad_right(cell, *width))
            .collect();
        padded.join(COLUMN_GAP).trim_end().to_string()
    };

    let mut out = format_line(&header);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join(COLUMN_GAP));
    out.push('\n');
    for line in &body {
        out.push_str(&format_line(line));
        out.push('\n');
    }
    out
}

/// Render rows as an aligned text table
pub fn render_table(columns: &[Column], rows: &[TableRow]) -> String {
    let header: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| {
                    let cell = format_field_value(r.row.get(&c.name), &c.info);
                    truncate_preview(&cell.replace('\n', " "), CELL_MAX_LENGTH)
                })
                .collect()
        })
        .collect();
    render_grid(header, body)
}

/// Render each field with its column variant and offered filter operators
pub fn render_operators(schema: &EntitySchema) -> String {
    let header = vec![
        "Column".to_string(),
        "Type".to_string(),
        "Operators".to_string(),
    ];
    let body: Vec<Vec<String>> = schema
        .fields
        .iter()
        .map(|(name, field)| {
            let info = parse_field_annotation(field);
            let mut kind = info.variant.to_string();
            if info.is_relation {
                kind.push_str(" (relation)");
            }
            let operators: Vec<&str> = operators_for(info.variant)
                .iter()
                .map(|op| op.as_str())
                .collect();
            vec![name.clone(), kind, operators.join(", ")]
        })
        .collect();
    render_grid(header, body)
}

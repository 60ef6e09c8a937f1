//! Bulk actions over selected rows

use std::fmt;

use crate::data::{DataError, RecordSource};
use crate::domain::filter::Row;
use crate::utils::json::{is_truthy, to_plain_string};

use super::state::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Export,
    Delete,
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => write!(f, "export"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    /// Rows handed back for export
    Exported(Vec<Row>),
    /// Record ids deleted, and rows skipped for lacking an id
    Deleted { ids: Vec<String>, skipped: usize },
}

/// Run a bulk action over rows, normally the table's selected rows.
///
/// Deletion goes through the record source one record at a time and stops
/// at the first failure. Rows without an `id` are skipped.
pub async fn run_bulk_action(
    action: BulkAction,
    entity: &str,
    rows: Vec<TableRow>,
    source: &dyn RecordSource,
) -> Result<BulkOutcome, DataError> {
    tracing::debug!(%action, entity, rows = rows.len(), "Running bulk action");

    match action {
        BulkAction::Export => Ok(BulkOutcome::Exported(
            rows.into_iter().map(|r| r.row).collect(),
        )),
        BulkAction::Delete => {
            let mut ids = Vec::new();
            let mut skipped = 0;
            for table_row in rows {
                let id = match table_row.row.get("id") {
                    Some(id) if is_truthy(Some(id)) => to_plain_string(id),
                    _ => {
                        tracing::debug!(row = %table_row.id, "Row has no record id, skipping");
                        skipped += 1;
                        continue;
                    }
                };
                source
                    .delete_record(entity, &id)
                    .await
                    .map_err(|e| DataError::DeleteFailed {
                        id: id.clone(),
                        source: Box::new(e),
                    })?;
                ids.push(id);
            }
            tracing::debug!(entity, deleted = ids.len(), skipped, "Bulk delete finished");
            Ok(BulkOutcome::Deleted { ids, skipped })
        }
    }
}

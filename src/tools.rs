//! Record store for tools.

use thiserror::Error;

use crate::storage::models::Tool;
use crate::storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub fn list(db: &Database) -> Result<Vec<Tool>, ToolError> {
    Ok(db.get_all_tools()?)
}

/// Store a new tool. Duplicates are allowed; only IDs are kept distinct.
pub fn create(
    db: &Database,
    manufacturer: &str,
    label: &str,
    quality: serde_json::Value,
) -> Result<Tool, ToolError> {
    let tool = db.insert_tool(manufacturer, label, quality)?;
    tracing::debug!(id = tool.id, manufacturer = %manufacturer, label = %label, "Created tool");
    Ok(tool)
}

use std::collections::HashSet;

use super::db::{Database, DatabaseError};
use super::models::Tool;

impl Database {
    // ========================================================================
    // Tool operations
    // ========================================================================

    pub fn get_all_tools(&self) -> Result<Vec<Tool>, DatabaseError> {
        self.tools().lock()?.load()
    }

    /// Append a tool whose ID lives in the band of its lower-cased manufacturer
    pub fn insert_tool(
        &self,
        manufacturer: &str,
        label: &str,
        quality: serde_json::Value,
    ) -> Result<Tool, DatabaseError> {
        let guard = self.tools().lock()?;
        let mut tools: Vec<Tool> = guard.load()?;

        let existing: HashSet<u64> = tools.iter().map(|t| t.id).collect();
        let namespace = manufacturer.to_lowercase();
        let tool = Tool {
            id: self.allocate_id(&existing, Some(&namespace))?,
            label: label.to_string(),
            manufacturer: manufacturer.to_string(),
            quality,
        };

        tools.push(tool.clone());
        guard.store(&tools)?;
        Ok(tool)
    }
}

//! `ToolStore` trait — the persistence seam behind the HTTP handlers.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::tools::model::{NewTool, Tool, ToolPatch};

/// Backend-agnostic CRUD interface over the tools collection.
///
/// Ids arrive as the raw path segment. A backend that cannot interpret one
/// returns [`DatabaseError::InvalidId`] rather than `Ok(None)`.
#[async_trait]
pub trait ToolStore: Send + Sync {
    /// Every tool, in insertion order.
    async fn find_all(&self) -> Result<Vec<Tool>, DatabaseError>;

    /// Look up a tool by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Tool>, DatabaseError>;

    /// Insert a new tool. The store assigns the id and timestamps.
    async fn create(&self, tool: NewTool) -> Result<Tool, DatabaseError>;

    /// Apply a partial update. Returns the record as it is after the update,
    /// or `None` if no tool has this id.
    async fn update_by_id(
        &self,
        id: &str,
        patch: ToolPatch,
    ) -> Result<Option<Tool>, DatabaseError>;

    /// Remove a tool. Returns the record as it was before deletion, or `None`
    /// if no tool has this id.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Tool>, DatabaseError>;
}

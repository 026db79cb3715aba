//! libSQL backend — async `ToolStore` implementation.
//!
//! Supports local file and in-memory databases. Every trait method is a
//! single SQL statement, so each operation is atomic at the database.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::ToolStore;
use crate::tools::model::{NewTool, Tool, ToolPatch};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Run all pending schema migrations.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run a statement that yields at most one tool row.
    async fn query_one(
        &self,
        op: &str,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<Tool>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, params)
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_tool(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("{op} row: {e}"))),
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Column list for tool SELECT / RETURNING clauses (8 columns).
const TOOL_COLUMNS: &str = "id, name, category, owner, description, link, created_at, updated_at";

/// Parse an id from a request path.
fn parse_id(id: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(id).map_err(|e| DatabaseError::InvalidId(format!("{id}: {e}")))
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn row_to_tool(row: &libsql::Row) -> Result<Tool, DatabaseError> {
    let text = |idx: i32, col: &str| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::Query(format!("tool.{col}: {e}")))
    };

    let id_str = text(0, "id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DatabaseError::Query(format!("tool.id parse: {e}")))?;

    Ok(Tool {
        id,
        name: text(1, "name")?,
        category: text(2, "category")?,
        owner: text(3, "owner")?,
        description: text(4, "description")?,
        link: text(5, "link")?,
        created_at: parse_datetime(&text(6, "created_at")?),
        updated_at: parse_datetime(&text(7, "updated_at")?),
    })
}

#[async_trait]
impl ToolStore for LibSqlBackend {
    async fn find_all(&self) -> Result<Vec<Tool>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {TOOL_COLUMNS} FROM tools ORDER BY rowid ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("find_all: {e}")))?;

        let mut tools = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => tools.push(row_to_tool(&row)?),
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("find_all row: {e}"))),
            }
        }
        Ok(tools)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tool>, DatabaseError> {
        let id = parse_id(id)?;
        self.query_one(
            "find_by_id",
            &format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?1"),
            params![id.to_string()],
        )
        .await
    }

    async fn create(&self, tool: NewTool) -> Result<Tool, DatabaseError> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        let created = self
            .query_one(
                "create",
                &format!(
                    "INSERT INTO tools (id, name, category, owner, description, link, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                     RETURNING {TOOL_COLUMNS}"
                ),
                params![
                    id.to_string(),
                    tool.name,
                    tool.category,
                    tool.owner,
                    tool.description,
                    tool.link,
                    now,
                ],
            )
            .await?
            .ok_or_else(|| DatabaseError::Query("create: insert returned no row".into()))?;

        debug!(id = %created.id, name = %created.name, "Tool created");
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: ToolPatch,
    ) -> Result<Option<Tool>, DatabaseError> {
        let id = parse_id(id)?;
        let now = Utc::now().to_rfc3339();

        let updated = self
            .query_one(
                "update_by_id",
                &format!(
                    "UPDATE tools SET
                        name = COALESCE(?1, name),
                        category = COALESCE(?2, category),
                        owner = COALESCE(?3, owner),
                        description = COALESCE(?4, description),
                        link = COALESCE(?5, link),
                        updated_at = ?6
                     WHERE id = ?7
                     RETURNING {TOOL_COLUMNS}"
                ),
                params![
                    patch.name,
                    patch.category,
                    patch.owner,
                    patch.description,
                    patch.link,
                    now,
                    id.to_string(),
                ],
            )
            .await?;

        if updated.is_some() {
            debug!(id = %id, "Tool updated");
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Tool>, DatabaseError> {
        let id = parse_id(id)?;
        let deleted = self
            .query_one(
                "delete_by_id",
                &format!("DELETE FROM tools WHERE id = ?1 RETURNING {TOOL_COLUMNS}"),
                params![id.to_string()],
            )
            .await?;

        if deleted.is_some() {
            debug!(id = %id, "Tool deleted");
        }
        Ok(deleted)
    }
}

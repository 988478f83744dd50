// SQLite storage backend
// Connection pool plus embedded migrations applied once at startup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use super::{StorageError, Store};
use crate::audit::AuditLogEntry;
use crate::geo::CellId;
use crate::models::{HelpRequest, RequestStatus, Role, User};

/// SQLite storage backend
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url`, creating the database file if it does
    /// not exist, and run the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        if !Sqlite::database_exists(database_url)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to check database: {}", e)))?
        {
            tracing::info!("Creating database: {}", database_url);
            Sqlite::create_database(database_url)
                .await
                .map_err(|e| StorageError::Connection(format!("Failed to create database: {}", e)))?;
        }

        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to connect to database: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to run migrations: {}", e)))?;

        Ok(Self { pool })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    role: String,
    cell_id: String,
    created_at: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, StorageError> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            name: self.name,
            role: Role::from_token(&self.role),
            cell: CellId::new(self.cell_id),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HelpRequestRow {
    id: String,
    recipient_id: String,
    description: String,
    status: String,
    created_at: String,
}

impl HelpRequestRow {
    fn into_help_request(self) -> Result<HelpRequest, StorageError> {
        let status = RequestStatus::from_token(&self.status).ok_or_else(|| {
            StorageError::InvalidData(format!("Unknown request status '{}'", self.status))
        })?;

        Ok(HelpRequest {
            id: parse_uuid(&self.id)?,
            recipient_id: parse_uuid(&self.recipient_id)?,
            description: self.description,
            status,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    id: String,
    action: String,
    timestamp: String,
}

impl AuditLogRow {
    fn into_entry(self) -> Result<AuditLogEntry, StorageError> {
        Ok(AuditLogEntry {
            id: parse_uuid(&self.id)?,
            action: self.action,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|e| StorageError::InvalidData(format!("Invalid uuid '{}': {}", raw, e)))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("Invalid timestamp '{}': {}", raw, e)))
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO users (id, name, role, cell_id, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(user.cell.as_str())
            .bind(user.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to insert user: {}", e)))?;

        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, cell_id, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to find user: {}", e)))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn count_users_in_cell(&self, cell: &CellId) -> Result<u64, StorageError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE cell_id = ?")
            .bind(cell.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to count users: {}", e)))?;

        Ok(count.0 as u64)
    }

    async fn insert_help_request(&self, request: &HelpRequest) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO help_requests (id, recipient_id, description, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(request.recipient_id.to_string())
        .bind(&request.description)
        .bind(request.status.as_str())
        .bind(request.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to insert help request: {}", e)))?;

        Ok(())
    }

    async fn get_help_request(&self, id: Uuid) -> Result<Option<HelpRequest>, StorageError> {
        let row = sqlx::query_as::<_, HelpRequestRow>(
            "SELECT id, recipient_id, description, status, created_at
             FROM help_requests WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to find help request: {}", e)))?;

        row.map(HelpRequestRow::into_help_request).transpose()
    }

    async fn set_help_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE help_requests SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to update help request: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn count_help_requests(&self) -> Result<u64, StorageError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM help_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to count help requests: {}", e)))?;

        Ok(count.0 as u64)
    }

    async fn append_audit_entry(&self, entry: &AuditLogEntry) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO audit_logs (id, action, timestamp) VALUES (?, ?, ?)")
            .bind(entry.id.to_string())
            .bind(&entry.action)
            .bind(entry.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }

    async fn list_audit_entries(&self) -> Result<Vec<AuditLogEntry>, StorageError> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            "SELECT id, action, timestamp FROM audit_logs ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to list audit entries: {}", e)))?;

        rows.into_iter().map(AuditLogRow::into_entry).collect()
    }
}

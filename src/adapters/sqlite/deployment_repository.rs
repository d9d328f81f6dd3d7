//! SQLite adapter for DeploymentRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_optional_datetime, parse_uuid, PAGE_SIZE};
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::deployment::{Closure, DeploymentRecord};
use crate::domain::ports::deployment_repository::DeploymentRepository;

#[derive(Clone)]
pub struct SqliteDeploymentRepository {
    pool: SqlitePool,
}

impl SqliteDeploymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DeploymentRow {
    id: String,
    service: String,
    started_at: Option<String>,
    closure: String,
    ended_at: Option<String>,
}

fn row_to_deployment(row: DeploymentRow) -> EngineResult<DeploymentRecord> {
    let ended = parse_optional_datetime(row.ended_at)?;
    let closure = Closure::from_parts(&row.closure, ended).ok_or_else(|| {
        EngineError::Store(format!(
            "deployment {} has closure state '{}' without an end time",
            row.id, row.closure
        ))
    })?;

    Ok(DeploymentRecord {
        id: parse_uuid(&row.id)?,
        service: row.service,
        started: parse_optional_datetime(row.started_at)?,
        closure,
    })
}

#[async_trait]
impl DeploymentRepository for SqliteDeploymentRepository {
    async fn list_all(&self) -> EngineResult<Vec<DeploymentRecord>> {
        // Page through the collection; callers see the whole table.
        let mut records = Vec::new();
        let mut offset: i64 = 0;

        loop {
            let rows: Vec<DeploymentRow> = sqlx::query_as(
                "SELECT id, service, started_at, closure, ended_at
                 FROM deployments ORDER BY id LIMIT ?1 OFFSET ?2",
            )
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let page_len = rows.len();
            for row in rows {
                records.push(row_to_deployment(row)?);
            }
            if (page_len as i64) < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        Ok(records)
    }

    async fn replace(&self, record: &DeploymentRecord) -> EngineResult<()> {
        let started = record.started.map(|dt| dt.to_rfc3339());
        let ended = record.ended().map(|dt| dt.to_rfc3339());

        let result = sqlx::query(
            "UPDATE deployments
             SET service = ?2, started_at = ?3, closure = ?4, ended_at = ?5
             WHERE id = ?1",
        )
        .bind(record.id.to_string())
        .bind(&record.service)
        .bind(&started)
        .bind(record.closure.as_str())
        .bind(&ended)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::Store(format!(
                "deployment {} does not exist",
                record.id
            )));
        }
        Ok(())
    }

    async fn insert(&self, record: &DeploymentRecord) -> EngineResult<()> {
        let started = record.started.map(|dt| dt.to_rfc3339());
        let ended = record.ended().map(|dt| dt.to_rfc3339());

        sqlx::query(
            "INSERT INTO deployments (id, service, started_at, closure, ended_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(record.id.to_string())
        .bind(&record.service)
        .bind(&started)
        .bind(record.closure.as_str())
        .bind(&ended)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

//! SQLite adapter for ScorecardRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_uuid, PAGE_SIZE};
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::scorecard::ScorecardRecord;
use crate::domain::ports::scorecard_repository::ScorecardRepository;

#[derive(Clone)]
pub struct SqliteScorecardRepository {
    pool: SqlitePool,
}

impl SqliteScorecardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ScorecardRow {
    id: String,
    service: String,
    date: String,
    total_score: f64,
    metrics: String,
}

fn row_to_scorecard(row: ScorecardRow) -> EngineResult<ScorecardRecord> {
    let metrics = serde_json::from_str(&row.metrics)
        .map_err(|e| EngineError::Serialization(format!("metrics: {}", e)))?;

    Ok(ScorecardRecord {
        id: parse_uuid(&row.id)?,
        service: row.service,
        date: parse_datetime(&row.date)?,
        total_score: row.total_score,
        metrics,
    })
}

#[async_trait]
impl ScorecardRepository for SqliteScorecardRepository {
    async fn list_all(&self) -> EngineResult<Vec<ScorecardRecord>> {
        let mut records = Vec::new();
        let mut offset: i64 = 0;

        loop {
            let rows: Vec<ScorecardRow> = sqlx::query_as(
                "SELECT id, service, date, total_score, metrics
                 FROM scorecards ORDER BY id LIMIT ?1 OFFSET ?2",
            )
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let page_len = rows.len();
            for row in rows {
                records.push(row_to_scorecard(row)?);
            }
            if (page_len as i64) < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        Ok(records)
    }

    async fn append(&self, record: &ScorecardRecord) -> EngineResult<()> {
        let metrics = serde_json::to_string(&record.metrics)?;

        sqlx::query(
            "INSERT INTO scorecards (id, service, date, total_score, metrics)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(record.id.to_string())
        .bind(&record.service)
        .bind(record.date.to_rfc3339())
        .bind(record.total_score)
        .bind(&metrics)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

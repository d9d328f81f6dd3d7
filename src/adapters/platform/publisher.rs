//! Publisher adapter: persists the scorecard batch and, in production,
//! submits a rendered summary for review.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::info;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::scorecard::Scorecard;
use crate::domain::ports::publisher::Publisher;
use crate::domain::ports::scorecard_repository::ScorecardRepository;

pub struct ScorecardUploader {
    scorecards: Arc<dyn ScorecardRepository>,
    http: Client,
    review_url: Option<String>,
}

impl ScorecardUploader {
    pub fn new(scorecards: Arc<dyn ScorecardRepository>, review_url: Option<String>) -> Self {
        Self {
            scorecards,
            http: Client::new(),
            review_url,
        }
    }
}

/// Render the batch as a markdown summary for review.
pub fn render_summary(scorecards: &[Scorecard]) -> String {
    let mut out = String::from("# Rollout scorecards\n\n| Service | Rollout start | Score |\n|---|---|---|\n");
    for scorecard in scorecards {
        let start = scorecard
            .rollout_start
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        out.push_str(&format!(
            "| {} | {} | {:.1} |\n",
            scorecard.service, start, scorecard.total_score
        ));
    }
    out
}

#[async_trait]
impl Publisher for ScorecardUploader {
    async fn publish(
        &self,
        scorecards: Vec<Scorecard>,
        publish_token: &str,
        skip_review: bool,
    ) -> EngineResult<()> {
        let date = Utc::now();
        for scorecard in &scorecards {
            self.scorecards
                .append(&scorecard.clone().into_record(date))
                .await?;
        }
        info!(count = scorecards.len(), "Persisted scorecard records");

        if skip_review {
            info!("Skipping review step for this environment");
            return Ok(());
        }

        let Some(review_url) = &self.review_url else {
            return Err(EngineError::PublishFailed(
                "review step requested but no review_url is configured".to_string(),
            ));
        };

        let summary = render_summary(&scorecards);
        let response = self
            .http
            .post(review_url)
            .bearer_auth(publish_token)
            .header("content-type", "text/markdown")
            .body(summary)
            .send()
            .await
            .map_err(|e| EngineError::PublishFailed(format!("review submission failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EngineError::PublishFailed(format!(
                "review endpoint returned {}",
                response.status()
            )));
        }

        info!("Submitted scorecard summary for review");
        Ok(())
    }
}

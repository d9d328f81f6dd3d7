//! Deployment record domain model.
//!
//! A DeploymentRecord is one rollout attempt of a service, bounded by an
//! optional start time and a closure state. Records are created by the
//! deployment system; the engine only reads them and, for stuck rollouts,
//! forces them closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closure state of a deployment record.
///
/// Tri-state rather than a bare `Option<DateTime>` so that a forced closure
/// is distinguishable from a naturally recorded one, and so that re-applying
/// a forced closure is a checkable no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Closure {
    /// No end time recorded; the rollout is in progress or was never closed.
    Open,
    /// The deployment system recorded the end time.
    Natural { at: DateTime<Utc> },
    /// The engine closed the record because the rollout was stuck.
    Forced { at: DateTime<Utc> },
}

impl Closure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Natural { .. } => "natural",
            Self::Forced { .. } => "forced",
        }
    }

    pub fn from_parts(state: &str, at: Option<DateTime<Utc>>) -> Option<Self> {
        match (state, at) {
            ("open", _) => Some(Self::Open),
            ("natural", Some(at)) => Some(Self::Natural { at }),
            ("forced", Some(at)) => Some(Self::Forced { at }),
            _ => None,
        }
    }
}

/// One rollout attempt of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: Uuid,
    /// Service identifier (repository name).
    pub service: String,
    /// When the rollout began, if recorded.
    pub started: Option<DateTime<Utc>>,
    /// Closure state and end time.
    pub closure: Closure,
}

impl DeploymentRecord {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service: service.into(),
            started: None,
            closure: Closure::Open,
        }
    }

    pub fn with_started(mut self, at: DateTime<Utc>) -> Self {
        self.started = Some(at);
        self
    }

    pub fn with_ended(mut self, at: DateTime<Utc>) -> Self {
        self.closure = Closure::Natural { at };
        self
    }

    /// Recorded end time, if any.
    pub fn ended(&self) -> Option<DateTime<Utc>> {
        match self.closure {
            Closure::Open => None,
            Closure::Natural { at } | Closure::Forced { at } => Some(at),
        }
    }

    /// End time used for ordering and eligibility. Open records sort after
    /// every closed record.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.ended().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.closure, Closure::Open)
    }

    /// Force the record closed at `at`. Returns true if the record was open
    /// and is now closed; already-closed records are left untouched.
    pub fn force_close(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_open() {
            self.closure = Closure::Forced { at };
            true
        } else {
            false
        }
    }
}

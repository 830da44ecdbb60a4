use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::form::SubmissionPacket;

/// Identifier assigned to a submitted case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Stored case: the finalized packet plus intake metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: CaseId,
    pub received_at: DateTime<Utc>,
    pub packet: SubmissionPacket,
}

/// Acknowledgement returned to the form once a case has been handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReceipt {
    pub case_id: CaseId,
    pub received_at: DateTime<Utc>,
}

/// Case persistence collaborator.
pub trait CaseStore: Send + Sync {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, StoreError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("case already exists")]
    Conflict,
    #[error("case store unavailable: {0}")]
    Unavailable(String),
}

/// Email/SMS collaborator; renders `template` with `details` on its side.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notice: IntakeNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeNotice {
    pub template: String,
    pub case_id: CaseId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

pub const INTAKE_RECEIVED_TEMPLATE: &str = "intake_received";

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

/// Forwards finalized submissions to the case store, then to notifications.
pub struct IntakeHandoff<C, N> {
    cases: Arc<C>,
    notifications: Arc<N>,
}

impl<C, N> IntakeHandoff<C, N>
where
    C: CaseStore + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(cases: Arc<C>, notifications: Arc<N>) -> Self {
        Self {
            cases,
            notifications,
        }
    }

    pub fn submit(&self, packet: SubmissionPacket) -> Result<CaseReceipt, HandoffError> {
        let record = CaseRecord {
            case_id: next_case_id(),
            received_at: Utc::now(),
            packet,
        };

        let stored = self.cases.insert(record)?;

        let mut details = BTreeMap::new();
        details.insert(
            "service".to_string(),
            stored.packet.quote.service_label.clone(),
        );
        details.insert("total".to_string(), stored.packet.quote.total.to_string());
        self.notifications.dispatch(IntakeNotice {
            template: INTAKE_RECEIVED_TEMPLATE.to_string(),
            case_id: stored.case_id.clone(),
            details,
        })?;

        info!(case_id = %stored.case_id.0, "intake case handed off");
        Ok(CaseReceipt {
            case_id: stored.case_id,
            received_at: stored.received_at,
        })
    }

    pub fn get(&self, id: &CaseId) -> Result<Option<CaseRecord>, HandoffError> {
        Ok(self.cases.fetch(id)?)
    }
}

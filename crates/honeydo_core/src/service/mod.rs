//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Resolve the acting user before any validation or storage work.
//! - Signal list invalidation after successful mutations.
//!
//! # Invariants
//! - A missing session fails with `ServiceError::Unauthorized` before any
//!   repository call.
//! - Services hold no per-request state.

use crate::auth::{AuthProvider, AuthUser};
use crate::model::note::NoteValidationError;
use crate::model::task::TaskValidationError;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod note_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to presentation callers.
#[derive(Debug)]
pub enum ServiceError {
    /// No valid session.
    Unauthorized,
    /// Required field missing or blank.
    Validation(String),
    /// Target entity does not exist.
    NotFound { entity: &'static str, id: Uuid },
    /// The storage call itself failed.
    Storage(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Storage(other),
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<NoteValidationError> for ServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// Monotonic counter bumped after every successful mutation.
///
/// Cloning shares the underlying counter, so task and note services built
/// from the same revision invalidate the same views.
#[derive(Debug, Clone, Default)]
pub struct ListRevision {
    value: Arc<AtomicU64>,
}

impl ListRevision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current revision.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Marks cached list views stale and returns the new revision.
    pub fn bump(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }
}

pub(crate) fn require_user(auth: &impl AuthProvider, operation: &str) -> ServiceResult<AuthUser> {
    auth.current_user().ok_or_else(|| {
        warn!("event={operation} module=service status=rejected reason=unauthorized");
        ServiceError::Unauthorized
    })
}

/// Current wall clock in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

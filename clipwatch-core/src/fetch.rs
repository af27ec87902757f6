//! Status fetching seam

use async_trait::async_trait;

use crate::domain::job::{JobId, JobStatus};

/// Performs one status round trip for a job
///
/// Implementations never fail: a request that cannot be completed resolves
/// to [`JobStatus::TransportError`], a server-reported failure to
/// [`JobStatus::Failed`]. Retrying is the caller's business.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(&self, id: &JobId) -> JobStatus;
}

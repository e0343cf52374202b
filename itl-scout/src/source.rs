//! Remote data source seam
//!
//! The enricher only sees [`SummarySource`]; transport, authentication and
//! query construction belong to the implementation.

use crate::error::FetchError;
use crate::model::{Category, Entity, Queue, Region, Role, Summary};
use async_trait::async_trait;

/// Parameters of one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub region: Region,
    /// Summoner name
    pub subject: String,
    pub role: Role,
    pub category: Category,
    /// Restrict results to games on this champion
    pub champion: Option<String>,
    /// Restrict results to this queue
    pub queue: Option<Queue>,
}

impl FetchRequest {
    pub fn new(region: Region, subject: impl Into<String>, role: Role, category: Category) -> Self {
        Self {
            region,
            subject: subject.into(),
            role,
            category,
            champion: None,
            queue: None,
        }
    }

    pub fn for_entity(entity: &Entity, role: Role, category: Category) -> Self {
        Self::new(entity.region(), entity.name(), role, category)
    }

    pub fn with_champion(mut self, champion: Option<String>) -> Self {
        self.champion = champion;
        self
    }

    pub fn with_queue(mut self, queue: Option<Queue>) -> Self {
        self.queue = queue;
        self
    }
}

/// Source of [`Summary`] collections
///
/// Each call is independent; implementations must tolerate concurrent calls.
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Fetch the ordered summaries for one (summoner, role, category)
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Summary>, FetchError>;
}

//! itl-scout library interface
//!
//! Fills a five-player [`Roster`] with champion and matchup pools fetched
//! concurrently from a [`SummarySource`], and reports whether every
//! collection was filled.
//!
//! ```rust,ignore
//! let roster = Roster::from_names(Region::Na, ["top", "jungle", "mid", "adc", "support"]);
//! let enricher = Enricher::new(Arc::new(client), DEFAULT_MAX_CONCURRENCY);
//! if enricher.enrich(&roster).await {
//!     for summary in roster.support().pool().unwrap_or_default() {
//!         println!("{summary}");
//!     }
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod enricher;
pub mod error;
pub mod model;
pub mod source;

pub use crate::catalog::{ChampionCatalog, ChampionEntry, ChampionLookup};
pub use crate::client::{ClientConfig, MobalyticsClient};
pub use crate::enricher::{EnrichReport, Enricher, TaskOutcome, TaskReport, DEFAULT_MAX_CONCURRENCY};
pub use crate::error::{FetchError, LookupError, ModelError};
pub use crate::model::{Category, Entity, Queue, Region, Role, Roster, Summary};
pub use crate::source::{FetchRequest, SummarySource};

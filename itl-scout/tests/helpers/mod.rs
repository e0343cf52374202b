//! Shared test helpers for itl-scout integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use itl_scout::{Category, FetchError, FetchRequest, Region, Role, Roster, Summary, SummarySource};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const FIXTURES_PER_CALL: usize = 3;

/// Deterministic in-memory summary source
///
/// Every call returns [`MockSource::fixtures_for`] for the request unless the
/// (role, category) slot is configured to fail, hang or panic. Tracks peak
/// concurrency for bounded-pool assertions.
#[derive(Default)]
pub struct MockSource {
    failing: HashSet<(Role, Category)>,
    hanging: HashSet<(Role, Category)>,
    panicking: HashSet<(Role, Category)>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, role: Role, category: Category) -> Self {
        self.failing.insert((role, category));
        self
    }

    pub fn hanging(mut self, role: Role, category: Category) -> Self {
        self.hanging.insert((role, category));
        self
    }

    pub fn panicking(mut self, role: Role, category: Category) -> Self {
        self.panicking.insert((role, category));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fixture collection for one request
    pub fn fixtures_for(request: &FetchRequest) -> Vec<Summary> {
        (0..FIXTURES_PER_CALL)
            .map(|i| summary(&format!("{}-{}-{}", request.subject, request.category, i), request.role))
            .collect()
    }
}

#[async_trait]
impl SummarySource for MockSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Summary>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        let slot = (request.role, request.category);
        if self.hanging.contains(&slot) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        } else if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(&slot) {
            panic!("mock source panic for {:?}", slot);
        }
        if self.failing.contains(&slot) {
            return Err(FetchError::Network("mock failure".to_string()));
        }
        Ok(Self::fixtures_for(request))
    }
}

pub fn summary(champion: &str, role: Role) -> Summary {
    Summary {
        champion: champion.to_string(),
        role: role.to_string(),
        csm: 6.5,
        gd15: 120.0,
        kills: 5.0,
        deaths: 3.0,
        assists: 7.0,
        dpm: 540.0,
        kp: 0.55,
        losses: 4,
        wins: 6,
        lp: 21,
    }
}

pub fn roster() -> Roster {
    Roster::from_names(Region::Na, ["kal1brate", "Fizsie", "thef1tnessgram", "AmbientSolace", "imwangingrn"])
}

/// Snapshot of every collection, in role order
pub fn snapshot(roster: &Roster) -> Vec<(Role, Option<Vec<Summary>>, Option<Vec<Summary>>)> {
    roster
        .entities()
        .map(|(role, entity)| {
            (
                role,
                entity.pool().map(<[Summary]>::to_vec),
                entity.against().map(<[Summary]>::to_vec),
            )
        })
        .collect()
}

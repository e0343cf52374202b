//! Roster data model
//!
//! A [`Roster`] holds five [`Entity`] slots, one per [`Role`]. Each entity
//! carries two [`Summary`] collections (`pool` and `against`) that start
//! absent and can each be set exactly once. An empty collection is a valid,
//! complete value; only absence means "not fetched".

use crate::error::ModelError;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// Vocabulary
// ============================================================================

/// Server region a summoner plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Na,
    Kr,
    Las,
    Br,
    Eune,
    Oce,
    Ru,
    Jp,
    Euw,
    Lan,
    Tr,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::Na,
        Region::Kr,
        Region::Las,
        Region::Br,
        Region::Eune,
        Region::Oce,
        Region::Ru,
        Region::Jp,
        Region::Euw,
        Region::Lan,
        Region::Tr,
    ];

    /// Region tag as sent to the remote API
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Kr => "KR",
            Region::Las => "LAS",
            Region::Br => "BR",
            Region::Eune => "EUNE",
            Region::Oce => "OCE",
            Region::Ru => "RU",
            Region::Jp => "JP",
            Region::Euw => "EUW",
            Region::Lan => "LAN",
            Region::Tr => "TR",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::InvalidInput(format!("unknown region '{}'", s)))
    }
}

/// Fixed team position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    /// Roster order
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Role::Top),
            "jungle" | "jg" => Ok(Role::Jungle),
            "mid" | "middle" => Ok(Role::Mid),
            "adc" | "bot" | "bottom" => Ok(Role::Adc),
            "support" | "sup" => Ok(Role::Support),
            _ => Err(ModelError::InvalidInput(format!("unknown role '{}'", s))),
        }
    }
}

/// Kind of data fetched per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Champions this entity plays
    Pool,
    /// Champions played against this entity
    Against,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Pool, Category::Against];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pool => "pool",
            Category::Against => "against",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pool" | "champions" => Ok(Category::Pool),
            "against" | "matchups" => Ok(Category::Against),
            _ => Err(ModelError::InvalidInput(format!("unknown category '{}'", s))),
        }
    }
}

/// Game queue filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Queue {
    NormalDraft,
    RankedSolo,
    RankedFlex,
}

impl Queue {
    pub fn as_str(self) -> &'static str {
        match self {
            Queue::NormalDraft => "NORMAL_DRAFT",
            Queue::RankedSolo => "RANKED_SOLO",
            Queue::RankedFlex => "RANKED_FLEX",
        }
    }
}

impl FromStr for Queue {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NORMAL_DRAFT" | "NORMAL" => Ok(Queue::NormalDraft),
            "RANKED_SOLO" | "SOLO" => Ok(Queue::RankedSolo),
            "RANKED_FLEX" | "FLEX" => Ok(Queue::RankedFlex),
            _ => Err(ModelError::InvalidInput(format!("unknown queue '{}'", s))),
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Performance of one summoner with (or against) one champion
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Champion played, or played against
    pub champion: String,
    /// Role label reported by the source
    pub role: String,
    /// Average cs per minute
    pub csm: f64,
    /// Average gold difference at 15 minutes
    pub gd15: f64,
    /// Average kills
    pub kills: f64,
    /// Average deaths
    pub deaths: f64,
    /// Average assists
    pub assists: f64,
    /// Average damage per minute
    pub dpm: f64,
    /// Average kill participation
    pub kp: f64,
    pub losses: u32,
    pub wins: u32,
    /// Net LP change across ranked games
    pub lp: i64,
}

impl Summary {
    pub fn games(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// Fraction of games won, `None` when no games were played
    pub fn win_rate(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            games => Some(f64::from(self.wins) / games as f64),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}W/{}L lp={:+} csm={:.1} gd15={:.0} kda={:.1}/{:.1}/{:.1} dpm={:.0} kp={:.2}",
            self.champion,
            self.role,
            self.wins,
            self.losses,
            self.lp,
            self.csm,
            self.gd15,
            self.kills,
            self.deaths,
            self.assists,
            self.dpm,
            self.kp,
        )
    }
}

// ============================================================================
// Entity
// ============================================================================

/// One roster slot
///
/// Identity (region + name) is fixed at construction. The two collections
/// are write-once cells: `set` is an atomic test-and-set, so a field can be
/// shared with a worker task and written without further locking.
#[derive(Debug)]
pub struct Entity {
    region: Region,
    name: String,
    pool: OnceCell<Vec<Summary>>,
    against: OnceCell<Vec<Summary>>,
}

impl Entity {
    /// Create an entity with both collections absent
    pub fn new(region: Region, name: impl Into<String>) -> Self {
        Self {
            region,
            name: name.into(),
            pool: OnceCell::new(),
            against: OnceCell::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Champions this entity plays, `None` while absent
    pub fn pool(&self) -> Option<&[Summary]> {
        self.collection(Category::Pool)
    }

    /// Champions played against this entity, `None` while absent
    pub fn against(&self) -> Option<&[Summary]> {
        self.collection(Category::Against)
    }

    pub fn collection(&self, category: Category) -> Option<&[Summary]> {
        self.cell(category).get().map(Vec::as_slice)
    }

    pub fn set_pool(&self, items: Vec<Summary>) -> Result<(), ModelError> {
        self.set(Category::Pool, items)
    }

    pub fn set_against(&self, items: Vec<Summary>) -> Result<(), ModelError> {
        self.set(Category::Against, items)
    }

    /// Store a collection
    ///
    /// # Errors
    /// `ModelError::InvariantViolation` if the collection is already set; the
    /// stored value is left unchanged.
    pub fn set(&self, category: Category, items: Vec<Summary>) -> Result<(), ModelError> {
        self.cell(category)
            .set(items)
            .map_err(|_| ModelError::InvariantViolation {
                entity: self.name.clone(),
                category,
            })
    }

    /// Both collections are set (possibly empty)
    pub fn is_complete(&self) -> bool {
        Category::ALL.into_iter().all(|c| self.cell(c).get().is_some())
    }

    fn cell(&self, category: Category) -> &OnceCell<Vec<Summary>> {
        match category {
            Category::Pool => &self.pool,
            Category::Against => &self.against,
        }
    }
}

// ============================================================================
// Roster
// ============================================================================

/// Five-player team, one entity per role
#[derive(Debug)]
pub struct Roster {
    region: Region,
    slots: [Arc<Entity>; 5],
}

impl Roster {
    /// Build a roster from names in role order (top, jungle, mid, adc, support)
    ///
    /// # Errors
    /// `ModelError::InvalidInput` unless exactly five names are given.
    pub fn new<S: AsRef<str>>(region: Region, names: &[S]) -> Result<Self, ModelError> {
        if names.len() != Role::ALL.len() {
            return Err(ModelError::InvalidInput(format!(
                "a roster needs exactly {} names, got {}",
                Role::ALL.len(),
                names.len()
            )));
        }

        Ok(Self {
            region,
            slots: std::array::from_fn(|i| Arc::new(Entity::new(region, names[i].as_ref()))),
        })
    }

    pub fn from_names(region: Region, names: [&str; 5]) -> Self {
        Self {
            region,
            slots: names.map(|name| Arc::new(Entity::new(region, name))),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn entity(&self, role: Role) -> &Entity {
        &self.slots[role.index()]
    }

    pub fn top(&self) -> &Entity {
        self.entity(Role::Top)
    }

    pub fn jungle(&self) -> &Entity {
        self.entity(Role::Jungle)
    }

    pub fn mid(&self) -> &Entity {
        self.entity(Role::Mid)
    }

    pub fn adc(&self) -> &Entity {
        self.entity(Role::Adc)
    }

    pub fn support(&self) -> &Entity {
        self.entity(Role::Support)
    }

    /// Shared handle for worker tasks
    pub(crate) fn shared(&self, role: Role) -> Arc<Entity> {
        Arc::clone(&self.slots[role.index()])
    }

    /// `(role, entity)` pairs in role order
    pub fn entities(&self) -> impl Iterator<Item = (Role, &Entity)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.entity(role)))
    }

    /// All five entities are complete
    pub fn is_complete(&self) -> bool {
        self.entities().all(|(_, entity)| entity.is_complete())
    }

    /// Collections still absent, in role order
    pub fn missing(&self) -> Vec<(Role, Category)> {
        self.entities()
            .flat_map(|(role, entity)| {
                Category::ALL
                    .into_iter()
                    .filter(move |c| entity.collection(*c).is_none())
                    .map(move |c| (role, c))
            })
            .collect()
    }
}

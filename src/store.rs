// 🗂️ Record Store - Canonical BEL profiles + monthly time series
//
// Single source of truth for the engine:
// - BEL name is a VALUE (can change), BEL referral id is IDENTITY (never changes)
// - Monthly click/order/revenue buckets live here and only here
// - Every downstream view re-derives from the store on read; nothing holds
//   a projected copy across a mutation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// ============================================================================
// LEVEL
// ============================================================================

/// BEL tier classification, ordered Builder < Enabler < Exploder < Leader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Builder,
    Enabler,
    Exploder,
    Leader,
}

impl Level {
    /// All levels in rank order (lowest first)
    pub const ALL: [Level; 4] = [Level::Builder, Level::Enabler, Level::Exploder, Level::Leader];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Builder => "Builder",
            Level::Enabler => "Enabler",
            Level::Exploder => "Exploder",
            Level::Leader => "Leader",
        }
    }

    /// Parse a level name (case-insensitive)
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_lowercase().as_str() {
            "builder" => Some(Level::Builder),
            "enabler" => Some(Level::Enabler),
            "exploder" => Some(Level::Exploder),
            "leader" => Some(Level::Leader),
            _ => None,
        }
    }

    /// Numeric rank for level-aware sorting: Builder=1 .. Leader=4
    pub fn rank(&self) -> u8 {
        match self {
            Level::Builder => 1,
            Level::Enabler => 2,
            Level::Exploder => 3,
            Level::Leader => 4,
        }
    }

    /// Rank for an arbitrary level string. Out-of-domain values rank
    /// lowest (0) so sorting never fails on dirty data.
    pub fn rank_of_str(s: &str) -> u8 {
        Level::parse(s).map(|l| l.rank()).unwrap_or(0)
    }
}

// ============================================================================
// MONTH
// ============================================================================

/// Calendar month. Monthly buckets are keyed by full English month name,
/// which is exactly how the snapshot data spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All 12 months, January first
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Parse a month name (case-insensitive)
    pub fn parse(s: &str) -> Option<Month> {
        let lower = s.trim().to_lowercase();
        Month::ALL.iter().copied().find(|m| m.as_str().to_lowercase() == lower)
    }

    /// 1-based month number (January=1)
    pub fn number(&self) -> u32 {
        Month::ALL.iter().position(|m| m == self).unwrap_or(0) as u32 + 1
    }

    /// Month from 1-based number
    pub fn from_number(n: u32) -> Option<Month> {
        if (1..=12).contains(&n) {
            Some(Month::ALL[(n - 1) as usize])
        } else {
            None
        }
    }

    /// January through `last` inclusive, in calendar order
    pub fn through(last: Month) -> &'static [Month] {
        static MONTHS: [Month; 12] = Month::ALL;
        let idx = MONTHS.iter().position(|m| *m == last).unwrap_or(11);
        &MONTHS[..=idx]
    }
}

// ============================================================================
// MONTHLY METRICS
// ============================================================================

/// One month's raw performance bucket.
///
/// `orders <= clicks` is NOT enforced: source data may violate it and the
/// engine propagates values as given.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    #[serde(default)]
    pub clicks: u64,

    #[serde(default)]
    pub orders: u64,

    #[serde(default)]
    pub revenue: f64,
}

impl MonthlyMetrics {
    pub fn new(clicks: u64, orders: u64, revenue: f64) -> Self {
        MonthlyMetrics { clicks, orders, revenue }
    }
}

// ============================================================================
// BEL PROFILE
// ============================================================================

/// Monthly buckets for one year, keyed by month name
pub type MonthlyBuckets = HashMap<Month, MonthlyMetrics>;

/// Canonical BEL record.
///
/// Identity: referral id (never changes, supplied by the snapshot).
/// Values: name, email, level, banking info (can change over time).
/// The banking payload is opaque to the engine - carried, never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelProfile {
    /// Stable referral id - NEVER changes
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub email: String,

    pub level: Level,

    /// Country name, mapped to a region at projection time
    #[serde(default)]
    pub country: String,

    /// Opaque banking payload owned by the banking-edit workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banking_info: Option<serde_json::Value>,

    /// Year -> month -> raw bucket
    #[serde(default)]
    pub monthly_data: HashMap<i32, MonthlyBuckets>,
}

impl BelProfile {
    pub fn new(id: &str, name: &str, email: &str, level: Level, country: &str) -> Self {
        BelProfile {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            level,
            country: country.to_string(),
            banking_info: None,
            monthly_data: HashMap::new(),
        }
    }

    /// Set one monthly bucket (used by loaders and tests)
    pub fn set_monthly(&mut self, year: i32, month: Month, metrics: MonthlyMetrics) {
        self.monthly_data.entry(year).or_default().insert(month, metrics);
    }

    /// Monthly bucket for a given year/month, if present
    pub fn monthly(&self, year: i32, month: Month) -> Option<&MonthlyMetrics> {
        self.monthly_data.get(&year).and_then(|buckets| buckets.get(&month))
    }

    /// Years with any monthly data, sorted ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.monthly_data.keys().copied().collect();
        years.sort_unstable();
        years
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Registry of all BEL profiles held in memory for the session.
///
/// This is the single mutable resource of the engine. Mutations happen only
/// in direct response to a discrete user action (edit level, merge loader
/// rows); every consumer re-derives its view from `all()` on the next read.
pub struct RecordStore {
    profiles: Arc<RwLock<Vec<BelProfile>>>,
}

impl RecordStore {
    /// Create new empty store
    pub fn new() -> Self {
        RecordStore {
            profiles: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store pre-populated with a snapshot
    pub fn with_profiles(profiles: Vec<BelProfile>) -> Self {
        let store = RecordStore::new();
        {
            let mut guard = store.profiles.write().unwrap();
            for profile in profiles {
                Self::upsert(&mut guard, profile);
            }
        }
        store
    }

    fn upsert(profiles: &mut Vec<BelProfile>, profile: BelProfile) {
        // Referral ids are unique: a re-registered id replaces the old record
        if let Some(existing) = profiles.iter_mut().find(|p| p.id == profile.id) {
            *existing = profile;
        } else {
            profiles.push(profile);
        }
    }

    /// Register a profile (replaces any existing profile with the same id)
    pub fn register(&mut self, profile: BelProfile) {
        let mut profiles = self.profiles.write().unwrap();
        Self::upsert(&mut profiles, profile);
    }

    /// Register a batch of profiles
    pub fn register_all(&mut self, batch: Vec<BelProfile>) {
        let mut profiles = self.profiles.write().unwrap();
        for profile in batch {
            Self::upsert(&mut profiles, profile);
        }
    }

    /// Get a profile by referral id
    pub fn get(&self, id: &str) -> Option<BelProfile> {
        let profiles = self.profiles.read().unwrap();
        profiles.iter().find(|p| p.id == id).cloned()
    }

    /// Snapshot of all profiles, cloned out so no consumer aliases store state
    pub fn all(&self) -> Vec<BelProfile> {
        let profiles = self.profiles.read().unwrap();
        profiles.clone()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().unwrap().is_empty()
    }

    /// Change a BEL's level - the one edit the engine accepts from the
    /// level-editing collaborator. Unknown ids are an error.
    pub fn update_level(&mut self, id: &str, level: Level) -> Result<()> {
        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow!("BEL not found: {}", id))?;
        profile.level = level;
        Ok(())
    }

    /// Write one monthly bucket for a BEL (loader merge path)
    pub fn set_monthly(&mut self, id: &str, year: i32, month: Month, metrics: MonthlyMetrics) -> Result<()> {
        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow!("BEL not found: {}", id))?;
        profile.set_monthly(year, month, metrics);
        Ok(())
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

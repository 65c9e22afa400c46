// 📂 Snapshot Loader - External input boundary
//
// The engine operates over an in-memory snapshot supplied once per session.
// This module owns the input formats: a JSON snapshot of BEL profiles and an
// optional CSV of monthly time-series rows merged on top. Everything past
// this boundary is plain typed data.

use crate::store::{BelProfile, Month, MonthlyMetrics, RecordStore};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// ============================================================================
// JSON SNAPSHOT
// ============================================================================

/// Snapshot document as exported by the portal backend
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// When the export was produced (informational)
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,

    pub profiles: Vec<BelProfile>,
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(json).context("Failed to parse snapshot JSON")?;

    // Referral ids are the identity key; a duplicate means a corrupt export
    let mut seen = std::collections::HashSet::new();
    for profile in &snapshot.profiles {
        if !seen.insert(profile.id.as_str()) {
            return Err(anyhow!("Duplicate BEL id in snapshot: {}", profile.id));
        }
    }

    Ok(snapshot)
}

/// Load a snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    parse_snapshot(&json)
}

/// Load a snapshot file straight into a fresh store
pub fn load_store(path: &Path) -> Result<RecordStore> {
    let snapshot = load_snapshot(path)?;
    Ok(RecordStore::with_profiles(snapshot.profiles))
}

// ============================================================================
// MONTHLY CSV
// ============================================================================

/// One row of a monthly time-series CSV export
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyRow {
    pub bel_id: String,
    pub year: i32,
    pub month: Month,

    #[serde(default)]
    pub clicks: u64,

    #[serde(default)]
    pub orders: u64,

    #[serde(default)]
    pub revenue: f64,
}

/// Load monthly rows from a CSV file with a
/// `bel_id,year,month,clicks,orders,revenue` header
pub fn load_monthly_csv(path: &Path) -> Result<Vec<MonthlyRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open monthly CSV: {}", path.display()))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: MonthlyRow = result.context("Failed to deserialize monthly row")?;
        rows.push(row);
    }

    Ok(rows)
}

/// Merge monthly rows into the store. Every row must name a registered BEL;
/// an unknown id aborts the merge with the offending id in the error.
pub fn merge_monthly_rows(store: &mut RecordStore, rows: Vec<MonthlyRow>) -> Result<()> {
    for row in rows {
        store
            .set_monthly(
                &row.bel_id,
                row.year,
                row.month,
                MonthlyMetrics::new(row.clicks, row.orders, row.revenue),
            )
            .with_context(|| format!("Monthly row references unknown BEL: {}", row.bel_id))?;
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

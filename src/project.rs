// 🪞 Record Projector - Flat view record shared by every renderer
//
// Flattens one BelProfile + its yearly aggregate + derived metrics into the
// AccountRecord the table, grid and list views all consume. Projection is
// referentially transparent and runs per query evaluation: there is no cache
// to go stale when the store is edited.

use crate::aggregate::{aggregate, CutoffPolicy, YearlyAggregate};
use crate::metrics::{average_order_value, conversion_rate, Region, RegionTable};
use crate::store::{BelProfile, Level, Month};
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT RECORD
// ============================================================================

/// Flat per-BEL view record for one year under one cutoff.
///
/// Constructed per query evaluation, never mutated in place, discarded
/// after render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub level: Level,
    pub clicks: u64,
    pub orders: u64,
    pub revenue: f64,
    /// Percent, 0.0 when there are no clicks
    pub conversion_rate: f64,
    /// 0.0 when there are no orders
    pub aov: f64,
    pub country: String,
    pub region: Region,
}

impl AccountRecord {
    /// True when the BEL has neither clicks nor orders in the window
    pub fn is_inactive(&self) -> bool {
        self.clicks + self.orders == 0
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Project one profile into its view record for `year` over `months`.
///
/// Two profiles with identical fields project to identical records - the
/// table, grid and list renderers each call this and must agree.
pub fn project(profile: &BelProfile, year: i32, months: &[Month], regions: &RegionTable) -> AccountRecord {
    let YearlyAggregate { clicks, orders, revenue } = aggregate(profile, year, months);

    AccountRecord {
        id: profile.id.clone(),
        name: profile.name.clone(),
        email: profile.email.clone(),
        level: profile.level,
        clicks,
        orders,
        revenue,
        conversion_rate: conversion_rate(clicks, orders),
        aov: average_order_value(revenue, orders),
        country: profile.country.clone(),
        region: regions.region_of(&profile.country),
    }
}

/// Project a whole snapshot under a cutoff policy, preserving input order
pub fn project_all(
    profiles: &[BelProfile],
    year: i32,
    policy: &CutoffPolicy,
    regions: &RegionTable,
) -> Vec<AccountRecord> {
    let months = policy.months_for(year);
    profiles
        .iter()
        .map(|profile| project(profile, year, months, regions))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

// 📈 Metrics Calculator - Derived ratios and geographic lookup
//
// Conversion rate and AOV with zero-denominator guards (a non-finite number
// reaching a renderer is a defect), plus the country → sales-region table.
// The region table is configuration data: the engine ships the standard
// mapping and unmapped countries resolve to Others.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// RATIOS
// ============================================================================

/// Click-to-order conversion rate as a percentage.
///
/// 0 clicks → 0.0, never NaN or infinity.
pub fn conversion_rate(clicks: u64, orders: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    orders as f64 / clicks as f64 * 100.0
}

/// Average order value: revenue / orders.
///
/// 0 orders → 0.0, never NaN or infinity.
pub fn average_order_value(revenue: f64, orders: u64) -> f64 {
    if orders == 0 {
        return 0.0;
    }
    revenue / orders as f64
}

// ============================================================================
// REGION
// ============================================================================

/// Sales region label, the fixed set used by the portal's filters and cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    AauNz,
    Asean,
    China,
    Europe,
    India,
    Japan,
    Korea,
    Latam,
    MeA,
    NorthAmerica,
    Taiwan,
    RussiaCis,
    Others,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::AauNz => "AAU / NZ",
            Region::Asean => "ASEAN",
            Region::China => "China",
            Region::Europe => "Europe",
            Region::India => "India",
            Region::Japan => "Japan",
            Region::Korea => "Korea",
            Region::Latam => "LATAM",
            Region::MeA => "ME&A",
            Region::NorthAmerica => "North America",
            Region::Taiwan => "Taiwan",
            Region::RussiaCis => "Russia & CIS",
            Region::Others => "Others",
        }
    }

    /// Parse a region label as it appears in filter dropdowns
    pub fn parse(s: &str) -> Option<Region> {
        let trimmed = s.trim();
        [
            Region::AauNz,
            Region::Asean,
            Region::China,
            Region::Europe,
            Region::India,
            Region::Japan,
            Region::Korea,
            Region::Latam,
            Region::MeA,
            Region::NorthAmerica,
            Region::Taiwan,
            Region::RussiaCis,
            Region::Others,
        ]
        .into_iter()
        .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
    }
}

// ============================================================================
// REGION TABLE
// ============================================================================

/// The standard country → region mapping
const STANDARD_REGIONS: &[(&str, Region)] = &[
    // AAU / NZ
    ("Australia", Region::AauNz),
    ("New Zealand", Region::AauNz),
    // ASEAN
    ("Brunei", Region::Asean),
    ("Cambodia", Region::Asean),
    ("Indonesia", Region::Asean),
    ("Malaysia", Region::Asean),
    ("Philippines", Region::Asean),
    ("Singapore", Region::Asean),
    ("Thailand", Region::Asean),
    ("Vietnam", Region::Asean),
    ("Myanmar", Region::Asean),
    ("Laos", Region::Asean),
    // China
    ("China", Region::China),
    // Europe
    ("Austria", Region::Europe),
    ("Belgium", Region::Europe),
    ("Bulgaria", Region::Europe),
    ("Croatia", Region::Europe),
    ("Cyprus", Region::Europe),
    ("Czech Republic", Region::Europe),
    ("Denmark", Region::Europe),
    ("Estonia", Region::Europe),
    ("Finland", Region::Europe),
    ("France", Region::Europe),
    ("Germany", Region::Europe),
    ("Greece", Region::Europe),
    ("Hungary", Region::Europe),
    ("Ireland", Region::Europe),
    ("Italy", Region::Europe),
    ("Latvia", Region::Europe),
    ("Lithuania", Region::Europe),
    ("Luxembourg", Region::Europe),
    ("Malta", Region::Europe),
    ("Netherlands", Region::Europe),
    ("Poland", Region::Europe),
    ("Portugal", Region::Europe),
    ("Romania", Region::Europe),
    ("Slovakia", Region::Europe),
    ("Slovenia", Region::Europe),
    ("Spain", Region::Europe),
    ("Sweden", Region::Europe),
    ("Norway", Region::Europe),
    ("Switzerland", Region::Europe),
    ("United Kingdom", Region::Europe),
    ("Iceland", Region::Europe),
    // India
    ("India", Region::India),
    // Japan
    ("Japan", Region::Japan),
    // Korea
    ("South Korea", Region::Korea),
    ("Korea", Region::Korea),
    // LATAM
    ("Argentina", Region::Latam),
    ("Bolivia", Region::Latam),
    ("Brazil", Region::Latam),
    ("Chile", Region::Latam),
    ("Colombia", Region::Latam),
    ("Costa Rica", Region::Latam),
    ("Cuba", Region::Latam),
    ("Dominican Republic", Region::Latam),
    ("Ecuador", Region::Latam),
    ("El Salvador", Region::Latam),
    ("Guatemala", Region::Latam),
    ("Honduras", Region::Latam),
    ("Mexico", Region::Latam),
    ("Nicaragua", Region::Latam),
    ("Panama", Region::Latam),
    ("Paraguay", Region::Latam),
    ("Peru", Region::Latam),
    ("Uruguay", Region::Latam),
    ("Venezuela", Region::Latam),
    // ME&A
    ("Algeria", Region::MeA),
    ("Angola", Region::MeA),
    ("Egypt", Region::MeA),
    ("Ethiopia", Region::MeA),
    ("Ghana", Region::MeA),
    ("Kenya", Region::MeA),
    ("Morocco", Region::MeA),
    ("Nigeria", Region::MeA),
    ("South Africa", Region::MeA),
    ("Tunisia", Region::MeA),
    ("Uganda", Region::MeA),
    ("Zimbabwe", Region::MeA),
    ("Israel", Region::MeA),
    ("Jordan", Region::MeA),
    ("Lebanon", Region::MeA),
    ("Qatar", Region::MeA),
    ("Saudi Arabia", Region::MeA),
    ("UAE", Region::MeA),
    ("Turkey", Region::MeA),
    ("Iran", Region::MeA),
    ("Iraq", Region::MeA),
    ("Kuwait", Region::MeA),
    ("Oman", Region::MeA),
    ("Bahrain", Region::MeA),
    // North America
    ("United States", Region::NorthAmerica),
    ("Canada", Region::NorthAmerica),
    // Taiwan
    ("Taiwan", Region::Taiwan),
    // Russia & CIS
    ("Russia", Region::RussiaCis),
    ("Belarus", Region::RussiaCis),
    ("Kazakhstan", Region::RussiaCis),
    ("Kyrgyzstan", Region::RussiaCis),
    ("Tajikistan", Region::RussiaCis),
    ("Turkmenistan", Region::RussiaCis),
    ("Uzbekistan", Region::RussiaCis),
    ("Armenia", Region::RussiaCis),
    ("Azerbaijan", Region::RussiaCis),
    ("Georgia", Region::RussiaCis),
    ("Moldova", Region::RussiaCis),
    ("Ukraine", Region::RussiaCis),
];

/// Country → region lookup table.
///
/// Ships with the standard mapping; entries can be added or overridden by
/// external configuration. Unmapped countries resolve to `Region::Others`.
#[derive(Debug, Clone)]
pub struct RegionTable {
    map: HashMap<String, Region>,
}

impl RegionTable {
    /// Table with the standard mapping
    pub fn new() -> Self {
        RegionTable::from_entries(STANDARD_REGIONS.iter().map(|(c, r)| (c.to_string(), *r)))
    }

    /// Empty table (everything maps to Others until configured)
    pub fn empty() -> Self {
        RegionTable { map: HashMap::new() }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Region)>) -> Self {
        RegionTable {
            map: entries.into_iter().collect(),
        }
    }

    /// Add or override one country mapping
    pub fn insert(&mut self, country: &str, region: Region) {
        self.map.insert(country.to_string(), region);
    }

    /// Region for a country; unmapped → Others
    pub fn region_of(&self, country: &str) -> Region {
        self.map.get(country).copied().unwrap_or(Region::Others)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Measurement records and the in-memory dataset.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Valid range for `temperature_c`, degrees Celsius.
pub const TEMPERATURE_RANGE: (f64, f64) = (-2.0, 40.0);
/// Valid range for `salinity_psu`, Practical Salinity Units.
pub const SALINITY_RANGE: (f64, f64) = (20.0, 45.0);
/// Valid range for `latitude`, degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid range for `longitude`, degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
/// Valid range for `depth_m`, meters.
pub const DEPTH_RANGE: (f64, f64) = (0.0, 6000.0);

/// Meteorological season derived from the measurement month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Dec/Jan/Feb map to Winter, then three-month blocks in order.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// One of six fixed latitude bands used for regional grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatZone {
    Antarctic,
    Southern,
    TropicalS,
    TropicalN,
    Northern,
    Arctic,
}

impl LatZone {
    /// All zones, ordered from south to north.
    pub const ORDERED: [LatZone; 6] = [
        LatZone::Antarctic,
        LatZone::Southern,
        LatZone::TropicalS,
        LatZone::TropicalN,
        LatZone::Northern,
        LatZone::Arctic,
    ];

    /// Bins latitude into half-open bands (lower, upper]. Exactly -90, NaN,
    /// and out-of-range values fall into no band.
    pub fn from_latitude(latitude: f64) -> Option<Self> {
        if !(latitude > -90.0 && latitude <= 90.0) {
            return None;
        }
        Some(if latitude <= -60.0 {
            LatZone::Antarctic
        } else if latitude <= -30.0 {
            LatZone::Southern
        } else if latitude <= 0.0 {
            LatZone::TropicalS
        } else if latitude <= 30.0 {
            LatZone::TropicalN
        } else if latitude <= 60.0 {
            LatZone::Northern
        } else {
            LatZone::Arctic
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            LatZone::Antarctic => "Antarctic",
            LatZone::Southern => "Southern",
            LatZone::TropicalS => "Tropical_S",
            LatZone::TropicalN => "Tropical_N",
            LatZone::Northern => "Northern",
            LatZone::Arctic => "Arctic",
        }
    }
}

/// One reading at one depth for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Profile identifier; many records share one profile.
    pub profile_id: i64,
    /// Degrees north, [-90, 90].
    pub latitude: f64,
    /// Degrees east, [-180, 180].
    pub longitude: f64,
    /// Measurement timestamp (UTC); one per profile.
    pub date: DateTime<Utc>,
    /// Depth below surface in meters, [0, 6000].
    pub depth_m: f64,
    /// Water temperature in degrees Celsius, [-2, 40].
    pub temperature_c: f64,
    /// Salinity in PSU, [20, 45].
    pub salinity_psu: f64,
    /// Pressure in decibar, exactly 1.025 x depth.
    pub pressure_dbar: f64,
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

impl Measurement {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.date.month())
    }

    pub fn lat_zone(&self) -> Option<LatZone> {
        LatZone::from_latitude(self.latitude)
    }

    /// True when every range-constrained field holds a value inside its
    /// valid range. NaN in temperature, salinity, latitude, or longitude
    /// counts as missing and fails the check.
    pub fn is_valid(&self) -> bool {
        in_range(self.temperature_c, TEMPERATURE_RANGE)
            && in_range(self.salinity_psu, SALINITY_RANGE)
            && in_range(self.latitude, LATITUDE_RANGE)
            && in_range(self.longitude, LONGITUDE_RANGE)
            && in_range(self.depth_m, DEPTH_RANGE)
    }
}

/// Ordered collection of measurements. Records are never mutated in place;
/// filtering and preprocessing always build new collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Measurement>,
}

impl Dataset {
    pub fn new(records: Vec<Measurement>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Measurement] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.records.iter()
    }

    /// Number of distinct profiles represented in the dataset.
    pub fn profile_count(&self) -> usize {
        self.records
            .iter()
            .map(|m| m.profile_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Returns a copy with all invalid records dropped. Idempotent.
    pub fn preprocessed(&self) -> Dataset {
        Dataset::new(
            self.records
                .iter()
                .filter(|m| m.is_valid())
                .cloned()
                .collect(),
        )
    }
}

//! Pure filtering of datasets by depth, geography, time, and region.

use super::measurement::{Dataset, Measurement};
use chrono::{DateTime, Utc};

/// Bounds extracted from a user query. Unset fields do not constrain the
/// result; all set fields must hold at once, with inclusive endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub region: Option<String>,
}

impl QueryFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn matches(&self, m: &Measurement) -> bool {
        if let Some(min) = self.min_depth {
            if m.depth_m < min {
                return false;
            }
        }
        if let Some(max) = self.max_depth {
            if m.depth_m > max {
                return false;
            }
        }
        if let Some(min) = self.min_lat {
            if m.latitude < min {
                return false;
            }
        }
        if let Some(max) = self.max_lat {
            if m.latitude > max {
                return false;
            }
        }
        if let Some(min) = self.min_lon {
            if m.longitude < min {
                return false;
            }
        }
        if let Some(max) = self.max_lon {
            if m.longitude > max {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if m.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if m.date > end {
                return false;
            }
        }
        if let Some(region) = &self.region {
            let zone = m.lat_zone().map(|z| z.label());
            if zone != Some(region.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Applies quality preprocessing and then the filter to a dataset,
/// returning the matching records as a new dataset. The input is never
/// modified.
pub fn query(dataset: &Dataset, filter: &QueryFilter) -> Dataset {
    let preprocessed = dataset.preprocessed();
    if filter.is_empty() {
        return preprocessed;
    }
    Dataset::new(
        preprocessed
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::measurement::tests::sample_measurement;
    use chrono::TimeZone;

    fn dataset_with_depths(depths: &[f64]) -> Dataset {
        Dataset::new(
            depths
                .iter()
                .map(|&d| {
                    let mut m = sample_measurement();
                    m.depth_m = d;
                    m.pressure_dbar = d * 1.025;
                    m
                })
                .collect(),
        )
    }

    #[test]
    fn test_depth_bounds_are_inclusive() {
        let dataset = dataset_with_depths(&[50.0, 100.0, 300.0, 500.0, 600.0]);
        let filter = QueryFilter {
            min_depth: Some(100.0),
            max_depth: Some(500.0),
            ..Default::default()
        };

        let result = query(&dataset, &filter);
        let depths: Vec<f64> = result.iter().map(|m| m.depth_m).collect();
        assert_eq!(depths, vec![100.0, 300.0, 500.0]);
    }

    #[test]
    fn test_filtered_result_is_subset() {
        let dataset = dataset_with_depths(&[0.0, 250.0, 1000.0, 2000.0]);
        let filter = QueryFilter {
            max_depth: Some(1000.0),
            ..Default::default()
        };

        let result = query(&dataset, &filter);
        assert!(result.len() <= dataset.len());
        for m in result.iter() {
            assert!(dataset.records().contains(m));
        }
    }

    #[test]
    fn test_filtering_twice_is_idempotent() {
        let dataset = dataset_with_depths(&[10.0, 200.0, 900.0, 1500.0]);
        let filter = QueryFilter {
            min_depth: Some(100.0),
            max_depth: Some(1000.0),
            ..Default::default()
        };

        let once = query(&dataset, &filter);
        let twice = query(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_query_does_not_mutate_input() {
        let dataset = dataset_with_depths(&[10.0, 2000.0]);
        let before = dataset.clone();
        let filter = QueryFilter {
            max_depth: Some(100.0),
            ..Default::default()
        };

        let _ = query(&dataset, &filter);
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_empty_filter_returns_preprocessed_dataset() {
        let mut invalid = sample_measurement();
        invalid.temperature_c = 95.0;
        let mut records = dataset_with_depths(&[10.0, 20.0]).records().to_vec();
        records.push(invalid);
        let dataset = Dataset::new(records);

        let result = query(&dataset, &QueryFilter::default());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_region_matches_latitude_zone_labels_only() {
        let mut southern = sample_measurement();
        southern.latitude = -45.0;
        let dataset = Dataset::new(vec![southern]);

        let atlantic = QueryFilter {
            region: Some("Atlantic".to_string()),
            ..Default::default()
        };
        assert!(query(&dataset, &atlantic).is_empty());

        let zone = QueryFilter {
            region: Some("Southern".to_string()),
            ..Default::default()
        };
        assert_eq!(query(&dataset, &zone).len(), 1);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let mut m = sample_measurement();
        m.date = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let dataset = Dataset::new(vec![m.clone()]);

        let filter = QueryFilter {
            start_date: Some(m.date),
            end_date: Some(m.date),
            ..Default::default()
        };
        assert_eq!(query(&dataset, &filter).len(), 1);
    }

    #[test]
    fn test_conjunctive_bounds_must_all_hold() {
        let mut shallow_north = sample_measurement();
        shallow_north.latitude = 45.0;
        shallow_north.depth_m = 50.0;
        let mut deep_north = sample_measurement();
        deep_north.latitude = 45.0;
        deep_north.depth_m = 800.0;
        let mut shallow_south = sample_measurement();
        shallow_south.latitude = -45.0;
        shallow_south.depth_m = 50.0;
        let dataset = Dataset::new(vec![shallow_north, deep_north, shallow_south]);

        let filter = QueryFilter {
            min_lat: Some(0.0),
            max_depth: Some(100.0),
            ..Default::default()
        };
        let result = query(&dataset, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result.records()[0].latitude, 45.0);
        assert_eq!(result.records()[0].depth_m, 50.0);
    }
}

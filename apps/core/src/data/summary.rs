//! Summary statistics over a dataset, for the summary endpoint and for
//! grounding model prompts in the actual data.

use super::measurement::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicCoverage {
    pub lat_range: [f64; 2],
    pub lon_range: [f64; 2],
}

/// Aggregate statistics for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_profiles: usize,
    pub total_measurements: usize,
    pub date_range: DateRange,
    pub depth_range: DepthRange,
    pub temperature_range: StatRange,
    pub salinity_range: StatRange,
    pub geographic_coverage: GeographicCoverage,
}

fn stats(values: impl Iterator<Item = f64>) -> Option<StatRange> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(StatRange {
        min,
        max,
        mean: sum / count as f64,
    })
}

impl DatasetSummary {
    /// Computes the summary, or `None` for an empty dataset.
    pub fn compute(dataset: &Dataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let start = dataset.iter().map(|m| m.date).min()?;
        let end = dataset.iter().map(|m| m.date).max()?;
        let depth = stats(dataset.iter().map(|m| m.depth_m))?;
        let temperature = stats(dataset.iter().map(|m| m.temperature_c))?;
        let salinity = stats(dataset.iter().map(|m| m.salinity_psu))?;
        let latitude = stats(dataset.iter().map(|m| m.latitude))?;
        let longitude = stats(dataset.iter().map(|m| m.longitude))?;

        Some(Self {
            total_profiles: dataset.profile_count(),
            total_measurements: dataset.len(),
            date_range: DateRange {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            },
            depth_range: DepthRange {
                min: depth.min,
                max: depth.max,
            },
            temperature_range: temperature,
            salinity_range: salinity,
            geographic_coverage: GeographicCoverage {
                lat_range: [latitude.min, latitude.max],
                lon_range: [longitude.min, longitude.max],
            },
        })
    }
}

/// Renders the dataset statistics as plain text for inclusion in a model
/// prompt.
pub fn data_context(dataset: &Dataset) -> String {
    match DatasetSummary::compute(dataset) {
        None => "No data available".to_string(),
        Some(s) => format!(
            "Dataset contains {} measurements from {} profiles.\n\
             Data spans from {} to {}\n\
             Depth range: {:.1}m to {:.1}m\n\
             Temperature range: {:.2}°C to {:.2}°C\n\
             Salinity range: {:.2} to {:.2} PSU\n\
             Geographic coverage: {:.1}° to {:.1}° latitude, {:.1}° to {:.1}° longitude",
            s.total_measurements,
            s.total_profiles,
            s.date_range.start,
            s.date_range.end,
            s.depth_range.min,
            s.depth_range.max,
            s.temperature_range.min,
            s.temperature_range.max,
            s.salinity_range.min,
            s.salinity_range.max,
            s.geographic_coverage.lat_range[0],
            s.geographic_coverage.lat_range[1],
            s.geographic_coverage.lon_range[0],
            s.geographic_coverage.lon_range[1],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::measurement::tests::sample_measurement;
    use crate::data::measurement::Measurement;
    use chrono::{TimeZone, Utc};

    fn three_record_dataset() -> Dataset {
        let mut a = sample_measurement();
        a.profile_id = 1;
        a.date = Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap();
        a.temperature_c = 10.0;
        let mut b = sample_measurement();
        b.profile_id = 1;
        b.date = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        b.temperature_c = 20.0;
        let mut c = sample_measurement();
        c.profile_id = 2;
        c.date = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        c.temperature_c = 15.0;
        Dataset::new(vec![a, b, c])
    }

    #[test]
    fn test_empty_dataset_has_no_summary() {
        assert!(DatasetSummary::compute(&Dataset::default()).is_none());
    }

    #[test]
    fn test_summary_counts_and_ranges() {
        let summary = DatasetSummary::compute(&three_record_dataset()).unwrap();
        assert_eq!(summary.total_measurements, 3);
        assert_eq!(summary.total_profiles, 2);
        assert_eq!(summary.date_range.start, "2023-01-05");
        assert_eq!(summary.date_range.end, "2023-12-31");
        assert_eq!(summary.temperature_range.min, 10.0);
        assert_eq!(summary.temperature_range.max, 20.0);
        assert_eq!(summary.temperature_range.mean, 15.0);
    }

    #[test]
    fn test_mean_lies_between_min_and_max() {
        let dataset = crate::data::synthetic::generate_sample_dataset();
        let summary = DatasetSummary::compute(&dataset).unwrap();
        for range in [&summary.temperature_range, &summary.salinity_range] {
            assert!(range.min <= range.mean);
            assert!(range.mean <= range.max);
        }
    }

    #[test]
    fn test_single_record_collapses_ranges() {
        let m: Measurement = sample_measurement();
        let summary = DatasetSummary::compute(&Dataset::new(vec![m.clone()])).unwrap();
        assert_eq!(summary.depth_range.min, summary.depth_range.max);
        assert_eq!(summary.temperature_range.mean, m.temperature_c);
        assert_eq!(summary.geographic_coverage.lat_range, [m.latitude, m.latitude]);
    }

    #[test]
    fn test_context_text_mentions_counts_and_units() {
        let text = data_context(&three_record_dataset());
        assert!(text.starts_with("Dataset contains 3 measurements from 2 profiles."));
        assert!(text.contains("Data spans from 2023-01-05 to 2023-12-31"));
        assert!(text.contains("°C"));
        assert!(text.contains("PSU"));
    }

    #[test]
    fn test_context_for_empty_dataset() {
        assert_eq!(data_context(&Dataset::default()), "No data available");
    }
}

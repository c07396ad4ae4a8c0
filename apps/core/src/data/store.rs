//! Durable dataset cache (Arrow IPC) and the shared, initialize-once
//! data service.

use super::measurement::{Dataset, Measurement};
use super::summary::DatasetSummary;
use super::synthetic;
use crate::error::AppError;
use arrow::array::{ArrayRef, Float64Array, Int64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// File name of the cached columnar dataset inside the data directory.
pub const CACHE_FILE_NAME: &str = "argo_cache.arrow";

/// Column order of the cached table, as exposed by the preview endpoint.
pub const COLUMNS: [&str; 8] = [
    "profile_id",
    "latitude",
    "longitude",
    "date",
    "depth_m",
    "temperature_c",
    "salinity_psu",
    "pressure_dbar",
];

/// Disk-level access to the cached dataset.
pub struct ArgoDataStore {
    data_dir: PathBuf,
}

impl ArgoDataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE_NAME)
    }

    /// Loads the dataset, synthesizing and caching it when no cache file
    /// exists. `None` means the data is unavailable; causes are logged here
    /// and never propagated to callers.
    pub fn load(&self) -> Option<Dataset> {
        let path = self.cache_path();
        if path.exists() {
            return match read_cache(&path) {
                Ok(dataset) => {
                    info!("Loaded {} records from cache {:?}", dataset.len(), path);
                    Some(dataset)
                }
                Err(e) => {
                    error!("Failed to read dataset cache {:?}: {}", path, e);
                    None
                }
            };
        }

        warn!("No cached dataset found, synthesizing sample data");
        let dataset = synthetic::generate_sample_dataset();
        match self.persist(&dataset) {
            Ok(()) => {
                info!("Cached {} synthesized records to {:?}", dataset.len(), path);
                Some(dataset)
            }
            Err(e) => {
                error!("Failed to persist synthesized dataset: {}", e);
                None
            }
        }
    }

    /// Writes the dataset to the cache file, creating the data directory
    /// as needed.
    pub fn persist(&self, dataset: &Dataset) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.data_dir)?;
        let batch = to_record_batch(dataset)?;
        let file = File::create(self.cache_path())?;
        let mut writer = FileWriter::try_new(file, &batch.schema())?;
        writer.write(&batch)?;
        writer.finish()?;
        Ok(())
    }
}

fn cache_schema() -> Schema {
    Schema::new(vec![
        Field::new("profile_id", DataType::Int64, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new(
            "date",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            false,
        ),
        Field::new("depth_m", DataType::Float64, false),
        Field::new("temperature_c", DataType::Float64, false),
        Field::new("salinity_psu", DataType::Float64, false),
        Field::new("pressure_dbar", DataType::Float64, false),
    ])
}

fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch, AppError> {
    let records = dataset.records();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(
            records.iter().map(|m| m.profile_id),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.latitude),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.longitude),
        )),
        Arc::new(TimestampMillisecondArray::from_iter_values(
            records.iter().map(|m| m.date.timestamp_millis()),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.depth_m),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.temperature_c),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.salinity_psu),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|m| m.pressure_dbar),
        )),
    ];
    Ok(RecordBatch::try_new(Arc::new(cache_schema()), columns)?)
}

fn column_as<'a, T: 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> Result<&'a T, AppError> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| AppError::Internal(format!("cache column {} has unexpected type", name)))
}

fn read_cache(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)?;
    let reader = FileReader::try_new(file, None)?;
    let mut records = Vec::new();
    for batch in reader {
        append_batch(&mut records, &batch?)?;
    }
    Ok(Dataset::new(records))
}

fn append_batch(records: &mut Vec<Measurement>, batch: &RecordBatch) -> Result<(), AppError> {
    let profile_ids = column_as::<Int64Array>(batch, 0, "profile_id")?;
    let latitudes = column_as::<Float64Array>(batch, 1, "latitude")?;
    let longitudes = column_as::<Float64Array>(batch, 2, "longitude")?;
    let dates = column_as::<TimestampMillisecondArray>(batch, 3, "date")?;
    let depths = column_as::<Float64Array>(batch, 4, "depth_m")?;
    let temperatures = column_as::<Float64Array>(batch, 5, "temperature_c")?;
    let salinities = column_as::<Float64Array>(batch, 6, "salinity_psu")?;
    let pressures = column_as::<Float64Array>(batch, 7, "pressure_dbar")?;

    records.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        let millis = dates.value(i);
        let date = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| AppError::Internal(format!("invalid timestamp {} in cache", millis)))?;
        records.push(Measurement {
            profile_id: profile_ids.value(i),
            latitude: latitudes.value(i),
            longitude: longitudes.value(i),
            date,
            depth_m: depths.value(i),
            temperature_c: temperatures.value(i),
            salinity_psu: salinities.value(i),
            pressure_dbar: pressures.value(i),
        });
    }
    Ok(())
}

/// Process-wide cached access to the dataset and its summary, shared
/// through the HTTP state. Each cell initializes at most once even under
/// concurrent first requests.
#[derive(Clone)]
pub struct DataService {
    store: Arc<ArgoDataStore>,
    dataset: Arc<OnceCell<Option<Arc<Dataset>>>>,
    summary: Arc<OnceCell<Option<DatasetSummary>>>,
}

impl DataService {
    pub fn new(store: ArgoDataStore) -> Self {
        Self {
            store: Arc::new(store),
            dataset: Arc::new(OnceCell::new()),
            summary: Arc::new(OnceCell::new()),
        }
    }

    /// The raw (unpreprocessed) dataset, loaded on first access.
    pub async fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset
            .get_or_init(|| async { self.store.load().map(Arc::new) })
            .await
            .clone()
    }

    /// Summary statistics over the preprocessed dataset, computed on first
    /// access. `None` when the data is unavailable.
    pub async fn summary(&self) -> Option<DatasetSummary> {
        let service = self.clone();
        self.summary
            .get_or_init(|| async move {
                match service.dataset().await {
                    Some(dataset) => {
                        info!("Computing dataset summary");
                        DatasetSummary::compute(&dataset.preprocessed())
                    }
                    None => None,
                }
            })
            .await
            .clone()
    }

    /// Fills both caches ahead of the first request.
    pub async fn warm_up(&self) {
        let dataset = self.dataset().await;
        match &dataset {
            Some(dataset) => info!("Warmed dataset cache with {} records", dataset.len()),
            None => error!("Dataset warm-up failed, data is unavailable"),
        }
        let _ = self.summary().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn small_dataset() -> Dataset {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 6, 30, 0).unwrap();
        let records = (0..3)
            .map(|i| Measurement {
                profile_id: i,
                latitude: 10.0 + i as f64,
                longitude: -20.0 - i as f64,
                date,
                depth_m: 50.0 * i as f64,
                temperature_c: 20.0 - i as f64,
                salinity_psu: 35.0 + 0.1 * i as f64,
                pressure_dbar: 50.0 * i as f64 * 1.025,
            })
            .collect();
        Dataset::new(records)
    }

    #[test]
    fn test_cache_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArgoDataStore::new(dir.path());
        let dataset = small_dataset();

        store.persist(&dataset).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_corrupted_cache_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArgoDataStore::new(dir.path());
        std::fs::write(store.cache_path(), b"not an arrow file").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_millisecond_date_precision_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArgoDataStore::new(dir.path());
        let mut dataset = small_dataset();
        let with_millis = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
        dataset = Dataset::new(
            dataset
                .iter()
                .map(|m| Measurement {
                    date: with_millis,
                    ..m.clone()
                })
                .collect(),
        );

        store.persist(&dataset).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.records()[0].date, with_millis);
    }
}

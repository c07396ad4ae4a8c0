//! Deterministic synthesis of the sample Argo-like dataset.
//!
//! No real float data is downloaded; a seeded generator produces the same
//! profiles on every run so caches and tests are reproducible.

use super::measurement::{Dataset, Measurement};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed so synthesis reproduces across runs.
pub const DATASET_SEED: u64 = 42;
/// Number of synthetic profiles.
pub const PROFILE_COUNT: usize = 1000;
/// Depth samples per profile.
pub const SAMPLES_PER_PROFILE: usize = 50;

const MAX_PROFILE_DEPTH_M: f64 = 2000.0;
const DATE_SPREAD_DAYS: i64 = 1825;
const PRESSURE_PER_METER: f64 = 1.025;

/// One draw from N(mean, std_dev) via the Box-Muller transform.
fn sample_normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std_dev * z
}

/// Generates the full synthetic dataset with the fixed seed, dated
/// relative to the current time.
pub fn generate_sample_dataset() -> Dataset {
    generate_at(DATASET_SEED, Utc::now())
}

/// Generates a dataset from an explicit seed and reference time. Two calls
/// with the same arguments produce identical records.
pub fn generate_at(seed: u64, now: DateTime<Utc>) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(PROFILE_COUNT * SAMPLES_PER_PROFILE);

    for profile_id in 0..PROFILE_COUNT {
        // One location and date per profile.
        let latitude: f64 = rng.gen_range(-70.0..70.0);
        let longitude = rng.gen_range(-180.0..180.0);
        let date = now - Duration::days(rng.gen_range(0..DATE_SPREAD_DAYS));

        // Warm at the surface, decaying exponentially with depth.
        let surface_temperature = 15.0 + 10.0 * latitude.to_radians().cos();
        let surface_salinity = sample_normal(&mut rng, 35.0, 1.0);

        for step in 0..SAMPLES_PER_PROFILE {
            let depth_m =
                MAX_PROFILE_DEPTH_M * step as f64 / (SAMPLES_PER_PROFILE as f64 - 1.0);
            let temperature_c = surface_temperature * (-depth_m / 1000.0).exp()
                + sample_normal(&mut rng, 0.0, 0.5);
            let salinity_psu =
                surface_salinity + 0.5 * (depth_m / 1000.0) + sample_normal(&mut rng, 0.0, 0.1);

            records.push(Measurement {
                profile_id: profile_id as i64,
                latitude,
                longitude,
                date,
                depth_m,
                temperature_c,
                salinity_psu,
                pressure_dbar: depth_m * PRESSURE_PER_METER,
            });
        }
    }

    Dataset::new(records)
}

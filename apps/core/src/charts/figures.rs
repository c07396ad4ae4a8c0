//! Plotly figure builders. Each builder turns dataset records into the
//! `data` and `layout` JSON that `Plotly.newPlot` expects.

use crate::brain::intent::Variable;
use crate::data::measurement::{Dataset, LatZone, Measurement};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Trace data and layout for one plot.
pub(crate) struct Figure {
    pub(crate) data: Vec<Value>,
    pub(crate) layout: Value,
}

/// Profiles drawn in a depth profile plot.
const MAX_PROFILE_TRACES: usize = 10;
/// Point caps for the dense scatter plots.
const MAX_TS_POINTS: usize = 5000;
const MAX_MAP_POINTS: usize = 1000;
const MAX_3D_POINTS: usize = 2000;

/// Surface cutoff for the geographic map.
const SURFACE_DEPTH_M: f64 = 50.0;

fn variable_value(m: &Measurement, variable: Variable) -> f64 {
    match variable {
        Variable::Temperature => m.temperature_c,
        Variable::Salinity => m.salinity_psu,
    }
}

/// Axis label derived from the column name, e.g. "Temperature C".
pub(crate) fn variable_title(variable: Variable) -> String {
    variable
        .column_name()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evenly strided subset of at most `max` records, keeping record order.
fn sample_stride(records: &[Measurement], max: usize) -> Vec<&Measurement> {
    if records.len() <= max {
        return records.iter().collect();
    }
    let step = records.len() as f64 / max as f64;
    (0..max)
        .map(|i| &records[(i as f64 * step) as usize])
        .collect()
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// One line-and-marker trace per profile, depth drawn downward. Limited to
/// the first profiles by id for readability.
pub(crate) fn temperature_depth_profile(dataset: &Dataset, title: &str) -> Figure {
    let mut profiles: BTreeMap<i64, Vec<&Measurement>> = BTreeMap::new();
    for m in dataset.iter() {
        profiles.entry(m.profile_id).or_default().push(m);
    }

    let data = profiles
        .iter()
        .take(MAX_PROFILE_TRACES)
        .map(|(profile_id, records)| {
            json!({
                "type": "scatter",
                "x": records.iter().map(|m| m.temperature_c).collect::<Vec<_>>(),
                "y": records.iter().map(|m| -m.depth_m).collect::<Vec<_>>(),
                "mode": "lines+markers",
                "name": format!("Profile {}", profile_id),
                "line": {"width": 2},
                "marker": {"size": 4}
            })
        })
        .collect();

    let layout = json!({
        "title": title,
        "xaxis": {"title": "Temperature (°C)"},
        "yaxis": {"title": "Depth (m)"},
        "height": 600,
        "showlegend": true,
        "hovermode": "closest"
    });

    Figure { data, layout }
}

/// T-S diagram: salinity against temperature, colored by depth.
pub(crate) fn ts_diagram(dataset: &Dataset, title: &str) -> Figure {
    let sample = sample_stride(dataset.records(), MAX_TS_POINTS);

    let data = vec![json!({
        "type": "scatter",
        "x": sample.iter().map(|m| m.salinity_psu).collect::<Vec<_>>(),
        "y": sample.iter().map(|m| m.temperature_c).collect::<Vec<_>>(),
        "mode": "markers",
        "marker": {
            "color": sample.iter().map(|m| m.depth_m).collect::<Vec<_>>(),
            "colorscale": "Viridis",
            "showscale": true,
            "colorbar": {"title": "Depth (m)"}
        }
    })];

    let layout = json!({
        "title": title,
        "xaxis": {"title": "Salinity (PSU)"},
        "yaxis": {"title": "Temperature (°C)"},
        "height": 600
    });

    Figure { data, layout }
}

/// Surface measurements (one per profile) on an open-street-map layer.
pub(crate) fn geographic_map(dataset: &Dataset, variable: Variable, title: &str) -> Figure {
    let mut surface: BTreeMap<i64, &Measurement> = BTreeMap::new();
    for m in dataset.iter() {
        if m.depth_m < SURFACE_DEPTH_M {
            surface.entry(m.profile_id).or_insert(m);
        }
    }
    let surface: Vec<Measurement> = surface.values().map(|m| (*m).clone()).collect();
    let sample = sample_stride(&surface, MAX_MAP_POINTS);

    let data = vec![json!({
        "type": "scattermapbox",
        "lat": sample.iter().map(|m| m.latitude).collect::<Vec<_>>(),
        "lon": sample.iter().map(|m| m.longitude).collect::<Vec<_>>(),
        "mode": "markers",
        "marker": {
            "color": sample.iter().map(|m| variable_value(m, variable)).collect::<Vec<_>>(),
            "colorscale": "Viridis",
            "showscale": true,
            "colorbar": {"title": variable_title(variable)}
        }
    })];

    let layout = json!({
        "title": title,
        "mapbox": {"style": "open-street-map", "zoom": 1},
        "height": 600
    });

    Figure { data, layout }
}

/// Daily averages of the variable over the covered date range.
pub(crate) fn time_series(dataset: &Dataset, variable: Variable, title: &str) -> Figure {
    let mut daily: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for m in dataset.iter() {
        let day = m.date.format("%Y-%m-%d").to_string();
        let entry = daily.entry(day).or_insert((0.0, 0));
        entry.0 += variable_value(m, variable);
        entry.1 += 1;
    }

    let dates: Vec<&String> = daily.keys().collect();
    let means: Vec<f64> = daily.values().map(|(sum, n)| sum / *n as f64).collect();

    let data = vec![json!({
        "type": "scatter",
        "x": dates,
        "y": means,
        "mode": "lines"
    })];

    let layout = json!({
        "title": title,
        "xaxis": {"title": "Date"},
        "yaxis": {"title": variable_title(variable)},
        "height": 600
    });

    Figure { data, layout }
}

/// Histogram of measurement depths.
pub(crate) fn depth_distribution(dataset: &Dataset, title: &str) -> Figure {
    let data = vec![json!({
        "type": "histogram",
        "x": dataset.iter().map(|m| m.depth_m).collect::<Vec<_>>(),
        "nbinsx": 50
    })];

    let layout = json!({
        "title": title,
        "xaxis": {"title": "Depth (m)"},
        "yaxis": {"title": "Number of Measurements"},
        "height": 600
    });

    Figure { data, layout }
}

/// Box plot of the variable per latitude zone.
pub(crate) fn regional_comparison(dataset: &Dataset, variable: Variable, title: &str) -> Figure {
    let mut zones = Vec::new();
    let mut values = Vec::new();
    for m in dataset.iter() {
        if let Some(zone) = m.lat_zone() {
            zones.push(zone.label());
            values.push(variable_value(m, variable));
        }
    }

    let data = vec![json!({
        "type": "box",
        "x": zones,
        "y": values
    })];

    let layout = json!({
        "title": title,
        "xaxis": {
            "title": "Latitude Zone",
            "categoryorder": "array",
            "categoryarray": LatZone::ORDERED.iter().map(|z| z.label()).collect::<Vec<_>>()
        },
        "yaxis": {"title": variable_title(variable)},
        "height": 600
    });

    Figure { data, layout }
}

const CORRELATION_COLUMNS: [&str; 6] = [
    "temperature_c",
    "salinity_psu",
    "depth_m",
    "pressure_dbar",
    "latitude",
    "longitude",
];

fn numeric_column(dataset: &Dataset, name: &str) -> Vec<f64> {
    dataset
        .iter()
        .map(|m| match name {
            "temperature_c" => m.temperature_c,
            "salinity_psu" => m.salinity_psu,
            "depth_m" => m.depth_m,
            "pressure_dbar" => m.pressure_dbar,
            "latitude" => m.latitude,
            _ => m.longitude,
        })
        .collect()
}

/// Pearson correlation heatmap over the numeric columns.
pub(crate) fn correlation_heatmap(dataset: &Dataset, title: &str) -> Figure {
    let columns: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|name| numeric_column(dataset, name))
        .collect();

    let matrix: Vec<Vec<f64>> = columns
        .iter()
        .map(|row| columns.iter().map(|col| pearson(row, col)).collect())
        .collect();

    let data = vec![json!({
        "type": "heatmap",
        "z": matrix,
        "x": CORRELATION_COLUMNS,
        "y": CORRELATION_COLUMNS,
        "colorscale": "RdBu",
        "reversescale": true
    })];

    let layout = json!({
        "title": title,
        "height": 600
    });

    Figure { data, layout }
}

/// 3D scatter of temperature, salinity, and depth.
pub(crate) fn three_d_scatter(dataset: &Dataset, title: &str) -> Figure {
    let sample = sample_stride(dataset.records(), MAX_3D_POINTS);

    let data = vec![json!({
        "type": "scatter3d",
        "x": sample.iter().map(|m| m.temperature_c).collect::<Vec<_>>(),
        "y": sample.iter().map(|m| m.salinity_psu).collect::<Vec<_>>(),
        "z": sample.iter().map(|m| m.depth_m).collect::<Vec<_>>(),
        "mode": "markers",
        "marker": {
            "size": 3,
            "color": sample.iter().map(|m| m.temperature_c).collect::<Vec<_>>(),
            "colorscale": "Viridis",
            "showscale": true,
            "colorbar": {"title": "Temperature (°C)"}
        },
        "text": sample
            .iter()
            .map(|m| format!("Lat: {:.2}, Lon: {:.2}", m.latitude, m.longitude))
            .collect::<Vec<_>>(),
        "hovertemplate": "<b>Temperature:</b> %{x:.2f}°C<br><b>Salinity:</b> %{y:.2f} PSU<br><b>Depth:</b> %{z:.0f}m<br>%{text}<extra></extra>"
    })];

    let layout = json!({
        "title": title,
        "scene": {
            "xaxis": {"title": "Temperature (°C)"},
            "yaxis": {"title": "Salinity (PSU)"},
            "zaxis": {"title": "Depth (m)"}
        },
        "height": 700
    });

    Figure { data, layout }
}

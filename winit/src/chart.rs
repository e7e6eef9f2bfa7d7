//! Geometry for the history chart.
//!
//! Slint's `Path` element renders SVG-style command strings; this module turns
//! the rolling window of readings into one command string per metric series.
//! All four series share a single y-axis, so the scale is the global min/max
//! across all metrics.

use std::fmt::Write;

use hive_monitor_common::SensorReading;

/// Side length of the square viewbox the `.slint` chart paths are drawn in.
pub const VIEWBOX_SIZE: f64 = 100.0;

/// Path commands for each metric series plus the shared y-axis bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPaths {
    pub temperature: String,
    pub humidity: String,
    pub soil_moisture: String,
    pub co2: String,
    pub axis_min: f64,
    pub axis_max: f64,
}

/// Computes the chart paths for the given window of readings, oldest first.
pub fn chart_paths(readings: &[SensorReading]) -> ChartPaths {
    let temperature: Vec<f64> = readings.iter().map(|r| r.temperature_celsius).collect();
    let humidity: Vec<f64> = readings.iter().map(|r| r.humidity_percent).collect();
    let soil_moisture: Vec<f64> = readings.iter().map(|r| r.soil_moisture_percent).collect();
    let co2: Vec<f64> = readings.iter().map(|r| f64::from(r.co2_ppm)).collect();

    let mut axis_min = f64::INFINITY;
    let mut axis_max = f64::NEG_INFINITY;
    for series in [&temperature, &humidity, &soil_moisture, &co2] {
        for &value in series {
            axis_min = axis_min.min(value);
            axis_max = axis_max.max(value);
        }
    }
    if !axis_min.is_finite() {
        axis_min = 0.0;
        axis_max = 1.0;
    }

    ChartPaths {
        temperature: series_commands(&temperature, axis_min, axis_max),
        humidity: series_commands(&humidity, axis_min, axis_max),
        soil_moisture: series_commands(&soil_moisture, axis_min, axis_max),
        co2: series_commands(&co2, axis_min, axis_max),
        axis_min,
        axis_max,
    }
}

/// Polyline commands for one series, spread evenly across the viewbox with
/// the y-axis inverted so larger values are drawn higher.
fn series_commands(values: &[f64], min: f64, max: f64) -> String {
    if values.len() < 2 {
        // A single point draws nothing.
        return String::new();
    }

    let span = if (max - min) > f64::EPSILON { max - min } else { 1.0 };
    let step = VIEWBOX_SIZE / (values.len() - 1) as f64;

    let mut commands = String::new();
    for (index, value) in values.iter().enumerate() {
        let x = index as f64 * step;
        let y = VIEWBOX_SIZE - (value - min) / span * VIEWBOX_SIZE;
        let verb = if index == 0 { 'M' } else { 'L' };
        write!(commands, "{verb} {x:.2} {y:.2} ").unwrap();
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn reading(temperature: f64, humidity: f64, soil: f64, co2: i32) -> SensorReading {
        SensorReading {
            temperature_celsius: temperature,
            humidity_percent: humidity,
            soil_moisture_percent: soil,
            co2_ppm: co2,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn empty_window_draws_nothing() {
        let paths = chart_paths(&[]);

        assert!(paths.temperature.is_empty());
        assert!(paths.co2.is_empty());
        assert_eq!(paths.axis_min, 0.0);
        assert_eq!(paths.axis_max, 1.0);
    }

    #[test]
    fn single_point_draws_nothing() {
        let paths = chart_paths(&[reading(25.0, 60.0, 50.0, 400)]);

        assert!(paths.temperature.is_empty());
        assert!(paths.humidity.is_empty());
    }

    #[test]
    fn axis_spans_all_series() {
        let paths = chart_paths(&[
            reading(21.5, 55.0, 45.0, 320),
            reading(30.0, 70.0, 60.0, 480),
        ]);

        assert_eq!(paths.axis_min, 21.5);
        assert_eq!(paths.axis_max, 480.0);
    }

    #[test]
    fn two_points_span_the_viewbox() {
        let paths = chart_paths(&[
            reading(20.0, 50.0, 40.0, 300),
            reading(20.0, 50.0, 40.0, 500),
        ]);

        // CO2 goes from the axis minimum way up; it owns both extremes here.
        assert_eq!(paths.co2, "M 0.00 41.67 L 100.00 0.00 ");
        // Temperature sits flat on the axis minimum, i.e. the bottom edge.
        assert_eq!(paths.temperature, "M 0.00 100.00 L 100.00 100.00 ");
    }

    #[test]
    fn flat_window_does_not_divide_by_zero() {
        let flat = vec![reading(25.0, 25.0, 25.0, 25); 24];
        let paths = chart_paths(&flat);

        assert_eq!(paths.axis_min, paths.axis_max);
        assert!(paths.temperature.starts_with("M 0.00 100.00"));
        assert!(!paths.temperature.contains("NaN"));
    }
}

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// One snapshot of the four simulated hive metrics.
///
/// The float metrics carry one decimal place, CO2 is a whole ppm value.
/// Metrics are sampled independently of each other.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReading {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub soil_moisture_percent: f64,
    pub co2_ppm: i32,
    pub timestamp: DateTime<Local>,
}

impl SensorReading {
    /// Hour:minute label shown on the chart axis and in the record rows.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Inclusive sampling bounds for one metric.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

/// Per-metric sampling bounds for the mock controller.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SensorRanges {
    pub temperature_celsius: MetricRange,
    pub humidity_percent: MetricRange,
    pub soil_moisture_percent: MetricRange,
    pub co2_ppm: MetricRange,
}

pub type SensorControllerPointer = Box<dyn SensorController + Send>;

pub type SensorControllerSharedPointer = Arc<Mutex<SensorControllerPointer>>;

/// The sensor controller trait that provides the current hive readings.
pub trait SensorController {
    /// Fetches the current sensor data, stamped with the current local time.
    fn current_data(&mut self) -> Result<SensorReading, Box<dyn std::error::Error>>;
}

/// A controller that synthesizes readings from a random source.
///
/// The sampling bounds are loaded from an embedded JSON document, so the
/// simulated ranges live next to the code without being baked into it.
pub struct MockSensorController {
    ranges: SensorRanges,
    rng: StdRng,
}

impl MockSensorController {
    pub fn new() -> Result<Self, serde_json::Error> {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A controller with a deterministic random source, for tests.
    pub fn with_seed(seed: u64) -> Result<Self, serde_json::Error> {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Result<Self, serde_json::Error> {
        let json_data = std::include_str!("./mockranges.json");
        let ranges = serde_json::from_str::<SensorRanges>(json_data)?;
        log::debug!("mock sensor ranges: {:?}", ranges);

        Ok(Self { ranges, rng })
    }

    pub fn ranges(&self) -> &SensorRanges {
        &self.ranges
    }

    fn sample_rounded(&mut self, range: MetricRange) -> f64 {
        let value = self.rng.gen_range(range.min..=range.max);
        (value * 10.0).round() / 10.0
    }
}

impl SensorController for MockSensorController {
    fn current_data(&mut self) -> Result<SensorReading, Box<dyn std::error::Error>> {
        let co2_range = self.ranges.co2_ppm;

        Ok(SensorReading {
            temperature_celsius: self.sample_rounded(self.ranges.temperature_celsius),
            humidity_percent: self.sample_rounded(self.ranges.humidity_percent),
            soil_moisture_percent: self.sample_rounded(self.ranges.soil_moisture_percent),
            co2_ppm: self.rng.gen_range(co2_range.min as i32..=co2_range.max as i32),
            timestamp: Local::now(),
        })
    }
}

#[cfg(test)]
fn assert_one_decimal(value: f64) {
    let scaled = value * 10.0;
    assert!(
        (scaled - scaled.round()).abs() < 1e-9,
        "{value} has more than one decimal place"
    );
}

#[test]
fn test_mock_controller_ranges() {
    let controller = MockSensorController::with_seed(42).unwrap();
    let ranges = *controller.ranges();

    assert_eq!(ranges.temperature_celsius, MetricRange { min: 20.0, max: 35.0 });
    assert_eq!(ranges.humidity_percent, MetricRange { min: 50.0, max: 80.0 });
    assert_eq!(ranges.soil_moisture_percent, MetricRange { min: 40.0, max: 80.0 });
    assert_eq!(ranges.co2_ppm, MetricRange { min: 300.0, max: 500.0 });
}

#[test]
fn test_samples_stay_within_ranges() {
    let mut controller = MockSensorController::with_seed(7).unwrap();

    for _ in 0..10_000 {
        let reading = controller.current_data().unwrap();

        assert!((20.0..=35.0).contains(&reading.temperature_celsius));
        assert!((50.0..=80.0).contains(&reading.humidity_percent));
        assert!((40.0..=80.0).contains(&reading.soil_moisture_percent));
        assert!((300..=500).contains(&reading.co2_ppm));

        assert_one_decimal(reading.temperature_celsius);
        assert_one_decimal(reading.humidity_percent);
        assert_one_decimal(reading.soil_moisture_percent);
    }
}

#[test]
fn test_time_label_is_hour_minute() {
    let mut controller = MockSensorController::with_seed(1).unwrap();
    let reading = controller.current_data().unwrap();
    let label = reading.time_label();

    assert_eq!(label.len(), 5);
    assert_eq!(label.as_bytes()[2], b':');
}

use chrono::{Duration, Local};

use crate::sensor::{SensorController, SensorReading};

/// Number of readings kept for the chart, one synthetic hour apart when seeded.
pub const HISTORY_LEN: usize = 24;

/// Fixed-length rolling window of the most recent readings, oldest first.
///
/// Owned single-threaded state; the caller replaces the derived view state
/// (chart paths, record rows) after each [`History::advance`].
#[derive(Clone, Debug, Default)]
pub struct History {
    readings: Vec<SensorReading>,
}

impl History {
    /// Seeds the window with `count` fresh readings whose timestamps are
    /// backdated one hour apart, the newest one stamped now.
    pub fn seed(
        controller: &mut dyn SensorController,
        count: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let now = Local::now();
        let mut readings = Vec::with_capacity(count);

        for slot in 0..count {
            let hours_back = (count - 1 - slot) as i64;
            let mut reading = controller.current_data()?;
            reading.timestamp = now - Duration::hours(hours_back);
            readings.push(reading);
        }

        Ok(Self { readings })
    }

    /// Drops the oldest reading and appends `reading`, keeping the length fixed.
    pub fn advance(&mut self, reading: SensorReading) {
        if !self.readings.is_empty() {
            self.readings.remove(0);
        }
        self.readings.push(reading);
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::MockSensorController;

    fn reading_at(co2_ppm: i32) -> SensorReading {
        SensorReading {
            temperature_celsius: 25.0,
            humidity_percent: 60.0,
            soil_moisture_percent: 50.0,
            co2_ppm,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn seed_produces_full_window() {
        let mut controller = MockSensorController::with_seed(3).unwrap();
        let history = History::seed(&mut controller, HISTORY_LEN).unwrap();

        assert_eq!(history.len(), HISTORY_LEN);
    }

    #[test]
    fn seed_timestamps_ascend_one_hour_apart() {
        let mut controller = MockSensorController::with_seed(3).unwrap();
        let history = History::seed(&mut controller, 3).unwrap();
        let readings = history.readings();

        assert_eq!(readings.len(), 3);
        for pair in readings.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }

        let age = Local::now() - readings[2].timestamp;
        assert!(age < Duration::seconds(5));
    }

    #[test]
    fn advance_evicts_oldest_and_appends() {
        let mut history = History {
            readings: vec![reading_at(301), reading_at(302), reading_at(303)],
        };

        history.advance(reading_at(304));

        let co2: Vec<i32> = history.readings().iter().map(|r| r.co2_ppm).collect();
        assert_eq!(co2, vec![302, 303, 304]);
    }

    #[test]
    fn advance_keeps_length_fixed() {
        let mut controller = MockSensorController::with_seed(9).unwrap();
        let mut history = History::seed(&mut controller, HISTORY_LEN).unwrap();

        for _ in 0..50 {
            history.advance(controller.current_data().unwrap());
            assert_eq!(history.len(), HISTORY_LEN);
        }
    }

    #[test]
    fn advance_on_empty_just_appends() {
        let mut history = History::default();
        assert!(history.is_empty());

        history.advance(reading_at(400));

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().co2_ppm, 400);
    }
}

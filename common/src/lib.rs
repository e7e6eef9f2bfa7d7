pub mod history;
pub mod sensor;

pub use history::{History, HISTORY_LEN};
pub use sensor::{
    MockSensorController, SensorController, SensorControllerPointer,
    SensorControllerSharedPointer, SensorReading,
};

pub mod db;
pub mod error;
pub mod model;
pub mod store;

pub use db::{humidity_measurement, humidity_sensor};
pub use error::{Result, StoreError};
pub use model::{LatestReading, Measurement, NewMeasurement, Sensor, SensorThresholds};
pub use store::{DbSensorStore, SensorStore};

mod converter;
mod entity;

pub use entity::{humidity_measurement, humidity_sensor};

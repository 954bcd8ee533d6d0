use super::entity::{humidity_measurement, humidity_sensor};
use crate::model::{Measurement, Sensor, SensorThresholds};
use sea_orm::Set;

impl From<humidity_sensor::Model> for Sensor {
    fn from(model: humidity_sensor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            last_connection: model.last_connection,
            thresholds: SensorThresholds {
                overflow_level: model.overflow_level,
                alert_level: model.alert_level,
                warning_level: model.warning_level,
                critical_level: model.critical_level,
            },
        }
    }
}

impl From<Sensor> for humidity_sensor::ActiveModel {
    fn from(sensor: Sensor) -> Self {
        Self {
            id: Set(sensor.id),
            name: Set(sensor.name),
            last_connection: Set(sensor.last_connection),
            overflow_level: Set(sensor.thresholds.overflow_level),
            alert_level: Set(sensor.thresholds.alert_level),
            warning_level: Set(sensor.thresholds.warning_level),
            critical_level: Set(sensor.thresholds.critical_level),
        }
    }
}

impl From<humidity_measurement::Model> for Measurement {
    fn from(model: humidity_measurement::Model) -> Self {
        Self {
            id: model.id,
            sensor_id: model.sensor_id,
            raw_value: model.raw_value,
            humidity: model.humidity,
            battery_voltage: model.battery_voltage,
            date: model.date,
        }
    }
}

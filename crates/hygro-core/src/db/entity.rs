/// 湿度传感器实体
pub mod humidity_sensor {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "humidity_sensors")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub last_connection: ChronoDateTimeUtc,
        pub overflow_level: i32,
        pub alert_level: i32,
        pub warning_level: i32,
        pub critical_level: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::humidity_measurement::Entity")]
        Measurement,
    }

    impl Related<super::humidity_measurement::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Measurement.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// 湿度测量实体
pub mod humidity_measurement {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "humidity_measurements")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub sensor_id: i32,
        #[sea_orm(column_type = "Double")]
        pub raw_value: f64,
        #[sea_orm(column_type = "Double")]
        pub humidity: f64,
        #[sea_orm(column_type = "Double")]
        pub battery_voltage: f64,
        pub date: ChronoDateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::humidity_sensor::Entity",
            from = "Column::SensorId",
            to = "super::humidity_sensor::Column::Id"
        )]
        Sensor,
    }

    impl Related<super::humidity_sensor::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Sensor.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

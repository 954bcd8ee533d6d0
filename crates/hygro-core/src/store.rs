use crate::db::{humidity_measurement, humidity_sensor};
use crate::model::UNKNOWN_SENSOR_NAME;
use crate::{LatestReading, Measurement, NewMeasurement, Result, Sensor, SensorThresholds, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, JoinType, Order, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Schema, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 传感器数据访问接口
///
/// 监控引擎只读使用；写操作由 HTTP 层调用
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// 分页列出传感器
    async fn list_sensors(&self, skip: u64, limit: u64) -> Result<Vec<Sensor>>;

    /// 列出全部传感器（按最后上报时间升序）
    async fn all_sensors(&self) -> Result<Vec<Sensor>>;

    /// 按 ID 查询传感器
    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>>;

    /// 重命名传感器
    async fn rename_sensor(&self, sensor_id: i32, new_name: &str) -> Result<Sensor>;

    /// 更新传感器阈值（写入前校验顺序）
    async fn update_thresholds(&self, sensor_id: i32, thresholds: SensorThresholds) -> Result<Sensor>;

    /// 记录一条测量，并刷新传感器最后上报时间
    async fn record_measurement(&self, measurement: NewMeasurement) -> Result<Measurement>;

    /// 分页列出某传感器的测量
    async fn list_measurements(&self, sensor_id: i32, skip: u64, limit: u64) -> Result<Vec<Measurement>>;

    /// 列出某时间点之后的全部测量（按时间升序）
    async fn measurements_since(&self, since: DateTime<Utc>) -> Result<Vec<Measurement>>;

    /// 列出最后上报时间早于 `cutoff` 的传感器
    async fn list_sensors_stale_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Sensor>>;

    /// 每个传感器的最新测量
    async fn latest_measurement_per_sensor(&self) -> Result<Vec<LatestReading>>;
}

/// 基于 sea-orm 的传感器存储
pub struct DbSensorStore {
    db: Arc<DatabaseConnection>,
}

impl DbSensorStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 底层数据库连接
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.db.clone()
    }

    /// 创建表结构（已存在则跳过）
    pub async fn create_schema(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut sensors = schema.create_table_from_entity(humidity_sensor::Entity);
        sensors.if_not_exists();
        self.db.execute(backend.build(&sensors)).await?;

        let mut measurements = schema.create_table_from_entity(humidity_measurement::Entity);
        measurements.if_not_exists();
        self.db.execute(backend.build(&measurements)).await?;

        info!("Database schema ready");
        Ok(())
    }

    async fn find_sensor(&self, sensor_id: i32) -> Result<humidity_sensor::Model> {
        humidity_sensor::Entity::find_by_id(sensor_id)
            .one(&*self.db)
            .await?
            .ok_or(StoreError::NotFound(sensor_id))
    }
}

#[async_trait]
impl SensorStore for DbSensorStore {
    async fn list_sensors(&self, skip: u64, limit: u64) -> Result<Vec<Sensor>> {
        let models = humidity_sensor::Entity::find()
            .order_by_asc(humidity_sensor::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(Sensor::from).collect())
    }

    async fn all_sensors(&self) -> Result<Vec<Sensor>> {
        let models = humidity_sensor::Entity::find()
            .order_by_asc(humidity_sensor::Column::LastConnection)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(Sensor::from).collect())
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>> {
        let model = humidity_sensor::Entity::find_by_id(sensor_id)
            .one(&*self.db)
            .await?;

        Ok(model.map(Sensor::from))
    }

    async fn rename_sensor(&self, sensor_id: i32, new_name: &str) -> Result<Sensor> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::validation("Sensor name cannot be empty"));
        }

        let mut active: humidity_sensor::ActiveModel = self.find_sensor(sensor_id).await?.into();
        active.name = Set(new_name.to_string());
        let model = active.update(&*self.db).await?;

        info!(sensor_id = %sensor_id, new_name = %new_name, "Sensor renamed");
        Ok(Sensor::from(model))
    }

    async fn update_thresholds(&self, sensor_id: i32, thresholds: SensorThresholds) -> Result<Sensor> {
        thresholds.validate()?;

        let mut active: humidity_sensor::ActiveModel = self.find_sensor(sensor_id).await?.into();
        active.overflow_level = Set(thresholds.overflow_level);
        active.alert_level = Set(thresholds.alert_level);
        active.warning_level = Set(thresholds.warning_level);
        active.critical_level = Set(thresholds.critical_level);
        let model = active.update(&*self.db).await?;

        info!(sensor_id = %sensor_id, thresholds = ?thresholds, "Sensor thresholds updated");
        Ok(Sensor::from(model))
    }

    async fn record_measurement(&self, measurement: NewMeasurement) -> Result<Measurement> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        // 未知传感器首次上报时自动登记
        let existing = humidity_sensor::Entity::find_by_id(measurement.sensor_id)
            .one(&txn)
            .await?;

        match existing {
            Some(model) => {
                let mut active: humidity_sensor::ActiveModel = model.into();
                active.last_connection = Set(now);
                active.update(&txn).await?;
            }
            None => {
                let sensor = Sensor::new(measurement.sensor_id, UNKNOWN_SENSOR_NAME)
                    .with_last_connection(now);
                let active: humidity_sensor::ActiveModel = sensor.into();
                active.insert(&txn).await?;
                info!(sensor_id = %measurement.sensor_id, "Registered unknown sensor on first measurement");
            }
        }

        let active = humidity_measurement::ActiveModel {
            sensor_id: Set(measurement.sensor_id),
            raw_value: Set(measurement.raw_value),
            humidity: Set(measurement.humidity),
            battery_voltage: Set(measurement.battery_voltage),
            date: Set(now),
            ..Default::default()
        };
        let model = active.insert(&txn).await?;
        txn.commit().await?;

        debug!(
            sensor_id = %model.sensor_id,
            humidity = %model.humidity,
            "Measurement recorded"
        );
        Ok(Measurement::from(model))
    }

    async fn list_measurements(&self, sensor_id: i32, skip: u64, limit: u64) -> Result<Vec<Measurement>> {
        let models = humidity_measurement::Entity::find()
            .filter(humidity_measurement::Column::SensorId.eq(sensor_id))
            .order_by_asc(humidity_measurement::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(Measurement::from).collect())
    }

    async fn measurements_since(&self, since: DateTime<Utc>) -> Result<Vec<Measurement>> {
        let models = humidity_measurement::Entity::find()
            .filter(humidity_measurement::Column::Date.gte(since))
            .order_by_asc(humidity_measurement::Column::Date)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(Measurement::from).collect())
    }

    async fn list_sensors_stale_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Sensor>> {
        let models = humidity_sensor::Entity::find()
            .filter(humidity_sensor::Column::LastConnection.lt(cutoff))
            .order_by_asc(humidity_sensor::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(Sensor::from).collect())
    }

    async fn latest_measurement_per_sensor(&self) -> Result<Vec<LatestReading>> {
        let backend = self.db.get_database_backend();
        let stmt = backend.build(&latest_reading_query());
        let rows = LatestRow::find_by_statement(stmt).all(&*self.db).await?;

        Ok(rows.into_iter().map(LatestReading::from).collect())
    }
}

/// 最新读数查询的一行
#[derive(Debug, FromQueryResult)]
struct LatestRow {
    sensor_id: i32,
    sensor_name: String,
    humidity: Option<f64>,
    date: Option<DateTime<Utc>>,
}

impl From<LatestRow> for LatestReading {
    fn from(row: LatestRow) -> Self {
        Self {
            sensor_id: row.sensor_id,
            sensor_name: row.sensor_name,
            humidity: row.humidity,
            timestamp: row.date,
        }
    }
}

/// 每个传感器的最新测量，单条语句完成：
///
/// ```sql
/// SELECT s.id, s.name, m.humidity, m.date
/// FROM humidity_sensors s
/// LEFT JOIN (SELECT sensor_id, MAX(id) AS latest_id FROM humidity_measurements GROUP BY sensor_id) latest
///   ON latest.sensor_id = s.id
/// LEFT JOIN humidity_measurements m ON m.id = latest.latest_id
/// ORDER BY s.id
/// ```
fn latest_reading_query() -> SelectStatement {
    let latest = Alias::new("latest");
    let latest_id = Alias::new("latest_id");

    let mut grouped = Query::select();
    grouped
        .column(humidity_measurement::Column::SensorId)
        .expr_as(
            Func::max(Expr::col(humidity_measurement::Column::Id)),
            latest_id.clone(),
        )
        .from(humidity_measurement::Entity)
        .group_by_col(humidity_measurement::Column::SensorId);

    let mut query = Query::select();
    query
        .expr_as(
            Expr::col((humidity_sensor::Entity, humidity_sensor::Column::Id)),
            Alias::new("sensor_id"),
        )
        .expr_as(
            Expr::col((humidity_sensor::Entity, humidity_sensor::Column::Name)),
            Alias::new("sensor_name"),
        )
        .column((humidity_measurement::Entity, humidity_measurement::Column::Humidity))
        .column((humidity_measurement::Entity, humidity_measurement::Column::Date))
        .from(humidity_sensor::Entity)
        .join_subquery(
            JoinType::LeftJoin,
            grouped,
            latest.clone(),
            Expr::col((latest.clone(), humidity_measurement::Column::SensorId))
                .equals((humidity_sensor::Entity, humidity_sensor::Column::Id)),
        )
        .join(
            JoinType::LeftJoin,
            humidity_measurement::Entity,
            Expr::col((humidity_measurement::Entity, humidity_measurement::Column::Id))
                .equals((latest, latest_id)),
        )
        .order_by(
            (humidity_sensor::Entity, humidity_sensor::Column::Id),
            Order::Asc,
        );

    query
}

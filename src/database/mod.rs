pub mod models;
pub mod postgres;
pub mod store;

pub use models::{Connection, DailyMetric};
pub use postgres::PgStore;
pub use store::{ConnectionStore, MetricsSource, StoreError};

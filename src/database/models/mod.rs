pub mod connection;
pub mod metric;

pub use connection::Connection;
pub use metric::DailyMetric;

pub mod chart;
pub mod errors;
pub mod logger;
pub mod model;
pub mod query;
pub mod reader;
pub mod series;

pub use chart::{ChartView, HostProcessesChart};
pub use model::{ChartPoint, ChartSeries, MetricsDocument, RawSeries};
pub use series::{transform_slice, transform_to_series};

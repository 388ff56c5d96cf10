pub mod api;
pub mod config;
pub mod enricher;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod models;
pub mod payload;
pub mod publisher;
pub mod report;
pub mod sampler;
pub mod schedule;
pub mod selector;

pub use api::{MyFlyClient, RouteApi};
pub use error::{ApiError, PublishError, RouteError};
pub use report::ReportGenerator;

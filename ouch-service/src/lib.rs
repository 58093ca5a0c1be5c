pub mod config;
pub mod http;
pub mod metrics_server;
pub mod observability;
pub mod recorder;
pub mod validation;
pub mod weather;

pub use config::AppConfig;
pub use recorder::{OwieRecorder, RecordError};

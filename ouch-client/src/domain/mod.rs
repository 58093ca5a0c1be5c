pub mod owie_log;
pub mod weather;

pub use owie_log::{NewOwieLog, OwieLog};
pub use weather::WeatherSnapshot;

use time::OffsetDateTime;

/// Current conditions at the configured location, captured when an owie is logged.
///
/// Units follow the upstream request: temperature in °F, pressure in hPa,
/// humidity in percent, precipitation in mm over the last hour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeatherSnapshot {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub observed_at: OffsetDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub uv_index: f64,
    pub precipitation: f64,
    pub condition_id: i64,
    pub condition: String,
    pub description: String,
}

//! Normalized forecast records returned to clients.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// One day of forecast for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DayForecast {
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Local calendar date, `dd-mm-yyyy`
    pub date: String,
}

/// A matched Mexican city together with its daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct CityForecast {
    pub id: i64,
    pub slug: String,
    pub state: String,
    pub lat: f64,
    pub long: f64,
    /// Daily entries in the order the weather provider returned them
    pub weather: Vec<DayForecast>,
}

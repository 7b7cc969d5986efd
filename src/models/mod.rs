//! Data models and schemas for the forecast API.
//!
//! Response bodies for every endpoint, including the normalized city
//! forecast records returned by `GET /weather/{city}`.

pub mod api;
pub mod forecast;

pub use api::*;
pub use forecast::*;

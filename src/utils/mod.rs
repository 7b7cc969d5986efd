//! Utility functions used by the middleware: client identification and
//! route pattern extraction.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;

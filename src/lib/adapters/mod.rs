pub mod error;
pub mod http;

pub use error::*;
pub use http::*;

pub mod api;
#[cfg(feature = "client")]
pub mod client;
pub mod controller;
pub mod view;

pub use api::*;
#[cfg(feature = "client")]
pub use client::TodoClient;
pub use controller::*;
pub use view::render;

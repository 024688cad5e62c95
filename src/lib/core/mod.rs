pub mod error;
pub mod todo;

pub use error::*;
pub use todo::*;

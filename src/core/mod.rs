pub mod error;
pub mod money;

pub use error::{AppError, Result};
pub use money::{from_minor_units, to_minor_units};

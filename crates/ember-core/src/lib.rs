pub mod constants;
pub mod error;
pub mod tax;
pub mod types;

pub use constants::*;
pub use error::EmberError;
pub use tax::*;
pub use types::*;

pub mod config;
pub mod lock;
pub mod token;

pub use config::TokenConfig;
pub use lock::LockSchedule;
pub use token::Token;

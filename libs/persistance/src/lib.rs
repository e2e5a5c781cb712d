pub mod config;
pub mod corpus;
pub mod utils;

pub use self::config::*;
pub use self::corpus::*;
pub use self::utils::*;

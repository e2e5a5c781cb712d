pub mod keywords;
pub mod normalizer;

pub use self::keywords::*;
pub use self::normalizer::*;

pub mod classifier;
pub mod counter;
pub mod groups;
pub mod pipeline;
pub mod report;
pub mod score;

#[cfg(test)]
pub(crate) mod testing;

pub use self::classifier::*;
pub use self::counter::*;
pub use self::groups::*;
pub use self::pipeline::*;
pub use self::report::*;
pub use self::score::*;

mod category;
mod classifier;
mod distribution;

pub use category::{Category, Side};
pub use classifier::{PercentileMap, PercentileResult, classify_player};
pub use distribution::{Distribution, DistributionSet, is_eligible};

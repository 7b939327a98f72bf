mod collection;
pub mod models;
mod slice;

pub use collection::GameCollection;
pub use models::*;
pub use slice::DatasetSlice;

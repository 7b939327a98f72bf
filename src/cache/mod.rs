pub mod incremental;
pub mod snapshot;
mod structs;

pub use incremental::{AggregationMode, AggregationOutcome, CacheDiff, aggregate_with_cache, diff, rebuild, update};
pub use snapshot::{CacheSnapshot, SCHEMA_VERSION, fingerprint, load_snapshot, stage_snapshot};
pub use structs::{Cache, StagedWrites, read_json, write_json_atomic};

//! Plant catalog: records, dataset loading and the snapshot-swapping store

pub mod loader;
pub mod record;
pub mod store;

pub use loader::{find_newest_dataset, load_dataset, parse_dataset, DatasetError};
pub use record::{PlantRecord, RecordTable};
pub use store::{RecordStore, TableSnapshot};

pub mod key;
pub mod record;
pub mod snapshot;

pub use key::KeySelector;
pub use record::{Key, Record, Update};
pub use snapshot::Snapshot;

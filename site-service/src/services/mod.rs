pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoStore;
pub use memory::MemoryStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::{DocumentStore, StoreError, StoreStatus, UnavailableStore};

//! File storage adapters: the race ledger and the learning catalogue.

mod learning_store;
mod persistence;

pub use learning_store::FileLearningStore;
pub use persistence::FilePersistenceSink;

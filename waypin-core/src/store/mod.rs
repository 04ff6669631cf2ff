//! Persisted-store collaborator: the contract the pipeline consumes, plus an
//! in-memory reference adapter used by tests and demos.

mod memory;
mod ports;

pub use memory::MemoryStore;
pub use ports::{
    ChangeEvent, PersistentStore, PhotoRepository, PinRepository,
};

// Adapters layer: concrete implementations for external systems (catalog, storage, http, randomness).

pub mod catalog;
pub mod noise;
pub mod partner;
pub mod storage;

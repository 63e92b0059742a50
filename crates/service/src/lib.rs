//! Service layer: the beer store contract and its two implementations.
//! - `storage` holds the generic key-unique map stores (memory and JSON file).
//! - `memory` and `file` adapt them to `BeerStore`.
//! - `store` defines the trait and picks an implementation from config.

pub mod errors;
pub mod storage;
pub mod store;
pub mod memory;
pub mod file;
#[cfg(test)]
pub mod test_support;

pub use store::{open_store, BeerStore, Upserted};

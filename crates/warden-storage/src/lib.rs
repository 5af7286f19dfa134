//! Warden persistence adapters.
//!
//! This crate defines the storage contract consumed by the write path:
//! - the [`Adapter`] trait, one persistence operation per model mutation
//! - [`AdapterCapabilities`], a typed table of the optional batch
//!   operations an adapter implements, resolved once at registration
//! - [`MemoryAdapter`], a deterministic in-memory reference adapter
//!
//! Design stance:
//! - an adapter reports ordinary failure by returning `Ok(false)`; an
//!   `Err` is an underlying fault and is passed through to the caller
//!   unmodified by the layers above
//! - optional capabilities are declared up front, never probed per call

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod memory;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryAdapter;
pub use traits::{Adapter, AdapterCapabilities};

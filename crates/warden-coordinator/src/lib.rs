//! Warden write path.
//!
//! The [`MutationCoordinator`] governs how every rule-level mutation
//! propagates across three collaborators: the in-memory policy model, an
//! optional persistent storage adapter, and an optional distributed
//! change-notification watcher. Each of the eight write operations runs
//! a fixed three-stage pipeline (mutate the model, conditionally
//! persist, conditionally notify) and collapses the outcome into one
//! result value.
//!
//! There is no compensation between stages: a persistence failure after
//! the model has mutated surfaces as an ordinary `false` result while
//! the model runs ahead of durable storage. Recovery is the caller's
//! responsibility.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod coordinator;
mod error;

pub use coordinator::{CoordinatorBuilder, MutationCoordinator};
pub use error::{CoordinatorError, CoordinatorResult};

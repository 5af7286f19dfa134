//! Warden policy model.
//!
//! Canonical in-memory storage for authorization rules:
//! - a [`Rule`] is one policy line, an ordered sequence of string fields
//! - a [`RuleSet`] is an ordered set of unique rules
//! - a [`PolicyModel`] holds rule sets keyed by section and policy type
//!
//! The model applies mutation primitives and reports success per call.
//! No-op outcomes (duplicate add, absent removal target) are ordinary
//! `false` results, not errors. The model is not internally synchronized;
//! shared access is the caller's concern.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod model;
mod rule;

pub use model::{PolicyModel, RuleSet};
pub use rule::Rule;

//! Async client library for the promcon monitoring backend.
//!
//! The pieces, leaves first:
//! - [`transport`] — the HTTP seam: a [`transport::Transport`] trait with a
//!   reqwest-backed production implementation that enforces the backend's
//!   `{ success: bool, ... }` envelope and maps transport failures into the
//!   [`error::ClientError`] taxonomy (timeouts stay distinguishable from
//!   connection failures).
//! - [`registry`] — the value registry client: per-field known-value cache
//!   with reload-after-mutate consistency, idempotent ensure, explicit
//!   create, guarded delete.
//! - [`tags`] — service tag client; unions live service tags with registry
//!   tags into a sorted, deduplicated collection.
//! - [`batch`] — collects pending (field, value) pairs during a form fill
//!   and drains them in a single batch-ensure request at submit time.
//! - [`loader`] — `idle → loading → loaded | error` loaders for form
//!   schemas and monitoring types, with in-flight request deduplication.
//! - [`validate`] / [`render`] — validation rule assembly and the
//!   first-match-wins widget dispatch over field descriptors.
//! - [`input`] — UI-free state machines for the single-value autocomplete
//!   and multi-value tag inputs.

pub mod batch;
pub mod config;
pub mod error;
pub mod input;
pub mod loader;
pub mod registry;
pub mod render;
pub mod tags;
pub mod transport;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::ClientConfig;
pub use error::ClientError;
pub use transport::{HttpTransport, Transport};

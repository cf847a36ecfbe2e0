//! Shared data model for the promcon admin console.
//!
//! Everything here is the wire shape of the monitoring backend: reference
//! values and their ensure/batch envelopes, server-supplied form schemas,
//! monitoring type definitions, and the backend error body. The client and
//! CLI crates consume these types; nothing in this crate talks to the
//! network.

pub mod error;
pub mod monitoring;
pub mod reference;
pub mod schema;
pub mod tags;

//! Domain types for the workflow XML relay.
//!
//! Holds the database target forwarded to the VisTrails server, the raw
//! query parameters of a relay request, and the validated lookup built
//! from them. Nothing in this crate performs I/O.

pub mod error;
pub mod request;
pub mod types;

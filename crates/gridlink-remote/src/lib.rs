//! gridlink-remote — the remote batch scheduler's API surface.
//!
//! Models the scheduler's node and job records, defines the
//! [`RemoteClient`] seam every higher layer talks through, and ships two
//! implementations: a hyper-based [`RestClient`] for the real daemon and
//! an in-memory [`FakeClient`] for tests.
//!
//! # State model
//!
//! A node's state is a *set* of tokens: exactly one base state plus any
//! number of flags (see [`NodeState`]). Updates are partial directives —
//! tokens to add, plus the distinguished UNDRAIN directive that removes
//! the DRAIN token rather than adding anything.

pub mod client;
pub mod error;
pub mod fake;
pub mod rest;
pub mod types;

pub use client::RemoteClient;
pub use error::{RemoteError, RemoteResult};
pub use fake::{FakeClient, FakeClientBuilder};
pub use rest::{RestClient, RestConfig};
pub use types::*;

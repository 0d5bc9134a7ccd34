//! Push-commit acquisition against a GitHub-style REST API.
//!
//! [`CommitFetcher`] pages through a user's public event feed, keeps the
//! push events inside the recency window, optionally looks up the pull
//! request behind each commit, and returns the commits in date order.
//! All network access goes through the [`Transport`] trait so the whole
//! pipeline can be driven by [`transport::mock::MockTransport`] in tests.

pub mod error;
pub mod events;
pub mod pipeline;
pub mod pulls;
pub mod rate_limit;
pub mod transport;

pub use error::FetchError;
pub use pipeline::{CommitFetcher, EnrichScope, FetchRequest};
pub use transport::{BlockingTransport, HttpResponse, Transport, TransportError};

//! Report which versions of the managed containers are running right now.
//!
//! `GET /version` combines `<runtime> inspect` output of every managed container with the
//! state file of the image poller, `GET /health` tells whether any managed container runs.
pub mod cli;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

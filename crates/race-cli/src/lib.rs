//! Library components of the `rocket-race` dashboard CLI.
//!
//! [`pipeline`] wires resolution, normalization and metadata extraction
//! into a single [`pipeline::DashboardSnapshot`] for presenters; [`config`]
//! loads the dashboard settings and [`logging`] sets up `tracing`.

pub mod config;
pub mod logging;
pub mod pipeline;

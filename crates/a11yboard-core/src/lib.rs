//! a11yboard-core: platform-independent logic behind the accessibility run view.
//!
//! The view is a state machine: it consumes [`view::Event`]s (responses,
//! tab clicks, history navigation) and emits [`view::Command`]s (fetches,
//! history pushes). Executors live elsewhere: the Leptos frontend runs
//! commands with `gloo-net`, native code uses [`driver::drive`] with any
//! [`client::Backend`].

pub mod artifact;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod models;
pub mod pie;
pub mod query;
pub mod table;
pub mod tabs;
pub mod view;

pub use artifact::{ArtifactBody, ArtifactKind, ArtifactTab};
pub use client::{Backend, ResultsQuery};
pub use config::DashboardConfig;
pub use error::{Result, ViewError};
pub use filter::{Filter, FilterOp};
pub use models::{AccessibilityData, Artifact, ArtifactContent, Pagination, ResultsPage, Run, TestResult};
pub use pie::{PieData, PieDatum};
pub use query::{all_results_href, QueryState};
pub use table::{ResultRow, ResultsTable, TableRows};
pub use tabs::{Tab, TabController};
pub use view::{Command, Event, RunState, RunView};

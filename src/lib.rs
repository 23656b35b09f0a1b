//! Client for a remote race-strategy optimizer: catalog-driven selection,
//! a single-flight request controller and a proportional stint timeline.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod selection;
pub mod summary;
pub mod timeline;
pub mod types;

pub use backend::{HttpBackend, OptimizerBackend};
pub use controller::{OptimizationController, RequestState};
pub use error::{NotFoundError, OptimizeError};
pub use selection::{Selection, SelectionState};
pub use timeline::{render_timeline, TimelineView};
pub use types::{Circuit, Compound, Driver, OptimizationResult, Stint, Strategy};

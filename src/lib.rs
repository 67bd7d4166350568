//! # sortviz - Stepwise Sorting Visualization Engine
//!
//! sortviz runs classic sorting algorithms one observable step at a time.
//! Every comparison and mutation is published as a [`StateEvent`], then the
//! algorithm suspends until the pacing delay has elapsed and the run is not
//! paused. A rendering layer subscribes to the stream and draws bars; it
//! never touches the algorithms directly.
//!
//! ## Core Concepts
//!
//! - **Driver**: a sorting algorithm written against a [`StepContext`]
//! - **Step gate**: the suspension point between steps ([`StepScheduler`])
//! - **Run controller**: start, pause/resume and reset ([`RunController`])
//! - **State view**: array, highlights, settled indices, counters and run state
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sortviz::{Algorithm, RunController, VisualizerConfig};
//!
//! let config = VisualizerConfig {
//!     algorithm: Algorithm::Quick,
//!     ..VisualizerConfig::default()
//! };
//! let mut controller = RunController::new(config);
//! let stream = controller.subscribe();
//!
//! if let Some(run) = controller.start()? {
//!     let report = run.join()?;
//!     println!("{} comparisons, {} swaps", report.metrics.comparisons, report.metrics.swaps);
//! }
//! println!("{} events observed", stream.drain().len());
//! # Ok::<(), sortviz::SortVizError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod config;
pub mod error;
pub mod state;

// Stepping and observation
pub mod drivers;
pub mod observe;
pub mod scheduler;

// Lifecycle and surroundings
pub mod controller;
pub mod generator;
pub mod preferences;

pub use config::{Algorithm, Limits, VisualizerConfig};
pub use controller::{RunController, RunHandle, RunOutcome, RunReport};
pub use drivers::{sort_unpaced, sort_with, Cancelled, Step, StepContext, WriteKind};
pub use error::{ConfigError, PreferencesError, RunError, SortVizError, SortVizResult};
pub use generator::ArrayGenerator;
pub use observe::{EventPayload, Publisher, StateEvent, StateStream, SubscriptionId};
pub use preferences::{Preferences, PreferencesStore};
pub use scheduler::{RunSignal, StepGate, StepOutcome, StepScheduler, Unpaced};
pub use state::{ActiveSet, ArraySnapshot, Metrics, RunState, SettledSet, StateView};

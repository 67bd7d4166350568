//! Run controller: owns the lifecycle of one visualization.
//!
//! The controller holds the original (unsorted) array, the observable state
//! and the shared [`RunSignal`]. Starting a run spawns a dedicated worker
//! thread that drives the selected algorithm through a [`StepScheduler`];
//! pause, resume and reset only flip the signal, and the worker reacts at its
//! next suspension point.
//!
//! Every state change is published through the controller's [`Publisher`]
//! before the call returns, so a subscriber never misses a transition.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Algorithm, VisualizerConfig};
use crate::drivers;
use crate::error::{ConfigError, RunError, SortVizResult};
use crate::generator::ArrayGenerator;
use crate::observe::{Publisher, StateStream};
use crate::scheduler::{RunSignal, StepScheduler};
use crate::state::{ActiveSet, Metrics, RunState, StateView};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The algorithm ran to the end; the array is sorted.
    Completed,
    /// The run was reset before finishing.
    Cancelled,
}

/// Summary sent by the worker when a run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Algorithm that ran.
    pub algorithm: Algorithm,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Counters at the moment the run ended.
    pub metrics: Metrics,
    /// The working buffer as the driver left it.
    pub values: Vec<u32>,
    /// Wall-clock duration of the run, pauses included.
    pub elapsed: Duration,
}

impl RunReport {
    /// Returns true if the run completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Waits for the end of one run.
#[derive(Debug)]
pub struct RunHandle {
    algorithm: Algorithm,
    rx: Receiver<RunReport>,
}

impl RunHandle {
    /// Algorithm being run.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Block until the run ends.
    pub fn join(self) -> SortVizResult<RunReport> {
        self.rx.recv().map_err(|_| RunError::WorkerPanicked.into())
    }

    /// Block until the run ends or `timeout` elapses.
    pub fn join_timeout(&self, timeout: Duration) -> SortVizResult<RunReport> {
        match self.rx.recv_timeout(timeout) {
            Ok(report) => Ok(report),
            Err(RecvTimeoutError::Timeout) => Err(RunError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
            Err(RecvTimeoutError::Disconnected) => Err(RunError::WorkerPanicked.into()),
        }
    }

    /// The report, if the run has already ended.
    pub fn try_report(&self) -> SortVizResult<Option<RunReport>> {
        match self.rx.try_recv() {
            Ok(report) => Ok(Some(report)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RunError::WorkerPanicked.into()),
        }
    }
}

/// Owns the array, the observable state and at most one running worker.
#[derive(Debug)]
pub struct RunController {
    config: VisualizerConfig,
    generator: ArrayGenerator,
    original: Vec<u32>,
    publisher: Arc<Publisher>,
    signal: Arc<RunSignal>,
    worker: Option<JoinHandle<()>>,
}

impl RunController {
    /// Create a controller with a freshly generated array.
    #[must_use]
    pub fn new(config: VisualizerConfig) -> Self {
        Self::with_generator(config, ArrayGenerator::from_entropy())
    }

    /// Create a controller whose arrays come from a seeded generator.
    #[must_use]
    pub fn with_seed(config: VisualizerConfig, seed: u64) -> Self {
        Self::with_generator(config, ArrayGenerator::with_seed(seed))
    }

    fn with_generator(config: VisualizerConfig, mut generator: ArrayGenerator) -> Self {
        let config = config.clamped();
        let original = generator.generate(config.array_size, config.limits.value_range());
        let signal = RunSignal::new(config.step_delay_ms, config.limits.pause_poll());
        debug!(
            algorithm = %config.algorithm,
            size = config.array_size,
            delay_ms = config.step_delay_ms,
            "run controller created"
        );
        Self {
            publisher: Publisher::new(&original),
            signal: Arc::new(signal),
            config,
            generator,
            original,
            worker: None,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// The array a reset restores.
    #[must_use]
    pub fn original(&self) -> &[u32] {
        &self.original
    }

    /// Subscribe to every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> StateStream {
        self.publisher.subscribe()
    }

    /// Subscribe and capture the starting view atomically.
    #[must_use]
    pub fn subscribe_with_view(&self) -> (StateView, StateStream) {
        self.publisher.subscribe_with_view()
    }

    /// Copy of the current observable state.
    #[must_use]
    pub fn view(&self) -> StateView {
        self.publisher.view()
    }

    /// Authoritative run state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.signal.state()
    }

    /// Returns true while a run is running or paused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.signal.state().is_active()
    }

    /// Current counters.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.publisher.metrics()
    }

    /// Start sorting the displayed array with the selected algorithm.
    ///
    /// Returns `Ok(None)` without side effects when a run is already active.
    /// Counters and the settled set are cleared before the first step.
    pub fn start(&mut self) -> SortVizResult<Option<RunHandle>> {
        if self.is_active() {
            debug!("start ignored, run already active");
            return Ok(None);
        }
        self.reap_worker();

        let algorithm = self.config.algorithm;
        let values = self.publisher.view().array.values().to_vec();

        self.publisher.reset_metrics();
        self.publisher.clear_settled();
        self.publisher.publish_active(ActiveSet::none());
        self.signal.set_state(RunState::Running);
        self.sync_run_state();

        let (report_tx, report_rx) = bounded::<RunReport>(1);
        let publisher = Arc::clone(&self.publisher);
        let signal = Arc::clone(&self.signal);
        let size = values.len();

        let spawned = thread::Builder::new()
            .name("sortviz-run".to_string())
            .spawn(move || run_worker(algorithm, values, &signal, &publisher, &report_tx));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!(%algorithm, size, "run started");
                Ok(Some(RunHandle {
                    algorithm,
                    rx: report_rx,
                }))
            }
            Err(e) => {
                self.signal.set_state(RunState::Idle);
                self.sync_run_state();
                warn!(error = %e, "failed to spawn run worker");
                Err(RunError::SpawnFailed {
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Pause a running run or resume a paused one.
    ///
    /// Returns the new state, or `None` when no run is active.
    pub fn pause_resume(&mut self) -> Option<RunState> {
        let toggled = self.signal.toggle_pause();
        if let Some(state) = toggled {
            self.sync_run_state();
            debug!(run_state = ?state, "pause toggled");
        }
        toggled
    }

    /// Stop any active run and restore the original array.
    ///
    /// The worker is joined before the restore is published, so no step of
    /// the cancelled run can land after it.
    pub fn reset(&mut self) {
        if self.signal.leave_active(RunState::Stopped) {
            self.sync_run_state();
            debug!("stop requested");
        }
        self.reap_worker();

        self.signal.set_state(RunState::Idle);
        self.sync_run_state();
        self.restore(None);
        info!(size = self.original.len(), "reset to original array");
    }

    /// Replace the array with a freshly generated one.
    ///
    /// Returns false and changes nothing while a run is active.
    pub fn regenerate(&mut self) -> bool {
        if self.is_active() {
            debug!("regenerate ignored, run active");
            return false;
        }
        self.reap_worker();
        let values = self
            .generator
            .generate(self.config.array_size, self.config.limits.value_range());
        self.restore(Some(values));
        debug!(size = self.original.len(), "array regenerated");
        true
    }

    /// Use `values` as the new original array.
    ///
    /// The length must lie within the array size limits and every value
    /// within the generator's value range; otherwise nothing changes.
    pub fn load_values(&mut self, values: Vec<u32>) -> SortVizResult<()> {
        self.ensure_idle("array")?;
        self.check_values(&values)?;
        self.reap_worker();
        self.config.array_size = values.len();
        self.restore(Some(values));
        Ok(())
    }

    /// Select an algorithm by display or short name.
    pub fn select_algorithm(&mut self, name: &str) -> SortVizResult<Algorithm> {
        let algorithm = name.parse::<Algorithm>().map_err(|e| {
            warn!(name, "unknown algorithm requested");
            e
        })?;
        self.set_algorithm(algorithm)?;
        Ok(algorithm)
    }

    /// Select the algorithm for the next run.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> SortVizResult<()> {
        self.ensure_idle("algorithm")?;
        if self.config.algorithm != algorithm {
            debug!(from = %self.config.algorithm, to = %algorithm, "algorithm selected");
            self.config.algorithm = algorithm;
        }
        Ok(())
    }

    /// Change the array size and generate a new array of that size.
    ///
    /// The size is clamped into the configured limits; the applied size is
    /// returned.
    pub fn set_array_size(&mut self, size: usize) -> SortVizResult<usize> {
        self.ensure_idle("array size")?;
        let size = self.config.limits.clamp_array_size(size);
        self.config.array_size = size;
        self.regenerate();
        Ok(size)
    }

    /// Change the per-step delay. Allowed at any time; an active run picks
    /// it up at its next step.
    pub fn set_step_delay_ms(&mut self, delay_ms: u64) -> u64 {
        let delay_ms = self.config.limits.clamp_step_delay(delay_ms);
        self.config.step_delay_ms = delay_ms;
        self.signal.set_delay_ms(delay_ms);
        debug!(delay_ms, "step delay changed");
        delay_ms
    }

    fn ensure_idle(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.is_active() {
            warn!(field, "change rejected while a run is active");
            return Err(ConfigError::LockedWhileRunning { field });
        }
        Ok(())
    }

    fn check_values(&self, values: &[u32]) -> Result<(), ConfigError> {
        let limits = &self.config.limits;
        let size = values.len();
        if limits.clamp_array_size(size) != size {
            warn!(size, "loaded array size out of range");
            return Err(ConfigError::ArraySizeOutOfRange {
                size,
                min: limits.min_array_size,
                max: limits.max_array_size,
            });
        }

        let range = limits.value_range();
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !range.contains(*v)) {
            warn!(index, value, "loaded value out of range");
            return Err(ConfigError::ValueOutOfRange {
                index,
                value,
                min: *range.start(),
                max: *range.end(),
            });
        }
        Ok(())
    }

    fn sync_run_state(&self) {
        self.publisher.publish_run_state_from(|| self.signal.state());
    }

    /// Publish the original array (replacing it first if `values` is given)
    /// with cleared highlights and counters.
    fn restore(&mut self, values: Option<Vec<u32>>) {
        if let Some(values) = values {
            self.original = values;
        }
        self.publisher.publish_array(&self.original);
        self.publisher.publish_active(ActiveSet::none());
        self.publisher.clear_settled();
        self.publisher.reset_metrics();
    }

    fn reap_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("run worker panicked");
            }
        }
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.signal.leave_active(RunState::Stopped);
        self.reap_worker();
    }
}

fn run_worker(
    algorithm: Algorithm,
    values: Vec<u32>,
    signal: &Arc<RunSignal>,
    publisher: &Publisher,
    report_tx: &Sender<RunReport>,
) {
    let started = Instant::now();
    let scheduler = StepScheduler::new(Arc::clone(signal));
    let (values, step) = drivers::sort_with(algorithm, values, &scheduler, publisher);

    let outcome = if step.is_ok() {
        RunOutcome::Completed
    } else {
        RunOutcome::Cancelled
    };

    // A reset owns the transition out of Stopped; only a run that ended on
    // its own returns itself to Idle.
    if signal.leave_active(RunState::Idle) {
        publisher.publish_active(ActiveSet::none());
        publisher.publish_run_state_from(|| signal.state());
    }

    let report = RunReport {
        algorithm,
        outcome,
        metrics: publisher.metrics(),
        values,
        elapsed: started.elapsed(),
    };
    info!(
        %algorithm,
        outcome = ?report.outcome,
        comparisons = report.metrics.comparisons,
        swaps = report.metrics.swaps,
        elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "run finished"
    );
    let _ = report_tx.send(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::error::SortVizError;
    use crate::observe::EventPayload;

    const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

    fn unpaced(algorithm: Algorithm, size: usize) -> RunController {
        let config = VisualizerConfig::new(algorithm, size, 0, Limits::unpaced());
        RunController::with_seed(config, 42)
    }

    fn paced(delay_ms: u64) -> RunController {
        let config = VisualizerConfig::new(Algorithm::Bubble, 20, delay_ms, Limits::unpaced());
        RunController::with_seed(config, 42)
    }

    #[test]
    fn new_controller_is_idle_with_generated_array() {
        let controller = unpaced(Algorithm::Bubble, 12);
        let view = controller.view();
        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(view.array.values(), controller.original());
        assert_eq!(view.array.len(), 12);
        assert!(view.array.values().iter().all(|v| (10..=99).contains(v)));
        assert_eq!(view.metrics, Metrics::default());
    }

    #[test]
    fn completed_run_sorts_and_returns_to_idle() {
        let mut controller = unpaced(Algorithm::Quick, 30);
        let handle = controller.start().unwrap().unwrap();
        let report = handle.join_timeout(JOIN_TIMEOUT).unwrap();
        assert!(report.is_completed());

        let mut expected = controller.original().to_vec();
        expected.sort_unstable();
        assert_eq!(report.values, expected);

        controller.reap_worker();
        let view = controller.view();
        assert_eq!(view.run_state, RunState::Idle);
        assert_eq!(view.array.values(), expected.as_slice());
        assert!(view.settled.covers(30));
        assert!(view.active.is_empty());
        assert_eq!(view.metrics, report.metrics);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let mut controller = paced(200);
        let handle = controller.start().unwrap().unwrap();
        assert!(controller.start().unwrap().is_none());
        controller.reset();
        assert_eq!(handle.join_timeout(JOIN_TIMEOUT).unwrap().outcome, RunOutcome::Cancelled);
    }

    #[test]
    fn reset_cancels_and_restores() {
        let mut controller = paced(50);
        let original = controller.original().to_vec();
        let handle = controller.start().unwrap().unwrap();
        thread::sleep(Duration::from_millis(120));

        controller.reset();
        let report = handle.join_timeout(JOIN_TIMEOUT).unwrap();
        assert_eq!(report.outcome, RunOutcome::Cancelled);

        let view = controller.view();
        assert_eq!(view.run_state, RunState::Idle);
        assert_eq!(view.array.values(), original.as_slice());
        assert!(view.active.is_empty());
        assert!(view.settled.is_empty());
        assert_eq!(view.metrics, Metrics::default());
    }

    #[test]
    fn reset_publishes_stop_then_idle() {
        let mut controller = paced(500);
        let stream = controller.subscribe();
        let _handle = controller.start().unwrap().unwrap();
        controller.reset();

        let states: Vec<RunState> = stream
            .drain()
            .into_iter()
            .filter_map(|event| match event.payload {
                EventPayload::RunStateChanged { run_state } => Some(run_state),
                _ => None,
            })
            .collect();
        assert_eq!(states, vec![RunState::Running, RunState::Stopped, RunState::Idle]);
    }

    #[test]
    fn pause_resume_toggles_only_while_active() {
        let mut controller = paced(100);
        assert_eq!(controller.pause_resume(), None);

        let handle = controller.start().unwrap().unwrap();
        assert_eq!(controller.pause_resume(), Some(RunState::Paused));
        assert_eq!(controller.view().run_state, RunState::Paused);
        assert_eq!(controller.pause_resume(), Some(RunState::Running));
        assert_eq!(controller.view().run_state, RunState::Running);

        controller.reset();
        handle.join_timeout(JOIN_TIMEOUT).unwrap();
    }

    #[test]
    fn configuration_is_locked_while_running() {
        let mut controller = paced(200);
        let handle = controller.start().unwrap().unwrap();

        let err = controller.set_algorithm(Algorithm::Heap).unwrap_err();
        assert!(err.is_config());
        assert!(err.is_retryable());
        assert!(controller.set_array_size(8).unwrap_err().is_config());
        assert!(controller.load_values(vec![1, 2]).is_err());
        assert!(!controller.regenerate());
        assert_eq!(controller.config().algorithm, Algorithm::Bubble);

        assert_eq!(controller.set_step_delay_ms(0), 0);

        controller.reset();
        handle.join_timeout(JOIN_TIMEOUT).unwrap();
        controller.set_algorithm(Algorithm::Heap).unwrap();
        assert_eq!(controller.config().algorithm, Algorithm::Heap);
    }

    #[test]
    fn select_algorithm_by_name() {
        let mut controller = unpaced(Algorithm::Bubble, 5);
        assert_eq!(controller.select_algorithm("Merge Sort").unwrap(), Algorithm::Merge);
        assert_eq!(controller.config().algorithm, Algorithm::Merge);

        let err = controller.select_algorithm("Sleep Sort").unwrap_err();
        assert!(err.is_config());
        assert_eq!(controller.config().algorithm, Algorithm::Merge);
    }

    #[test]
    fn array_size_is_clamped_and_regenerates() {
        let config = VisualizerConfig::default();
        let mut controller = RunController::with_seed(config, 3);
        assert_eq!(controller.set_array_size(500).unwrap(), 50);
        assert_eq!(controller.view().array.len(), 50);
        assert_eq!(controller.set_array_size(1).unwrap(), 5);
        assert_eq!(controller.original().len(), 5);
    }

    #[test]
    fn step_delay_is_clamped() {
        let mut controller = RunController::with_seed(VisualizerConfig::default(), 3);
        assert_eq!(controller.set_step_delay_ms(0), 50);
        assert_eq!(controller.set_step_delay_ms(10_000), 1500);
        assert_eq!(controller.config().step_delay_ms, 1500);
    }

    #[test]
    fn rerun_after_completion_sorts_the_sorted_array() {
        let mut controller = unpaced(Algorithm::Bubble, 6);
        controller.load_values(vec![30, 10, 20, 60, 50, 40]).unwrap();
        let first = controller.start().unwrap().unwrap();
        assert!(first.try_report().is_ok());
        first.join_timeout(JOIN_TIMEOUT).unwrap();

        let second = controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
        assert!(second.is_completed());
        assert_eq!(second.metrics.swaps, 0);
        assert_eq!(second.values, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn out_of_range_values_are_rejected_without_change() {
        let mut controller = unpaced(Algorithm::Counting, 8);
        let before = controller.view();
        let stream = controller.subscribe();

        let err = controller.load_values(vec![u32::MAX, 10, 15]).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(
            err,
            SortVizError::Config(ConfigError::ValueOutOfRange { index: 0, value: u32::MAX, .. })
        ));

        let err = controller.load_values(vec![50, 9, 60]).unwrap_err();
        assert!(matches!(
            err,
            SortVizError::Config(ConfigError::ValueOutOfRange { index: 1, value: 9, .. })
        ));

        assert_eq!(controller.view(), before);
        assert_eq!(controller.config().array_size, 8);
        assert!(stream.try_recv().is_none());

        let report = controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
        assert!(report.is_completed());
    }

    #[test]
    fn oversized_arrays_are_rejected_without_change() {
        let mut controller = unpaced(Algorithm::Bubble, 8);
        let original = controller.original().to_vec();

        let err = controller.load_values(vec![42; 500]).unwrap_err();
        assert!(matches!(
            err,
            SortVizError::Config(ConfigError::ArraySizeOutOfRange { size: 500, max: 50, .. })
        ));
        assert_eq!(controller.config().array_size, 8);
        assert_eq!(controller.original(), original.as_slice());

        assert!(controller.regenerate());
        assert_eq!(controller.original().len(), 8);

        let mut strict = RunController::with_seed(VisualizerConfig::default(), 1);
        assert!(strict.load_values(vec![20, 30]).is_err());
        strict.load_values(vec![20, 30, 40, 50, 60]).unwrap();
        assert_eq!(strict.config().array_size, 5);
    }

    #[test]
    fn pending_run_has_no_report_yet() {
        let mut controller = paced(500);
        let handle = controller.start().unwrap().unwrap();
        assert!(handle.try_report().unwrap().is_none());
        assert_eq!(handle.algorithm(), Algorithm::Bubble);
        assert_eq!(controller.view().run_state, controller.run_state());

        controller.reset();
        let report = handle.join_timeout(JOIN_TIMEOUT).unwrap();
        assert_eq!(report.outcome, RunOutcome::Cancelled);
    }

    #[test]
    fn regenerate_clears_counters() {
        let mut controller = unpaced(Algorithm::Selection, 10);
        controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
        assert!(controller.metrics().comparisons > 0);

        assert!(controller.regenerate());
        let view = controller.view();
        assert_eq!(view.metrics, Metrics::default());
        assert!(view.settled.is_empty());
        assert_eq!(view.array.values(), controller.original());
    }
}

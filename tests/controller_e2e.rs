use std::thread;
use std::time::{Duration, Instant};

use sortviz::{
    sort_unpaced, Algorithm, EventPayload, Limits, Metrics, RunController, RunOutcome, RunState,
    VisualizerConfig,
};

const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

fn controller(algorithm: Algorithm, size: usize, delay_ms: u64) -> RunController {
    let config = VisualizerConfig::new(algorithm, size, delay_ms, Limits::unpaced());
    RunController::with_seed(config, 2024)
}

fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + JOIN_TIMEOUT;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn reset_after_completion_restores_generated_array() {
    let mut controller = controller(Algorithm::Heap, 20, 0);
    let generated = controller.view().array.values().to_vec();

    let report = controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_ne!(controller.view().array.values(), generated.as_slice());

    controller.reset();
    let view = controller.view();
    assert_eq!(view.array.values(), generated.as_slice());
    assert_eq!(view.metrics, Metrics::default());
    assert!(view.settled.is_empty());

    controller.reset();
    assert_eq!(controller.view().array.values(), generated.as_slice());
}

#[test]
fn reset_mid_run_returns_to_idle_and_allows_restart() {
    let mut controller = controller(Algorithm::Merge, 30, 20);
    let stream = controller.subscribe();
    let handle = controller.start().unwrap().unwrap();

    wait_for(|| controller.metrics().comparisons >= 2);
    controller.reset();
    assert_eq!(controller.run_state(), RunState::Idle);
    assert_eq!(handle.join_timeout(JOIN_TIMEOUT).unwrap().outcome, RunOutcome::Cancelled);

    // Nothing from the cancelled run may land after the restore.
    let events = stream.drain();
    let restore = events
        .iter()
        .rposition(|e| matches!(e.payload, EventPayload::RunStateChanged { run_state: RunState::Idle }))
        .unwrap();
    assert!(events[restore + 1..]
        .iter()
        .all(|e| !matches!(e.payload, EventPayload::Settled { .. })));

    controller.set_step_delay_ms(0);
    let report = controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
    assert!(report.is_completed());
    assert!(controller.view().settled.covers(30));
}

#[test]
fn pause_freezes_metrics_and_resume_continues_exactly() {
    let mut controller = controller(Algorithm::Insertion, 15, 20);
    let original = controller.original().to_vec();
    let handle = controller.start().unwrap().unwrap();

    wait_for(|| controller.metrics().comparisons >= 3);
    assert_eq!(controller.pause_resume(), Some(RunState::Paused));

    // At most one in-flight step may finish after the pause request.
    thread::sleep(Duration::from_millis(60));
    let frozen = controller.metrics();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(controller.metrics(), frozen);
    assert_eq!(controller.view().run_state, RunState::Paused);

    assert_eq!(controller.pause_resume(), Some(RunState::Running));
    controller.set_step_delay_ms(0);
    let report = handle.join_timeout(JOIN_TIMEOUT).unwrap();

    assert!(report.is_completed());
    assert_eq!(report.metrics, sort_unpaced(Algorithm::Insertion, &original).metrics);
}

#[test]
fn start_is_ignored_while_running() {
    let mut controller = controller(Algorithm::Bubble, 25, 100);
    let handle = controller.start().unwrap().unwrap();
    assert!(controller.start().unwrap().is_none());
    assert!(controller.is_active());

    controller.reset();
    handle.join_timeout(JOIN_TIMEOUT).unwrap();
}

#[test]
fn unknown_algorithm_is_rejected_without_mutation() {
    let mut controller = controller(Algorithm::Shell, 10, 0);
    let before = controller.view();

    let err = controller.select_algorithm("Stooge Sort").unwrap_err();
    assert!(err.is_config());
    assert_eq!(controller.config().algorithm, Algorithm::Shell);
    assert_eq!(controller.view(), before);
}

#[test]
fn every_transition_is_observable() {
    let mut controller = controller(Algorithm::Selection, 10, 0);
    controller.load_values(vec![29, 10, 14, 37, 13]).unwrap();
    let stream = controller.subscribe();

    let report = controller.start().unwrap().unwrap().join_timeout(JOIN_TIMEOUT).unwrap();
    assert_eq!(report.metrics, Metrics { comparisons: 10, swaps: 3 });
    assert_eq!(report.values, vec![10, 13, 14, 29, 37]);

    let states: Vec<RunState> = stream
        .drain()
        .into_iter()
        .filter_map(|e| match e.payload {
            EventPayload::RunStateChanged { run_state } => Some(run_state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![RunState::Running, RunState::Idle]);
}

#[test]
fn dropping_an_active_controller_stops_the_worker() {
    let mut controller = controller(Algorithm::Quick, 40, 1000);
    let handle = controller.start().unwrap().unwrap();
    drop(controller);
    assert_eq!(handle.join_timeout(JOIN_TIMEOUT).unwrap().outcome, RunOutcome::Cancelled);
}

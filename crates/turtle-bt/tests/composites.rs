mod common;

use common::{count, ctx, event_log, NullDriver, Scripted};
use turtle_bt::{
    parallel, reactive_selector, reactive_sequence, selector, sequence, BtError, ParallelPolicy,
    SetupError,
};
use turtle_core::{Blackboard, Status};

use Status::{Failure, Running, Success};

#[test]
fn memory_sequence_never_reticks_succeeded_children() {
    let log = event_log();
    let mut root = sequence(
        "root",
        vec![
            Scripted::node("a", &[Success], &log),
            Scripted::node("b", &[Running, Running, Success], &log),
            Scripted::node("c", &[Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(3), &mut driver, &mut bb), Success);

    assert_eq!(count(&log, "update:a"), 1);
    assert_eq!(count(&log, "update:b"), 3);
    assert_eq!(count(&log, "init:b"), 1);
    assert_eq!(count(&log, "update:c"), 1);
}

#[test]
fn reactive_sequence_reinvokes_succeeded_children_every_tick() {
    let log = event_log();
    let mut root = reactive_sequence(
        "root",
        vec![
            Scripted::node("a", &[Success], &log),
            Scripted::node("b", &[Running, Running, Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(3), &mut driver, &mut bb), Success);

    assert_eq!(count(&log, "update:a"), 3);
    assert_eq!(count(&log, "init:a"), 3);
    assert_eq!(count(&log, "init:b"), 1);
}

#[test]
fn memory_sequence_restarts_from_first_child_after_failure() {
    let log = event_log();
    let mut root = sequence(
        "root",
        vec![
            Scripted::node("a", &[Success], &log),
            Scripted::node("b", &[Failure, Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Failure);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "update:a"), 2);
}

#[test]
fn selector_stops_at_first_success() {
    let log = event_log();
    let mut root = selector(
        "root",
        vec![
            Scripted::node("a", &[Failure], &log),
            Scripted::node("b", &[Success], &log),
            Scripted::node("c", &[Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "update:c"), 0);
    assert_eq!(root.children()[2].status(), Status::Invalid);
}

#[test]
fn selector_fails_when_all_children_fail() {
    let log = event_log();
    let mut root = selector(
        "root",
        vec![
            Scripted::node("a", &[Failure], &log),
            Scripted::node("b", &[Failure], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Failure);
    assert_eq!(count(&log, "update:a"), 1);
    assert_eq!(count(&log, "update:b"), 1);
}

#[test]
fn memory_selector_resumes_running_child() {
    let log = event_log();
    let mut root = selector(
        "root",
        vec![
            Scripted::node("a", &[Failure], &log),
            Scripted::node("b", &[Running, Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "update:a"), 1);
}

#[test]
fn reactive_selector_preempts_running_child_when_earlier_sibling_succeeds() {
    let log = event_log();
    let mut root = reactive_selector(
        "root",
        vec![
            Scripted::node("guard", &[Failure, Success], &log),
            Scripted::node("move", &[Running], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(count(&log, "terminate:move:INVALID"), 0);

    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "terminate:move:INVALID"), 1);
    assert_eq!(count(&log, "update:move"), 1);
    assert_eq!(root.children()[1].status(), Status::Invalid);
}

#[test]
fn parallel_success_on_all_remembers_succeeded_children() {
    let log = event_log();
    let mut root = parallel(
        "root",
        ParallelPolicy::SuccessOnAll,
        vec![
            Scripted::node("a", &[Running, Success], &log),
            Scripted::node("b", &[Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "update:a"), 2);
    assert_eq!(count(&log, "update:b"), 1);
}

#[test]
fn parallel_success_on_all_ticks_every_child_before_failing() {
    let log = event_log();
    let mut root = parallel(
        "root",
        ParallelPolicy::SuccessOnAll,
        vec![
            Scripted::node("a", &[Failure], &log),
            Scripted::node("b", &[Running], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Failure);
    assert_eq!(count(&log, "update:b"), 1);
    assert_eq!(count(&log, "terminate:b:INVALID"), 1);
}

#[test]
fn parallel_success_on_one_preempts_remaining_children() {
    let log = event_log();
    let mut root = parallel(
        "root",
        ParallelPolicy::SuccessOnOne,
        vec![
            Scripted::node("slow", &[Running], &log),
            Scripted::node("fast", &[Running, Success], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "terminate:slow:INVALID"), 1);
    assert_eq!(count(&log, "terminate:fast:SUCCESS"), 1);
}

#[test]
fn parallel_success_on_one_fails_only_when_all_fail() {
    let log = event_log();
    let mut root = parallel(
        "root",
        ParallelPolicy::SuccessOnOne,
        vec![
            Scripted::node("a", &[Failure], &log),
            Scripted::node("b", &[Running, Failure], &log),
        ],
    );
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(root.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(root.tick(&ctx(2), &mut driver, &mut bb), Failure);
    assert_eq!(count(&log, "update:a"), 1);
}

#[test]
fn empty_composites_resolve_immediately_but_fail_setup() {
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    let mut seq = sequence::<NullDriver>("empty_seq", Vec::new());
    let mut sel = selector::<NullDriver>("empty_sel", Vec::new());
    assert_eq!(seq.tick(&ctx(1), &mut driver, &mut bb), Success);
    assert_eq!(sel.tick(&ctx(1), &mut driver, &mut bb), Failure);

    let err = seq.setup(&mut driver).unwrap_err();
    match err {
        BtError::Setup { node, source } => {
            assert_eq!(node, "empty_seq");
            assert!(matches!(source, SetupError::NoChildren));
        }
        other => panic!("unexpected error: {other}"),
    }
}

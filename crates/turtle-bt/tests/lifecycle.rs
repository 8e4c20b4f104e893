mod common;

use common::{count, ctx, event_log, NullDriver, Scripted};
use turtle_bt::{sequence, BehaviourTree, BtError};
use turtle_core::{Blackboard, Status};

use Status::{Running, Success};

#[test]
fn initialise_runs_only_when_entering_from_non_running() {
    let log = event_log();
    let mut node = Scripted::node("leaf", &[Running, Running, Success, Success], &log);
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    assert_eq!(node.status(), Status::Invalid);
    assert_eq!(node.tick(&ctx(1), &mut driver, &mut bb), Running);
    assert_eq!(node.tick(&ctx(2), &mut driver, &mut bb), Running);
    assert_eq!(node.tick(&ctx(3), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "init:leaf"), 1);
    assert_eq!(count(&log, "terminate:leaf:SUCCESS"), 1);

    assert_eq!(node.tick(&ctx(4), &mut driver, &mut bb), Success);
    assert_eq!(count(&log, "init:leaf"), 2);
    assert_eq!(count(&log, "terminate:leaf:SUCCESS"), 2);
}

#[test]
fn lifecycle_hooks_run_in_order() {
    let log = event_log();
    let mut node = Scripted::node("leaf", &[Success], &log);
    let mut driver = NullDriver::alive();
    let mut bb = Blackboard::new();

    node.tick(&ctx(1), &mut driver, &mut bb);
    assert_eq!(
        *log.borrow(),
        vec!["init:leaf", "update:leaf", "terminate:leaf:SUCCESS"]
    );
}

#[test]
fn setup_is_top_down_and_stops_at_first_failure() {
    let log = event_log();
    let root = sequence(
        "root",
        vec![
            Scripted::node("first", &[Success], &log),
            Scripted::needing_driver("needs_driver", &log),
            Scripted::node("never_setup", &[Success], &log),
        ],
    );
    let mut tree = BehaviourTree::new(root, NullDriver::default());

    let err = tree.setup().unwrap_err();
    assert!(matches!(err, BtError::Setup { ref node, .. } if node == "needs_driver"));
    assert_eq!(
        *log.borrow(),
        vec!["setup:first", "setup:needs_driver"]
    );
}

#[test]
fn halt_terminates_the_running_chain() {
    let log = event_log();
    let root = sequence(
        "root",
        vec![
            Scripted::node("done", &[Success], &log),
            Scripted::node("moving", &[Running], &log),
        ],
    );
    let mut tree = BehaviourTree::new(root, NullDriver::alive());
    tree.setup().unwrap();

    assert_eq!(tree.tick(), Running);
    tree.halt();

    assert_eq!(count(&log, "terminate:moving:INVALID"), 1);
    assert_eq!(count(&log, "terminate:done:INVALID"), 0);
    assert_eq!(tree.status(), Status::Invalid);
    assert_eq!(tree.root().children()[1].status(), Status::Invalid);
    assert_eq!(tree.root().children()[0].status(), Success);
}

#[test]
fn halt_is_a_noop_on_a_resolved_tree() {
    let log = event_log();
    let root = sequence("root", vec![Scripted::node("only", &[Success], &log)]);
    let mut tree = BehaviourTree::new(root, NullDriver::alive());

    assert_eq!(tree.tick(), Success);
    let before = log.borrow().len();
    tree.halt();
    assert_eq!(log.borrow().len(), before);
    assert_eq!(tree.status(), Success);
}

#[test]
fn tree_snapshot_reports_tick_path_and_running_nodes() {
    let log = event_log();
    let root = sequence(
        "root",
        vec![
            Scripted::node("read", &[Success], &log),
            Scripted::node("move", &[Running], &log),
        ],
    );
    let mut tree = BehaviourTree::new(root, NullDriver::alive());

    tree.tick();
    let first = tree.snapshot();
    assert_eq!(first.tick, 1);
    assert_eq!(first.tick_path(), vec!["root", "read", "move"]);
    assert_eq!(first.running(), vec!["root", "move"]);

    tree.tick();
    let second = tree.snapshot();
    assert_eq!(second.tick_path(), vec!["root", "move"]);
    assert_eq!(tree.driver().advanced, 2);
    assert_eq!(tree.tick_count(), 2);
}

mod common;

use common::{event_log, NullDriver, Scripted};
use turtle_bt::{parallel, selector, sequence, unicode_tree, BehaviourTree, ParallelPolicy, RenderOptions};
use turtle_core::Status::{Failure, Running, Success};

#[test]
fn renders_structure_with_markers_and_status() {
    let log = event_log();
    let root = sequence(
        "Mission",
        vec![
            Scripted::node("Check", &[Success], &log),
            selector(
                "Choose",
                vec![
                    Scripted::node("Fails", &[Failure], &log),
                    Scripted::node("Works", &[Running], &log),
                ],
            ),
            parallel(
                "Both",
                ParallelPolicy::SuccessOnAll,
                vec![Scripted::node("Idle", &[Success], &log)],
            ),
        ],
    );
    let mut tree = BehaviourTree::new(root, NullDriver::alive());
    tree.tick();

    let expected = "\
{-} Mission [*]
    --> Check [✓]
    {o} Choose [*]
        --> Fails [✕]
        --> Works [*]
    /_/ Both [-]
        --> Idle [-]
";
    assert_eq!(tree.render(), expected);
}

#[test]
fn renders_without_status() {
    let log = event_log();
    let root = sequence("Only", vec![Scripted::node("Leaf", &[Success], &log)]);
    let rendered = unicode_tree(&root, RenderOptions { show_status: false });
    assert_eq!(rendered, "{-} Only\n    --> Leaf\n");
}

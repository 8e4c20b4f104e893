use criterion::{black_box, criterion_group, criterion_main, Criterion};
use turtle_bt::{reactive_sequence, sequence, Behaviour, BehaviourTree, Node};
use turtle_core::{
    Blackboard, DriverError, NavGoal, PenConfig, Pose, Status, TickContext, TurtleDriver, Twist,
};

#[derive(Default)]
struct Idle;

impl TurtleDriver for Idle {
    fn is_alive(&self) -> bool {
        true
    }

    fn pose(&self) -> Result<Pose, DriverError> {
        Ok(Pose::default())
    }

    fn send_velocity(&mut self, _twist: Twist) -> Result<(), DriverError> {
        Ok(())
    }

    fn send_goal(&mut self, _goal: NavGoal) -> Result<(), DriverError> {
        Ok(())
    }

    fn set_pen(&mut self, _pen: PenConfig) -> Result<(), DriverError> {
        Ok(())
    }
}

struct Always(Status);

impl Behaviour<Idle> for Always {
    fn update(&mut self, _ctx: &TickContext, _driver: &mut Idle, _bb: &mut Blackboard) -> Status {
        self.0
    }
}

fn leaves(n: usize, last: Status) -> Vec<Node<Idle>> {
    (0..n)
        .map(|i| {
            let status = if i + 1 == n { last } else { Status::Success };
            Node::new(format!("leaf_{i}"), Always(status))
        })
        .collect()
}

fn bench_bt_tick(c: &mut Criterion) {
    let mut reactive = BehaviourTree::new(
        reactive_sequence("root", leaves(32, Status::Running)),
        Idle,
    );
    c.bench_function("turtle-bt/tick(reactive, leaves=32)", |b| {
        b.iter(|| black_box(reactive.tick()))
    });

    let mut memory = BehaviourTree::new(sequence("root", leaves(32, Status::Running)), Idle);
    c.bench_function("turtle-bt/tick(memory, leaves=32)", |b| {
        b.iter(|| black_box(memory.tick()))
    });
}

criterion_group!(benches, bench_bt_tick);
criterion_main!(benches);

use std::f64::consts::FRAC_PI_2;

use turtle_core::{DriverError, NavGoal, PenConfig, TickContext, TurtleDriver, Twist};
use turtle_sim::{SimConfig, SimTurtle, ARENA_SIZE, SPAWN_XY};

fn step(turtle: &mut SimTurtle, ticks: u64) {
    for tick in 1..=ticks {
        turtle.advance(&TickContext::new(tick, 0.1));
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn spawns_at_the_arena_center() {
    let turtle = SimTurtle::default();
    let pose = turtle.pose().unwrap();
    assert_eq!((pose.x, pose.y, pose.theta), (SPAWN_XY, SPAWN_XY, 0.0));
    assert!(turtle.is_alive());
}

#[test]
fn integrates_velocity_commands() {
    let mut turtle = SimTurtle::default();
    turtle.teleport(2.0, 2.0, 0.0);
    turtle.send_velocity(Twist::new(1.0, 0.0)).unwrap();
    step(&mut turtle, 10);

    let pose = turtle.pose().unwrap();
    assert!(close(pose.x, 3.0), "x = {}", pose.x);
    assert!(close(pose.y, 2.0));
    assert_eq!(pose.linear_velocity, 1.0);

    turtle.send_velocity(Twist::new(0.0, FRAC_PI_2)).unwrap();
    step(&mut turtle, 10);
    let pose = turtle.pose().unwrap();
    assert!(close(pose.theta, FRAC_PI_2), "theta = {}", pose.theta);
    assert!(close(pose.x, 3.0));
}

#[test]
fn clamps_to_the_arena() {
    let mut turtle = SimTurtle::default();
    turtle.send_velocity(Twist::new(2.0, 0.0)).unwrap();
    step(&mut turtle, 100);
    assert_eq!(turtle.pose().unwrap().x, ARENA_SIZE);
}

#[test]
fn follows_absolute_goals_and_drops_them_on_arrival() {
    let mut turtle = SimTurtle::default();
    turtle.teleport(1.0, 1.0, 0.0);
    turtle
        .send_goal(NavGoal {
            x: 1.0,
            y: 3.0,
            theta: Some(0.5),
        })
        .unwrap();

    step(&mut turtle, 5);
    let midway = turtle.pose().unwrap();
    assert!(close(midway.y, 2.0));
    assert!(close(midway.theta, FRAC_PI_2));
    assert!(turtle.active_goal().is_some());

    step(&mut turtle, 5);
    let pose = turtle.pose().unwrap();
    assert!(close(pose.y, 3.0));
    assert!(close(pose.theta, 0.5));
    assert!(turtle.active_goal().is_none());
}

#[test]
fn rejects_goals_outside_the_arena() {
    let mut turtle = SimTurtle::default();
    let err = turtle
        .send_goal(NavGoal {
            x: 20.0,
            y: 1.0,
            theta: None,
        })
        .unwrap_err();
    assert!(matches!(err, DriverError::Rejected { operation: "send_goal", .. }));
}

#[test]
fn draws_only_while_the_pen_is_down() {
    let mut turtle = SimTurtle::default();
    turtle.send_velocity(Twist::new(1.0, 0.0)).unwrap();
    step(&mut turtle, 3);
    assert_eq!(turtle.trail().len(), 3);

    turtle
        .set_pen(PenConfig {
            off: true,
            ..PenConfig::default()
        })
        .unwrap();
    step(&mut turtle, 3);
    assert_eq!(turtle.trail().len(), 3);

    turtle
        .set_pen(PenConfig {
            r: 0,
            g: 0,
            b: 255,
            width: 2,
            off: false,
        })
        .unwrap();
    step(&mut turtle, 1);
    let last = turtle.trail().last().unwrap();
    assert_eq!(last.rgb, (0, 0, 255));
    assert_eq!(last.width, 2);
}

#[test]
fn rejects_zero_width_pen() {
    let mut turtle = SimTurtle::default();
    let err = turtle
        .set_pen(PenConfig {
            width: 0,
            ..PenConfig::default()
        })
        .unwrap_err();
    assert!(matches!(err, DriverError::Rejected { operation: "set_pen", .. }));
}

#[test]
fn disconnected_turtle_fails_every_call_and_stops_moving() {
    let mut turtle = SimTurtle::default();
    turtle.send_velocity(Twist::new(1.0, 0.0)).unwrap();
    turtle.disconnect();

    assert!(!turtle.is_alive());
    assert_eq!(turtle.pose().unwrap_err(), DriverError::Disconnected);
    assert_eq!(
        turtle.send_velocity(Twist::STOP).unwrap_err(),
        DriverError::Disconnected
    );
    assert_eq!(
        turtle.set_pen(PenConfig::default()).unwrap_err(),
        DriverError::Disconnected
    );

    let before = turtle.current_pose();
    step(&mut turtle, 5);
    assert_eq!(turtle.current_pose(), before);

    turtle.reconnect();
    assert!(turtle.pose().is_ok());
}

#[test]
fn config_loads_from_yaml_with_defaults() {
    let config: SimConfig = serde_yaml::from_str(
        "spawn: { x: 2.0, y: 3.0 }\ngoal_speed: 1.5\n",
    )
    .unwrap();
    assert_eq!(config.spawn.x, 2.0);
    assert_eq!(config.spawn.theta, 0.0);
    assert_eq!(config.goal_speed, 1.5);
    assert_eq!(config.arena_size, ARENA_SIZE);
    assert_eq!(config.pen, PenConfig::default());

    let turtle = SimTurtle::new(config);
    assert_eq!(turtle.current_pose().y, 3.0);
}

#[test]
fn velocity_command_cancels_goal() {
    let mut turtle = SimTurtle::default();
    turtle
        .send_goal(NavGoal {
            x: 1.0,
            y: 1.0,
            theta: None,
        })
        .unwrap();
    turtle.send_velocity(Twist::STOP).unwrap();
    assert!(turtle.active_goal().is_none());

    let before = turtle.current_pose();
    step(&mut turtle, 3);
    assert_eq!((turtle.current_pose().x, turtle.current_pose().y), (before.x, before.y));
}

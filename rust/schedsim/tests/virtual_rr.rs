use schedsim::*;

mod common;

/// Two CPU hogs and one process that blocks after every CPU unit.
fn mixed_scenario() -> Scenario {
    Scenario::builder()
        .add_process("C1", 0, 16)
        .add_process("C2", 0, 16)
        .process(ProcessDef::new("I", 0, 6).with_io(1, 1))
        .io(true)
        .build()
        .unwrap()
}

/// Returning from I/O keeps the old virtual finish time, so the I/O-bound
/// process jumps ahead of CPU hogs that have used up quanta.
#[test]
fn test_vrr_favors_io_bound_process() {
    common::setup_test();
    let vrr = Simulator::new(VirtualRoundRobin::new(4))
        .run(mixed_scenario())
        .unwrap();
    let rr = Simulator::new(RoundRobin::new(4))
        .run(mixed_scenario())
        .unwrap();

    let io_pid = vrr.trace.pid("I").unwrap();
    assert_eq!(vrr.trace.dispatch_ticks(io_pid), vec![8, 13, 18, 23, 28, 33]);
    assert_eq!(
        rr.trace.dispatch_ticks(io_pid),
        vec![8, 17, 26, 35, 37, 39]
    );

    let vrr_io = vrr.summary.get("I").unwrap();
    let rr_io = rr.summary.get("I").unwrap();
    assert_eq!(vrr_io.completion, 34);
    assert_eq!(rr_io.completion, 40);
    assert!(vrr_io.turnaround < rr_io.turnaround);

    assert_eq!(vrr.summary.get("C1").unwrap().completion, 33);
    assert_eq!(vrr.summary.get("C2").unwrap().completion, 38);
    assert_eq!(vrr.summary.total_ticks, 38);
}

/// Without I/O the CPU never idles, so VRR ends on the same tick as plain
/// round robin and starts the same way.
#[test]
fn test_vrr_matches_rr_without_io() {
    common::setup_test();
    let build = || {
        Scenario::builder()
            .processes(common::classic_workload())
            .io(false)
            .build()
            .unwrap()
    };
    let rr = Simulator::new(RoundRobin::new(5)).run(build()).unwrap();
    let vrr = Simulator::new(VirtualRoundRobin::new(5))
        .run(build())
        .unwrap();

    assert_eq!(rr.summary.total_ticks, vrr.summary.total_ticks);
    let p0 = vrr.trace.pid("P0").unwrap();
    assert_eq!(vrr.trace.dispatch_ticks(p0)[..2], [0, 10]);
}

/// The smaller virtual finish time wins even against a process that has
/// been waiting longer.
#[test]
fn test_vrr_orders_by_virtual_finish() {
    common::setup_test();
    let scenario = Scenario::builder()
        .add_process("late", 1, 3)
        .add_process("early", 0, 3)
        .build()
        .unwrap();
    let result = Simulator::new(VirtualRoundRobin::new(2))
        .run(scenario)
        .unwrap();
    let trace = &result.trace;

    // early: vfinish 2, then 4 after its first quantum. late: vfinish 3.
    let early = trace.pid("early").unwrap();
    let late = trace.pid("late").unwrap();
    assert_eq!(trace.dispatch_ticks(early), vec![0, 4]);
    assert_eq!(trace.dispatch_ticks(late), vec![2, 5]);
    assert_eq!(result.summary.get("early").unwrap().completion, 5);
    assert_eq!(result.summary.get("late").unwrap().completion, 6);
}

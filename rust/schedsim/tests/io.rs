use schedsim::*;

mod common;

/// Blocked at tick t, admitted during t, served over t+1..=t+d, and ready
/// again for dispatch at t+d+1.
#[test]
fn test_io_episode_timing() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("A", 0, 5).with_io(2, 3))
        .io(true)
        .build()
        .unwrap();
    let result = Simulator::new(RoundRobin::new(10)).run(scenario).unwrap();
    let trace = &result.trace;
    let a = trace.pid("A").unwrap();

    let expected = [
        (0, TraceKind::Arrived { pid: a }),
        (0, TraceKind::Dispatched { pid: a }),
        (1, TraceKind::Blocked { pid: a }),
        (1, TraceKind::IoStarted { pid: a }),
        (4, TraceKind::IoCompleted { pid: a }),
        (5, TraceKind::Dispatched { pid: a }),
        (6, TraceKind::Blocked { pid: a }),
        (6, TraceKind::IoStarted { pid: a }),
        (9, TraceKind::IoCompleted { pid: a }),
        (10, TraceKind::Dispatched { pid: a }),
        (10, TraceKind::Completed { pid: a }),
    ];
    let actual: Vec<(Tick, TraceKind)> = trace
        .events()
        .iter()
        .map(|e| (e.tick, e.kind.clone()))
        .collect();
    assert_eq!(actual, expected);

    // The device reports progress after each unit.
    let progress: Vec<Option<(Pid, Tick)>> =
        trace.ticks()[2..5].iter().map(|t| t.io).collect();
    assert_eq!(progress, [Some((a, 1)), Some((a, 2)), Some((a, 3))]);
    // CPU sits idle while the only process is on the device; no fast-forward.
    assert!(trace.ticks()[2].cpu.is_none());
    assert_eq!(trace.ticks().len(), 11);

    let m = result.summary.get("A").unwrap();
    assert_eq!(m.completion, 11);
    assert_eq!(m.waiting, 6);
    assert_eq!(trace.io_time(a), 6);
}

/// The last CPU unit completes the process even on an I/O boundary.
#[test]
fn test_completion_beats_io_trigger() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("A", 0, 4).with_io(2, 3))
        .build()
        .unwrap();
    let result = Simulator::new(ShortestJobFirst::new()).run(scenario).unwrap();
    let trace = &result.trace;
    let a = trace.pid("A").unwrap();

    let blocks = trace
        .events()
        .iter()
        .filter(|e| matches!(e.kind, TraceKind::Blocked { .. }))
        .count();
    assert_eq!(blocks, 1);
    assert_eq!(result.summary.get("A").unwrap().completion, 7);
    assert_eq!(trace.io_time(a), 3);
}

/// The device serves one process at a time in block order.
#[test]
fn test_io_queue_is_fifo() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("A", 0, 4).with_io(1, 3))
        .process(ProcessDef::new("B", 0, 4).with_io(1, 3))
        .io(true)
        .build()
        .unwrap();
    let result = Simulator::new(RoundRobin::new(10)).run(scenario).unwrap();
    let trace = &result.trace;
    let a = trace.pid("A").unwrap();
    let b = trace.pid("B").unwrap();

    // B blocks at tick 1 while A holds the device until the end of tick 3.
    let row = &trace.ticks()[1];
    assert_eq!(row.io, Some((a, 1)));
    assert_eq!(row.io_queue, vec![b]);

    let starts: Vec<(Tick, Pid)> = trace
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            TraceKind::IoStarted { pid } => Some((e.tick, pid)),
            _ => None,
        })
        .collect();
    assert_eq!(
        starts,
        [(0, a), (3, b), (6, a), (9, b), (12, a), (15, b)]
    );

    // A process waiting for the device is never also the one it serves.
    for t in trace.ticks() {
        if let Some((pid, _)) = t.io {
            assert!(!t.io_queue.contains(&pid), "tick {}", t.tick);
        }
    }
    assert_eq!(result.summary.get("A").unwrap().completion, 17);
    assert_eq!(result.summary.get("B").unwrap().completion, 20);
}

/// The same workload with I/O forced off and on under one policy.
#[test]
fn test_io_override() {
    common::setup_test();
    let build = |io: bool| {
        Scenario::builder()
            .processes(common::classic_workload())
            .io(io)
            .build()
            .unwrap()
    };

    let off = Simulator::new(ShortestJobFirst::new())
        .run(build(false))
        .unwrap();
    assert!(off.trace.ticks().iter().all(|t| t.io.is_none()));
    assert_eq!(off.summary.total_ticks, 101);

    let on = Simulator::new(RoundRobin::new(5)).run(build(true)).unwrap();
    let p0 = on.trace.pid("P0").unwrap();
    assert!(on.trace.io_time(p0) > 0);
    assert!(on.summary.total_ticks > 101);
}

/// A process preempted mid-interval keeps its I/O counter.
#[test]
fn test_io_counter_survives_preemption() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("A", 0, 6).with_io(3, 1))
        .add_process("B", 0, 2)
        .io(true)
        .build()
        .unwrap();
    let result = Simulator::new(RoundRobin::new(2)).run(scenario).unwrap();
    let trace = &result.trace;
    let a = trace.pid("A").unwrap();

    // A runs 0..2, B runs 2..4, A resumes at 4 and blocks after one unit.
    assert!(trace.events().contains(&TraceEvent {
        tick: 4,
        kind: TraceKind::Blocked { pid: a },
    }));
}

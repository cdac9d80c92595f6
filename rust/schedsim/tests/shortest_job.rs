use schedsim::*;

mod common;

/// Non-preemptive SJF: the first process keeps the CPU, then the shortest
/// waiting burst runs next.
#[test]
fn test_sjf_picks_shortest_burst() {
    common::setup_test();
    let scenario = Scenario::builder()
        .add_process("A", 0, 7)
        .add_process("B", 1, 4)
        .add_process("C", 2, 1)
        .add_process("D", 3, 4)
        .build()
        .unwrap();
    let result = Simulator::new(ShortestJobFirst::new()).run(scenario).unwrap();
    let s = &result.summary;

    assert_eq!(s.get("A").unwrap().completion, 7);
    assert_eq!(s.get("C").unwrap().completion, 8);
    // B and D tie on burst; B arrived first.
    assert_eq!(s.get("B").unwrap().completion, 12);
    assert_eq!(s.get("D").unwrap().completion, 16);
    common::assert_close(s.avg_waiting, 5.25, "avg waiting");
    common::assert_close(s.avg_response, 5.25, "avg response");

    // Each process is dispatched exactly once.
    for name in ["A", "B", "C", "D"] {
        let pid = result.trace.pid(name).unwrap();
        assert_eq!(result.trace.dispatch_count(pid), 1, "{name}");
    }
    assert!(!result
        .trace
        .events()
        .iter()
        .any(|e| matches!(e.kind, TraceKind::Preempted { .. })));
}

/// SJF honors I/O by default and keys on the total burst length.
#[test]
fn test_sjf_classic_with_io() {
    common::setup_test();
    let scenario = Scenario::builder()
        .processes(common::classic_workload())
        .build()
        .unwrap();
    let result = Simulator::new(ShortestJobFirst::new()).run(scenario).unwrap();
    let trace = &result.trace;
    let s = &result.summary;

    let p0 = trace.pid("P0").unwrap();
    let p2 = trace.pid("P2").unwrap();
    assert!(trace.events().contains(&TraceEvent {
        tick: 1,
        kind: TraceKind::Blocked { pid: p0 },
    }));
    assert!(trace.events().contains(&TraceEvent {
        tick: 1,
        kind: TraceKind::IoStarted { pid: p0 },
    }));
    // P2 arrives at 8 and gets the CPU at 9, after P0 blocks at 8.
    assert_eq!(trace.dispatch_ticks(p2)[0], 9);

    assert_eq!(s.get("P0").unwrap().completion, 152);
    assert_eq!(s.get("P1").unwrap().completion, 97);
    assert_eq!(s.get("P2").unwrap().completion, 255);
    assert_eq!(s.get("P3").unwrap().completion, 80);
    assert_eq!(s.total_ticks, 255);
    common::assert_close(s.avg_turnaround, 139.5, "avg turnaround");
    common::assert_close(s.avg_waiting, 114.25, "avg waiting");
    common::assert_close(s.avg_response, 0.5, "avg response");

    assert_eq!(trace.io_time(p0), 11 * 5);
}

use std::io::Write;

use schedsim::*;

mod common;

fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_text_file_and_run() {
    common::setup_test();
    let file = write_file(
        ".txt",
        "# classic\nP0;0;24;2;5\nP1;3;17;3;6\nP2;8;50;2;5\nP3;15;10;3;6\n",
    );
    let defs = FileLoader::new(file.path()).load().unwrap();
    assert_eq!(defs, common::classic_workload());

    let scenario = Scenario::builder().processes(defs).build().unwrap();
    let result = Simulator::new(RoundRobin::new(5)).run(scenario).unwrap();
    common::assert_close(result.summary.avg_turnaround, 64.5, "avg turnaround");
}

#[test]
fn test_load_json_file() {
    common::setup_test();
    let file = write_file(
        ".json",
        r#"[
            {"name": "A", "arrival": 0, "cpu_burst": 5, "io_interval": 2, "io_duration": 3},
            {"name": "B", "arrival": 1, "cpu_burst": 2}
        ]"#,
    );
    let loader = FileLoader::new(file.path());
    assert_eq!(loader.format, WorkloadFormat::Json);
    let defs = loader.load().unwrap();
    assert_eq!(
        defs,
        vec![
            ProcessDef::new("A", 0, 5).with_io(2, 3),
            ProcessDef::new("B", 1, 2),
        ]
    );
}

#[test]
fn test_load_errors() {
    common::setup_test();
    let file = write_file(".txt", "A;0;5\nB;-2;4\n");
    let err = FileLoader::new(file.path()).load().unwrap_err();
    assert_eq!(err.line, Some(2));
    assert!(matches!(
        err.kind,
        WorkloadErrorKind::NegativeValue {
            field: "arrival",
            value: -2
        }
    ));

    let file = write_file(".json", r#"[{"name": "A", "arrival": 0}]"#);
    let err = FileLoader::new(file.path()).load().unwrap_err();
    assert!(matches!(err.kind, WorkloadErrorKind::Json(_)));

    let dir = tempfile::tempdir().unwrap();
    let err = FileLoader::new(dir.path().join("missing.txt"))
        .load()
        .unwrap_err();
    assert!(matches!(err.kind, WorkloadErrorKind::Io(_)));
    assert_eq!(err.line, None);
}

/// Duplicate names load fine and are rejected when the scenario is built.
#[test]
fn test_semantic_errors_surface_at_build() {
    common::setup_test();
    let defs = parse_text("A;0;3\nA;1;2\n").unwrap();
    let err = Scenario::builder().processes(defs).build().unwrap_err();
    assert_eq!(err, SimError::DuplicateName { name: "A".into() });
}

//! schedsim - Run a scheduling policy over a workload file and print the
//! per-tick trace and timing metrics.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use schedsim::{
    init_tracing, write_json, write_metrics_table, FileLoader, PolicyKind, Scenario, Simulator,
    TextReporter, Tick, WorkloadLoader,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Simulate CPU scheduling policies over a workload of CPU/I/O bursts.
#[derive(Parser)]
#[command(name = "schedsim")]
struct Cli {
    /// Workload file: `name;arrival;burst;ioInterval;ioDuration` per line,
    /// or a JSON array when the extension is `.json`.
    workload: Option<PathBuf>,

    /// Scheduling policy: rr, vrr, sjf, srtf, srtf-io.
    #[arg(short, long, default_value = "rr")]
    policy: PolicyKind,

    /// Quantum in ticks for rr and vrr.
    #[arg(short, long, default_value_t = 5, env = "SCHEDSIM_QUANTUM")]
    quantum: Tick,

    /// Honor the workload's I/O fields regardless of the policy default.
    #[arg(long, conflicts_with = "no_io")]
    io: bool,

    /// Ignore the workload's I/O fields regardless of the policy default.
    #[arg(long)]
    no_io: bool,

    /// Output format for the results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the per-tick trace (text) or include it in the output (json).
    #[arg(long)]
    dump_trace: bool,

    /// Abort the run if the clock reaches this many ticks (0 disables).
    #[arg(long, default_value_t = schedsim::DEFAULT_MAX_TICKS)]
    max_ticks: Tick,

    /// List available policies and exit.
    #[arg(long)]
    list_policies: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.list_policies {
        for kind in PolicyKind::ALL {
            println!("{:<8} {}", kind, kind.build(cli.quantum).name());
        }
        return Ok(());
    }

    let Some(path) = cli.workload.as_ref() else {
        bail!("missing required argument: <WORKLOAD>");
    };

    let defs = FileLoader::new(path)
        .load()
        .with_context(|| format!("failed to load workload {}", path.display()))?;

    let mut builder = Scenario::builder().processes(defs).max_ticks(match cli.max_ticks {
        0 => None,
        n => Some(n),
    });
    if cli.io {
        builder = builder.io(true);
    } else if cli.no_io {
        builder = builder.io(false);
    }
    let scenario = builder.build().context("invalid workload")?;
    let names = scenario.processes.iter().map(|d| d.name.clone()).collect();

    let policy = cli.policy.build(cli.quantum);
    let policy_name = policy.name();
    let sim = Simulator::new(policy);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.format {
        OutputFormat::Text => {
            writeln!(out, "{policy_name} scheduling")?;
            let result = if cli.dump_trace {
                let mut reporter = TextReporter::new(&mut out, names);
                let result = sim
                    .run_with_reporter(scenario, &mut reporter)
                    .context("simulation failed")?;
                reporter.finish().context("failed to write trace")?;
                writeln!(out)?;
                result
            } else {
                sim.run(scenario).context("simulation failed")?
            };
            write_metrics_table(&mut out, &result.summary)?;
        }
        OutputFormat::Json => {
            let result = sim.run(scenario).context("simulation failed")?;
            write_json(&mut out, policy_name, &result, cli.dump_trace)?;
        }
    }

    Ok(())
}

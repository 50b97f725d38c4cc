use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use mx_vm::{execute, program, ExecError, MachineState};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

use report::{Format, RunReport};

/// Exit codes: 0 = halted, 1 = execution error, 2 = input error (unreadable or malformed program).
const EXIT_EXEC: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "mxcpu", version, about = "Run an MX-VM program and print the final machine state")]
struct Cli {
    /// Program file: hex byte tokens separated by single spaces
    program: PathBuf,

    /// Report format
    #[arg(long, value_enum, env = "MXCPU_FORMAT", default_value = "text")]
    format: Format,

    /// Log filter in tracing-subscriber syntax (e.g. `mx_vm=trace`)
    #[arg(long, env = "MXCPU_LOG", default_value = "warn")]
    log: String,
}

fn log_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))
}

fn init_tracing(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Final report goes to `out`; on failure the partial state goes to `diag`.
fn run(cli: &Cli, out: &mut impl Write, diag: &mut impl Write) -> anyhow::Result<()> {
    let program = program::load(&cli.program)
        .with_context(|| format!("load {}", cli.program.display()))?;
    info!(len = program.len(), cid = %program.cid(), "program loaded");

    let mut state = MachineState::new();
    match execute(&program, &mut state) {
        Ok(()) => {
            write!(out, "{}", RunReport::new(&program, &state, None).render(cli.format)?)?;
            Ok(())
        }
        Err(e) => {
            let report = RunReport::new(&program, &state, Some(e.to_string()));
            write!(diag, "{}", report.render(cli.format)?)?;
            Err(e.into())
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ExecError>().is_some() {
        EXIT_EXEC
    } else {
        EXIT_INPUT
    }
}

fn fail(err: &anyhow::Error, code: i32) -> ! {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    process::exit(code)
}

fn main() {
    let cli = Cli::parse();
    match log_filter(&cli.log) {
        Ok(filter) => init_tracing(filter),
        Err(e) => fail(&e, EXIT_INPUT),
    }

    if let Err(e) = run(&cli, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        fail(&e, exit_code_for(&e));
    }
}

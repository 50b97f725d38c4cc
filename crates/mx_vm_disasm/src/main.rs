use anyhow::{Context, Result};
use clap::Parser;
use mx_vm::{disasm, program};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mxcpu-disasm", version, about = "List the instructions of an MX-VM program")]
struct Cli {
    /// Program file: hex byte tokens separated by single spaces
    program: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let program = program::load(&cli.program)
        .with_context(|| format!("load {}", cli.program.display()))?;
    for line in disasm::listing(&program) {
        println!("{}", line);
    }
    Ok(())
}

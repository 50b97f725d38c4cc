use mx_vm::{MachineState, Program};
use serde::Serialize;

/// Output format of the final-state report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub program_cid: String,
    pub program_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub state: &'a MachineState,
}

impl<'a> RunReport<'a> {
    pub fn new(program: &Program, state: &'a MachineState, error: Option<String>) -> Self {
        Self {
            program_cid: program.cid(),
            program_len: program.len(),
            error,
            state,
        }
    }

    pub fn render(&self, format: Format) -> anyhow::Result<String> {
        Ok(match format {
            Format::Text => text(self.state),
            Format::Json => serde_json::to_string_pretty(self)?,
        })
    }
}

/// Fixed-layout dump: cycles in decimal, everything else in hex.
pub fn text(state: &MachineState) -> String {
    let regs: Vec<String> = state.registers.iter().map(|r| format!("{:#x}", r)).collect();
    format!(
        "Cycles    : {}\nINC       : {:#x}\nPC        : {:#x}\nACC       : {:#x}\nRegisters : [{}]\n",
        state.cycles,
        state.counter,
        state.program_counter,
        state.accumulator,
        regs.join(" ")
    )
}

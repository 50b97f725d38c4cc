use crate::{opcode::Opcode, state::MachineState};
use std::fmt;
use tracing::{debug, trace, warn};

/// Address space an out-of-bounds index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Opcode or operand fetch past the end of the program.
    Program,
    /// Register-index operand not below [`crate::REGISTER_COUNT`].
    Registers,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Program => "program",
            Region::Registers => "register",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("unknown instruction {0:#04x}")]
    UnknownInstruction(u8),
    #[error("{region} index {index} out of bounds")]
    OutOfBounds { region: Region, index: usize },
}

/// What the program counter does after an instruction.
enum Step {
    /// Advance by the instruction width.
    Next,
    Jump(u8),
    Halt,
}

struct Vm<'a> {
    program: &'a [u8],
    state: &'a mut MachineState,
}

/// Runs `program` on `state` from its current program counter until HALT.
///
/// `state` is mutated in place. On error it holds the machine as it was when
/// the failing instruction was attempted, with that attempt already counted
/// in `cycles`.
pub fn execute(program: &[u8], state: &mut MachineState) -> Result<(), ExecError> {
    let mut vm = Vm { program, state };
    let res = vm.run();
    match &res {
        Ok(()) => debug!(
            cycles = vm.state.cycles,
            pc = vm.state.program_counter,
            "halted"
        ),
        Err(e) => warn!(
            cycles = vm.state.cycles,
            pc = vm.state.program_counter,
            error = %e,
            "execution failed"
        ),
    }
    res
}

impl<'a> Vm<'a> {
    fn run(&mut self) -> Result<(), ExecError> {
        loop {
            self.state.cycles = self.state.cycles.wrapping_add(1);
            let pc = self.state.program_counter;
            let byte = self.fetch(pc as usize)?;
            let op = Opcode::try_from(byte).map_err(ExecError::UnknownInstruction)?;
            trace!(pc, opcode = %op, cycles = self.state.cycles, "exec");
            match self.step(op)? {
                Step::Next => self.state.program_counter = pc.wrapping_add(op.width()),
                Step::Jump(target) => self.state.program_counter = target,
                Step::Halt => return Ok(()),
            }
        }
    }

    fn fetch(&self, index: usize) -> Result<u8, ExecError> {
        self.program.get(index).copied().ok_or(ExecError::OutOfBounds {
            region: Region::Program,
            index,
        })
    }

    /// `n`-th operand byte of the instruction at the program counter.
    fn operand(&self, n: usize) -> Result<u8, ExecError> {
        self.fetch(self.state.program_counter as usize + n)
    }

    fn reg(&self, idx: u8) -> Result<u8, ExecError> {
        self.state
            .registers
            .get(idx as usize)
            .copied()
            .ok_or_else(|| register_out_of_bounds(idx))
    }

    fn reg_mut(&mut self, idx: u8) -> Result<&mut u8, ExecError> {
        self.state
            .registers
            .get_mut(idx as usize)
            .ok_or_else(|| register_out_of_bounds(idx))
    }

    fn step(&mut self, op: Opcode) -> Result<Step, ExecError> {
        match op {
            Opcode::Halt => return Ok(Step::Halt),
            Opcode::Jmp => return Ok(Step::Jump(self.operand(1)?)),
            Opcode::BeqReg => {
                let idx = self.operand(1)?;
                let target = self.operand(2)?;
                if self.state.accumulator == self.reg(idx)? {
                    return Ok(Step::Jump(target));
                }
            }
            Opcode::BeqImm => {
                let value = self.operand(1)?;
                let target = self.operand(2)?;
                if self.state.accumulator == value {
                    return Ok(Step::Jump(target));
                }
            }
            Opcode::AddReg => {
                let v = self.reg(self.operand(1)?)?;
                self.state.accumulator = self.state.accumulator.wrapping_add(v);
            }
            Opcode::AddImm => {
                let v = self.operand(1)?;
                self.state.accumulator = self.state.accumulator.wrapping_add(v);
            }
            Opcode::Inc => self.state.counter = self.state.counter.wrapping_add(1),
            Opcode::Dec => self.state.counter = self.state.counter.wrapping_sub(1),
            Opcode::Clr => self.state.counter = 0,
            Opcode::CounterToAcc => self.state.accumulator = self.state.counter,
            Opcode::AccToCounter => self.state.counter = self.state.accumulator,
            Opcode::LoadReg => {
                self.state.accumulator = self.reg(self.operand(1)?)?;
            }
            Opcode::LoadImm => self.state.accumulator = self.operand(1)?,
            Opcode::StoreReg => {
                let idx = self.operand(1)?;
                let acc = self.state.accumulator;
                *self.reg_mut(idx)? = acc;
            }
        }
        Ok(Step::Next)
    }
}

fn register_out_of_bounds(idx: u8) -> ExecError {
    ExecError::OutOfBounds {
        region: Region::Registers,
        index: idx as usize,
    }
}

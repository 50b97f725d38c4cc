//! MX-VM - 8-bit accumulator machine
//!
//! - 16 opcodes, fixed-width byte encoding (1 to 3 bytes per instruction)
//! - Machine state: cycle counter, counter register, program counter,
//!   accumulator and a bank of 16 registers, all `u8` with wrapping arithmetic
//! - Iterative fetch/decode/execute loop that stops on HALT or a typed error
//! - No-IO core; loading text programs lives in [`program`]

pub mod disasm;
pub mod exec;
pub mod opcode;
pub mod program;
pub mod state;

pub use exec::{execute, ExecError, Region};
pub use opcode::{Opcode, Operand};
pub use program::{Program, ProgramError};
pub use state::{MachineState, REGISTER_COUNT};

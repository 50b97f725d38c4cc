use serde::{Deserialize, Serialize};

/// Size of the register bank.
pub const REGISTER_COUNT: usize = 16;

/// Complete machine state. Every field is 8-bit and wraps on overflow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MachineState {
    /// Instructions attempted so far, modulo 256.
    pub cycles: u8,
    /// Secondary counter register (INC/DEC/CLR).
    pub counter: u8,
    /// Offset of the next opcode to fetch.
    pub program_counter: u8,
    pub accumulator: u8,
    pub registers: [u8; REGISTER_COUNT],
}

impl MachineState {
    /// Zeroed state, registers included.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_is_zeroed() {
        let s = MachineState::new();
        assert_eq!(s.cycles, 0);
        assert_eq!(s.counter, 0);
        assert_eq!(s.program_counter, 0);
        assert_eq!(s.accumulator, 0);
        assert_eq!(s.registers, [0u8; REGISTER_COUNT]);
    }

    #[test]
    fn serializes_flat() {
        let mut s = MachineState::new();
        s.accumulator = 0x2a;
        s.registers[5] = 0x2a;
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["accumulator"], json!(42));
        assert_eq!(v["registers"].as_array().unwrap().len(), REGISTER_COUNT);
        assert_eq!(v["registers"][5], json!(42));
        let back: MachineState = serde_json::from_value(v).unwrap();
        assert_eq!(back, s);
    }
}

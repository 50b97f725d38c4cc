//! Instruction set.
//!
//! Every instruction is one opcode byte followed by zero, one or two operand
//! bytes. The operand layout of each opcode is fixed, so the encoded width is
//! known from the opcode alone.

use std::fmt;

/// Kind of a single operand byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Index into the register bank, must be below [`crate::REGISTER_COUNT`].
    Reg,
    /// Immediate 8-bit value.
    Imm,
    /// Absolute jump target (program offset).
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Stop the machine.
    Halt = 0x00,
    /// `pc = target`
    Jmp = 0xB1,
    /// Branch to `target` when `acc == r[reg]`.
    BeqReg = 0xB2,
    /// Branch to `target` when `acc == value`.
    BeqImm = 0xB3,
    /// `acc += r[reg]`
    AddReg = 0xC0,
    /// `acc += value`
    AddImm = 0xC1,
    /// `counter += 1`
    Inc = 0xC2,
    /// `counter -= 1`
    Dec = 0xC3,
    /// `counter = 0`
    Clr = 0xC4,
    /// `acc = counter`
    CounterToAcc = 0xC5,
    /// `counter = acc`
    AccToCounter = 0xC6,
    /// `acc = r[reg]`
    LoadReg = 0xD0,
    /// `acc = value`
    LoadImm = 0xD1,
    /// `r[reg] = acc`
    StoreReg = 0xD2,
}

impl Opcode {
    pub const ALL: [Opcode; 14] = [
        Opcode::Halt,
        Opcode::Jmp,
        Opcode::BeqReg,
        Opcode::BeqImm,
        Opcode::AddReg,
        Opcode::AddImm,
        Opcode::Inc,
        Opcode::Dec,
        Opcode::Clr,
        Opcode::CounterToAcc,
        Opcode::AccToCounter,
        Opcode::LoadReg,
        Opcode::LoadImm,
        Opcode::StoreReg,
    ];

    /// Operand bytes that follow the opcode, in program order.
    pub fn operands(self) -> &'static [Operand] {
        use Operand::*;
        match self {
            Opcode::Halt
            | Opcode::Inc
            | Opcode::Dec
            | Opcode::Clr
            | Opcode::CounterToAcc
            | Opcode::AccToCounter => &[],
            Opcode::Jmp => &[Target],
            Opcode::BeqReg => &[Reg, Target],
            Opcode::BeqImm => &[Imm, Target],
            Opcode::AddReg | Opcode::LoadReg | Opcode::StoreReg => &[Reg],
            Opcode::AddImm | Opcode::LoadImm => &[Imm],
        }
    }

    /// Encoded length in bytes, opcode included.
    pub fn width(self) -> u8 {
        1 + self.operands().len() as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Jmp => "JMP",
            Opcode::BeqReg | Opcode::BeqImm => "BEQ",
            Opcode::AddReg | Opcode::AddImm => "ADD",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Clr => "CLR",
            Opcode::CounterToAcc => "CTA",
            Opcode::AccToCounter => "ATC",
            Opcode::LoadReg | Opcode::LoadImm => "LOAD",
            Opcode::StoreReg => "STORE",
        }
    }
}

impl TryFrom<u8> for Opcode {
    /// The byte that did not decode.
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x00 => Opcode::Halt,
            0xB1 => Opcode::Jmp,
            0xB2 => Opcode::BeqReg,
            0xB3 => Opcode::BeqImm,
            0xC0 => Opcode::AddReg,
            0xC1 => Opcode::AddImm,
            0xC2 => Opcode::Inc,
            0xC3 => Opcode::Dec,
            0xC4 => Opcode::Clr,
            0xC5 => Opcode::CounterToAcc,
            0xC6 => Opcode::AccToCounter,
            0xD0 => Opcode::LoadReg,
            0xD1 => Opcode::LoadImm,
            0xD2 => Opcode::StoreReg,
            other => return Err(other),
        })
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_matches_discriminant() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::try_from(u8::from(op)), Ok(op));
        }
    }

    #[test]
    fn only_listed_bytes_decode() {
        let decoded = (0..=u8::MAX).filter(|b| Opcode::try_from(*b).is_ok()).count();
        assert_eq!(decoded, Opcode::ALL.len());
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
        assert_eq!(Opcode::try_from(0xC7), Err(0xC7));
    }

    #[test]
    fn widths() {
        assert_eq!(Opcode::Halt.width(), 1);
        assert_eq!(Opcode::Jmp.width(), 2);
        assert_eq!(Opcode::BeqReg.width(), 3);
        assert_eq!(Opcode::BeqImm.width(), 3);
        assert_eq!(Opcode::AddImm.width(), 2);
        assert_eq!(Opcode::Inc.width(), 1);
        assert_eq!(Opcode::StoreReg.width(), 2);
    }
}

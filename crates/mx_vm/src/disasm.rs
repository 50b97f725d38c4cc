//! Linear-sweep disassembly.
//!
//! Decodes from offset 0 to the end of the program. Bytes that are not
//! opcodes are listed as data and skipped one at a time, so a listing never
//! fails; an instruction whose operands run past the end closes it.

use crate::opcode::{Opcode, Operand};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Fully decoded instruction with its operand bytes.
    Instr { opcode: Opcode, operands: Vec<u8> },
    /// Byte that is not a known opcode.
    Data(u8),
    /// Opcode whose operands are cut off by the end of the program.
    Truncated { opcode: Opcode, available: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub offset: usize,
    pub kind: LineKind,
}

pub fn listing(program: &[u8]) -> Vec<Line> {
    let mut out = Vec::new();
    let mut offset = 0;
    while let Some(&byte) = program.get(offset) {
        let Ok(opcode) = Opcode::try_from(byte) else {
            out.push(Line { offset, kind: LineKind::Data(byte) });
            offset += 1;
            continue;
        };
        let width = opcode.width() as usize;
        let rest = &program[offset + 1..];
        let n = width - 1;
        if rest.len() < n {
            out.push(Line {
                offset,
                kind: LineKind::Truncated { opcode, available: rest.to_vec() },
            });
            break;
        }
        out.push(Line {
            offset,
            kind: LineKind::Instr { opcode, operands: rest[..n].to_vec() },
        });
        offset += width;
    }
    out
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}: ", self.offset)?;
        match &self.kind {
            LineKind::Instr { opcode, operands } => {
                f.write_str(opcode.mnemonic())?;
                for (i, (kind, value)) in opcode.operands().iter().zip(operands).enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    match kind {
                        Operand::Reg => write!(f, "r{}", value)?,
                        Operand::Imm => write!(f, "#{:#04x}", value)?,
                        Operand::Target => write!(f, "@{:#04x}", value)?,
                    }
                }
                Ok(())
            }
            LineKind::Data(b) => write!(f, ".byte {:#04x}", b),
            LineKind::Truncated { opcode, available } => {
                write!(
                    f,
                    "{} <truncated: {} of {} operand bytes>",
                    opcode.mnemonic(),
                    available.len(),
                    opcode.operands().len()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn render(program: &[u8]) -> Vec<String> {
        listing(program).iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn lists_every_operand_kind() {
        let lines = render(&hex!("D1 2A D2 05 B3 10 06 C2 B1 00 00"));
        assert_eq!(
            lines,
            vec![
                "0x00: LOAD #0x2a",
                "0x02: STORE r5",
                "0x04: BEQ #0x10, @0x06",
                "0x07: INC",
                "0x08: JMP @0x00",
                "0x0a: HALT",
            ]
        );
    }

    #[test]
    fn unknown_bytes_are_data() {
        let l = listing(&hex!("FF C5"));
        assert_eq!(l[0], Line { offset: 0, kind: LineKind::Data(0xFF) });
        assert_eq!(
            l[1],
            Line {
                offset: 1,
                kind: LineKind::Instr { opcode: Opcode::CounterToAcc, operands: vec![] }
            }
        );
        assert_eq!(l[0].to_string(), "0x00: .byte 0xff");
    }

    #[test]
    fn truncated_tail_ends_listing() {
        let l = listing(&hex!("C2 B2 03"));
        assert_eq!(l.len(), 2);
        assert_eq!(
            l[1].kind,
            LineKind::Truncated { opcode: Opcode::BeqReg, available: vec![0x03] }
        );
        assert_eq!(l[1].to_string(), "0x01: BEQ <truncated: 1 of 2 operand bytes>");
    }

    #[test]
    fn empty_program_has_no_lines() {
        assert!(listing(&[]).is_empty());
    }
}

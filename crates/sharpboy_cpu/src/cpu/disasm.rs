use super::alu::AluOp;
use super::{Instruction, MemoryPort, Registers};

const R8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP_STACK: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 4] = ["NZ", "Z", "NC", "C"];

/// Speculative memory reader for disassembly.
///
/// Every read goes through `Result::ok`, so a faulting address shows up as
/// `??` and never reaches the caller.
struct Peek<'a, M: ?Sized> {
    mem: &'a mut M,
    pc: u16,
}

impl<M: MemoryPort + ?Sized> Peek<'_, M> {
    fn byte_at(&mut self, addr: u16) -> Option<u8> {
        self.mem.read8(addr).ok()
    }

    fn word_at(&mut self, addr: u16) -> Option<u16> {
        self.mem.read16(addr).ok()
    }

    fn imm8(&mut self) -> Option<u8> {
        self.byte_at(self.pc.wrapping_add(1))
    }

    fn imm16(&mut self) -> Option<u16> {
        self.word_at(self.pc.wrapping_add(1))
    }
}

fn hex8(value: Option<u8>) -> String {
    value.map_or_else(|| "??".to_string(), |v| format!("0x{v:02X}"))
}

fn hex16(value: Option<u16>) -> String {
    value.map_or_else(|| "????".to_string(), |v| format!("0x{v:04X}"))
}

impl Instruction {
    /// Render the instruction at `pc` (the address of `opcode`) as assembly.
    ///
    /// Operands and indirect values are read from `mem` speculatively;
    /// faults are rendered as `??` and otherwise ignored.
    pub fn disassemble<M: MemoryPort + ?Sized>(
        self,
        opcode: u8,
        pc: u16,
        regs: &Registers,
        mem: &mut M,
    ) -> String {
        let mut peek = Peek { mem, pc };
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = (opcode >> 4) & 0x03;
        let cc = CC[usize::from(y & 0x03)];

        match self {
            Instruction::Nop => "NOP".to_string(),
            Instruction::LdA16Sp => format!("LD ({}),SP", hex16(peek.imm16())),
            Instruction::Halt => "HALT".to_string(),
            Instruction::LdRR => {
                let text = format!("LD {},{}", R8[usize::from(y)], R8[usize::from(z)]);
                if y == 6 || z == 6 {
                    format!("{text}  ; (HL)={}", hex8(peek.byte_at(regs.hl())))
                } else {
                    text
                }
            }
            Instruction::LdRrD16 => format!("LD {},{}", RP[usize::from(p)], hex16(peek.imm16())),
            Instruction::LdIndirect => {
                let (pair, addr) = if p == 0 { ("BC", regs.bc()) } else { ("DE", regs.de()) };
                if opcode & 0x08 == 0 {
                    format!("LD ({pair}),A")
                } else {
                    format!("LD A,({pair})  ; ({pair})={}", hex8(peek.byte_at(addr)))
                }
            }
            Instruction::IncDecRr => {
                let op = if opcode & 0x08 == 0 { "INC" } else { "DEC" };
                format!("{op} {}", RP[usize::from(p)])
            }
            Instruction::IncDecR => {
                let op = if opcode & 0x01 == 0 { "INC" } else { "DEC" };
                format!("{op} {}", R8[usize::from(y)])
            }
            Instruction::RotateA => {
                ["RLCA", "RRCA", "RLA", "RRA"][usize::from(y & 0x03)].to_string()
            }
            Instruction::Stop => "STOP".to_string(),
            Instruction::Jr => {
                let target = peek
                    .imm8()
                    .map(|e| pc.wrapping_add(2).wrapping_add(e as i8 as u16));
                if opcode == 0x18 {
                    format!("JR {}", hex16(target))
                } else {
                    format!("JR {cc},{}", hex16(target))
                }
            }
            Instruction::LdRD8 => format!("LD {},{}", R8[usize::from(y)], hex8(peek.imm8())),
            Instruction::LdHlIncDec => {
                let hl = if opcode & 0x10 == 0 { "HL+" } else { "HL-" };
                if opcode & 0x08 == 0 {
                    format!("LD ({hl}),A")
                } else {
                    format!("LD A,({hl})  ; (HL)={}", hex8(peek.byte_at(regs.hl())))
                }
            }
            Instruction::ScfCcf => String::from(if opcode == 0x37 { "SCF" } else { "CCF" }),
            Instruction::Alu => {
                let op = AluOp::from_opcode(opcode).mnemonic();
                if opcode & 0xC0 == 0xC0 {
                    format!("{op}{}", hex8(peek.imm8()))
                } else if z == 6 {
                    format!("{op}(HL)  ; (HL)={}", hex8(peek.byte_at(regs.hl())))
                } else {
                    format!("{op}{}", R8[usize::from(z)])
                }
            }
            Instruction::PushPop => {
                let op = if opcode & 0x04 == 0 { "POP" } else { "PUSH" };
                format!("{op} {}", RP_STACK[usize::from(p)])
            }
            Instruction::Ret => {
                let text = match opcode {
                    0xC9 => "RET".to_string(),
                    0xD9 => "RETI".to_string(),
                    _ => format!("RET {cc}"),
                };
                format!("{text}  ; (SP)={}", hex16(peek.word_at(regs.sp)))
            }
            Instruction::Rst => format!("RST 0x{:02X}", opcode & 0x38),
            Instruction::Jp => {
                if opcode == 0xC3 {
                    format!("JP {}", hex16(peek.imm16()))
                } else {
                    format!("JP {cc},{}", hex16(peek.imm16()))
                }
            }
            Instruction::Call => {
                if opcode == 0xCD {
                    format!("CALL {}", hex16(peek.imm16()))
                } else {
                    format!("CALL {cc},{}", hex16(peek.imm16()))
                }
            }
            Instruction::LdA16A => {
                let addr = peek.imm16();
                if opcode == 0xEA {
                    format!("LD ({}),A", hex16(addr))
                } else {
                    let value = addr.and_then(|addr| peek.byte_at(addr));
                    format!("LD A,({})  ; value={}", hex16(addr), hex8(value))
                }
            }
            Instruction::Ldh => match opcode {
                0xE0 => format!("LDH ({}),A", hex16(peek.imm8().map(|n| 0xFF00 | u16::from(n)))),
                0xF0 => format!("LDH A,({})", hex16(peek.imm8().map(|n| 0xFF00 | u16::from(n)))),
                0xE2 => format!("LD (0xFF00+C),A  ; C=0x{:02X}", regs.c),
                _ => format!("LD A,(0xFF00+C)  ; C=0x{:02X}", regs.c),
            },
            Instruction::DiEi => String::from(if opcode == 0xF3 { "DI" } else { "EI" }),
            Instruction::Prefix => format!("PREFIX CB {}", hex8(peek.imm8())),
            Instruction::DaaCpl => String::from(if opcode == 0x27 { "DAA" } else { "CPL" }),
            Instruction::AddHlRr => format!("ADD HL,{}", RP[usize::from(p)]),
            Instruction::SpArith => match opcode {
                0xE8 => format!("ADD SP,{}", signed(peek.imm8())),
                0xF8 => format!("LD HL,SP{}", signed(peek.imm8())),
                _ => "LD SP,HL".to_string(),
            },
            Instruction::JpHl => format!("JP (HL)  ; HL=0x{:04X}", regs.hl()),
            Instruction::Unimplemented => format!("UNIMPLEMENTED 0x{opcode:02X}"),
        }
    }
}

fn signed(value: Option<u8>) -> String {
    value.map_or_else(|| "+??".to_string(), |v| format!("{:+}", v as i8))
}

/// Decoded form of a base-table opcode.
///
/// Each variant is one instruction family. Handlers read the operand fields
/// (register index, pair, condition, ALU op) back out of the opcode itself,
/// so a single variant may stand for many opcode values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `NOP`
    Nop,
    /// `LD (a16),SP`
    LdA16Sp,
    /// `HALT`
    Halt,
    /// `LD r,r'` including the (HL) forms.
    LdRR,
    /// `LD rr,d16`
    LdRrD16,
    /// `LD (BC),A`, `LD (DE),A`, `LD A,(BC)`, `LD A,(DE)`
    LdIndirect,
    /// `INC rr` / `DEC rr`
    IncDecRr,
    /// `INC r` / `DEC r`
    IncDecR,
    /// `RLCA`, `RRCA`, `RLA`, `RRA`
    RotateA,
    /// `STOP`
    Stop,
    /// `JR e` / `JR cc,e`
    Jr,
    /// `LD r,d8`
    LdRD8,
    /// `LD (HL+),A`, `LD (HL-),A`, `LD A,(HL+)`, `LD A,(HL-)`
    LdHlIncDec,
    /// `SCF` / `CCF`
    ScfCcf,
    /// 8-bit ALU on A with a register, (HL) or immediate operand.
    Alu,
    /// `PUSH rr` / `POP rr`
    PushPop,
    /// `RET`, `RET cc`, `RETI`
    Ret,
    /// `RST n`
    Rst,
    /// `JP a16` / `JP cc,a16`
    Jp,
    /// `CALL a16` / `CALL cc,a16`
    Call,
    /// `LD (a16),A` / `LD A,(a16)`
    LdA16A,
    /// `LDH (a8),A`, `LDH A,(a8)`, `LD (C),A`, `LD A,(C)`
    Ldh,
    /// `DI` / `EI`
    DiEi,
    /// `0xCB` prefix; the second byte selects from the extension table.
    Prefix,
    /// `DAA` / `CPL`
    DaaCpl,
    /// `ADD HL,rr`
    AddHlRr,
    /// `ADD SP,e`, `LD HL,SP+e`, `LD SP,HL`
    SpArith,
    /// `JP (HL)`
    JpHl,
    /// Opcode hole. Executing it is fatal.
    Unimplemented,
}

/// Decode one opcode byte.
///
/// The families overlap, so the tests run in a fixed order and the first
/// match wins. Reordering them changes which family claims ambiguous bytes
/// (0x76 would become `LD (HL),(HL)`, for instance).
pub const fn decode(opcode: u8) -> Instruction {
    use Instruction::*;

    match opcode {
        0x00 => return Nop,
        0x08 => return LdA16Sp,
        _ => {}
    }

    if opcode & 0xC0 == 0x40 {
        return if opcode == 0x76 { Halt } else { LdRR };
    }
    if opcode & 0xCF == 0x01 {
        return LdRrD16;
    }
    if opcode & 0xE7 == 0x02 {
        return LdIndirect;
    }
    if opcode & 0xC7 == 0x03 {
        return IncDecRr;
    }
    if opcode & 0xC6 == 0x04 {
        return IncDecR;
    }
    if opcode & 0xE7 == 0x07 {
        return RotateA;
    }
    if opcode == 0x10 {
        return Stop;
    }
    if opcode == 0x18 || opcode & 0xE7 == 0x20 {
        return Jr;
    }
    if opcode & 0xC7 == 0x06 {
        return LdRD8;
    }
    if opcode & 0xE7 == 0x22 {
        return LdHlIncDec;
    }
    if opcode & 0xF7 == 0x37 {
        return ScfCcf;
    }
    if opcode & 0xC7 == 0xC6 || opcode & 0xC0 == 0x80 {
        return Alu;
    }
    if opcode & 0xCB == 0xC1 {
        return PushPop;
    }
    if opcode & 0xE7 == 0xC0 || opcode & 0xEF == 0xC9 {
        return Ret;
    }
    if opcode & 0xC7 == 0xC7 {
        return Rst;
    }
    if opcode == 0xC3 || opcode & 0xE7 == 0xC2 {
        return Jp;
    }
    if opcode == 0xCD || opcode & 0xE7 == 0xC4 {
        return Call;
    }
    // Absolute-address form first; the high-page forms only see what it misses.
    if opcode & 0xEF == 0xEA {
        return LdA16A;
    }
    if opcode & 0xEF == 0xE0 || opcode & 0xEF == 0xE2 {
        return Ldh;
    }
    if opcode & 0xF7 == 0xF3 {
        return DiEi;
    }
    if opcode == 0xCB {
        return Prefix;
    }

    // Families that only cover bytes none of the tests above claim.
    if opcode & 0xF7 == 0x27 {
        return DaaCpl;
    }
    if opcode & 0xCF == 0x09 {
        return AddHlRr;
    }
    if opcode & 0xEF == 0xE8 || opcode == 0xF9 {
        return SpArith;
    }
    if opcode == 0xE9 {
        return JpHl;
    }

    Unimplemented
}

impl Instruction {
    /// Short family name, for logs and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Instruction::Nop => "NOP",
            Instruction::LdA16Sp => "LD (a16),SP",
            Instruction::Halt => "HALT",
            Instruction::LdRR => "LD r,r",
            Instruction::LdRrD16 => "LD rr,d16",
            Instruction::LdIndirect => "LD (rr),A",
            Instruction::IncDecRr => "INC/DEC rr",
            Instruction::IncDecR => "INC/DEC r",
            Instruction::RotateA => "RLCA/RRCA/RLA/RRA",
            Instruction::Stop => "STOP",
            Instruction::Jr => "JR",
            Instruction::LdRD8 => "LD r,d8",
            Instruction::LdHlIncDec => "LD (HL±),A",
            Instruction::ScfCcf => "SCF/CCF",
            Instruction::Alu => "ALU",
            Instruction::PushPop => "PUSH/POP",
            Instruction::Ret => "RET",
            Instruction::Rst => "RST",
            Instruction::Jp => "JP",
            Instruction::Call => "CALL",
            Instruction::LdA16A => "LD (a16),A",
            Instruction::Ldh => "LDH",
            Instruction::DiEi => "DI/EI",
            Instruction::Prefix => "PREFIX CB",
            Instruction::DaaCpl => "DAA/CPL",
            Instruction::AddHlRr => "ADD HL,rr",
            Instruction::SpArith => "SP arithmetic",
            Instruction::JpHl => "JP (HL)",
            Instruction::Unimplemented => "UNIMPLEMENTED",
        }
    }
}

use crate::opcode::Opcode;

/// Modifier opcodes that alter the next instruction instead of standing alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `unaligned.` with an 8-bit alignment operand.
    Unaligned,
    Volatile,
    Tail,
    /// `constrained.` with a type token operand.
    Constrained,
    Readonly,
    /// `no.` with an 8-bit mask of skipped checks.
    No,
}

impl Prefix {
    pub const ALL: [Prefix; 6] = [
        Prefix::Unaligned,
        Prefix::Volatile,
        Prefix::Tail,
        Prefix::Constrained,
        Prefix::Readonly,
        Prefix::No,
    ];

    pub const fn from_opcode(opcode: Opcode) -> Option<Self> {
        Some(match opcode {
            Opcode::UNALIGNED => Prefix::Unaligned,
            Opcode::VOLATILE => Prefix::Volatile,
            Opcode::TAIL => Prefix::Tail,
            Opcode::CONSTRAINED => Prefix::Constrained,
            Opcode::READONLY => Prefix::Readonly,
            Opcode::NO => Prefix::No,
            _ => return None,
        })
    }

    pub const fn opcode(self) -> Opcode {
        match self {
            Prefix::Unaligned => Opcode::UNALIGNED,
            Prefix::Volatile => Opcode::VOLATILE,
            Prefix::Tail => Opcode::TAIL,
            Prefix::Constrained => Opcode::CONSTRAINED,
            Prefix::Readonly => Opcode::READONLY,
            Prefix::No => Opcode::NO,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Prefix::Unaligned => "unaligned.",
            Prefix::Volatile => "volatile.",
            Prefix::Tail => "tail.",
            Prefix::Constrained => "constrained.",
            Prefix::Readonly => "readonly.",
            Prefix::No => "no.",
        }
    }
}

use std::fmt;

use cild_isa::{InstructionKind, Opcode, OperandShape};

use crate::location::SourceLocation;
use crate::metadata::{CallSiteSig, FieldDesc, MemberRef, MethodDesc, TypeDesc};

bitflags::bitflags! {
    /// Modifier flags contributed by prefix opcodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstructionFlags: u16 {
        const UNALIGNED = 1 << 0;
        const VOLATILE = 1 << 1;
        const TAIL_CALL = 1 << 2;
        const CONSTRAINED = 1 << 3;
        const READONLY = 1 << 4;
        const NO_TYPE_CHECK = 1 << 5;
        const NO_RANGE_CHECK = 1 << 6;
        const NO_NULL_CHECK = 1 << 7;
    }
}

impl InstructionFlags {
    /// Flags set by the `no.` prefix.
    pub const NO_CHECKS: Self = Self::NO_TYPE_CHECK
        .union(Self::NO_RANGE_CHECK)
        .union(Self::NO_NULL_CHECK);
}

/// Prefix state attached to one instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagsContext {
    pub flags: InstructionFlags,
    /// Alignment byte of `unaligned.`.
    pub alignment: Option<u8>,
    /// Type operand of `constrained.`.
    pub constrained: Option<TypeDesc>,
}

impl FlagsContext {
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.alignment.is_none() && self.constrained.is_none()
    }
}

impl fmt::Display for FlagsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alignment) = self.alignment {
            write!(f, "unaligned. {alignment} ")?;
        }
        if self.flags.contains(InstructionFlags::VOLATILE) {
            f.write_str("volatile. ")?;
        }
        if self.flags.contains(InstructionFlags::TAIL_CALL) {
            f.write_str("tail. ")?;
        }
        if let Some(ty) = &self.constrained {
            write!(f, "constrained. {ty} ")?;
        }
        if self.flags.contains(InstructionFlags::READONLY) {
            f.write_str("readonly. ")?;
        }
        let checks = self.flags & InstructionFlags::NO_CHECKS;
        if !checks.is_empty() {
            f.write_str("no.")?;
            for (name, _) in checks.iter_names() {
                let check = name.trim_start_matches("NO_").trim_end_matches("_CHECK");
                write!(f, " {}", check.to_ascii_lowercase())?;
            }
            f.write_str(" ")?;
        }
        Ok(())
    }
}

/// Decoded operand of an instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    None,
    /// Signed literal (`ldc.i4`, `ldc.i8`).
    Int(i64),
    /// Unsigned literal (argument and local indices).
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Type(TypeDesc),
    Method(MethodDesc),
    Field(FieldDesc),
    String(String),
    Signature(CallSiteSig),
    /// `ldtoken` member.
    Token(MemberRef),
    /// Absolute branch target offset.
    Target(u32),
    /// Absolute `switch` targets in case order.
    Switch(Vec<u32>),
}

impl Operand {
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    /// Every branch target this operand names.
    pub fn branch_targets(&self) -> &[u32] {
        match self {
            Operand::Target(target) => std::slice::from_ref(target),
            Operand::Switch(targets) => targets,
            _ => &[],
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(v) => write!(f, "{v}"),
            Operand::UInt(v) => write!(f, "{v}"),
            Operand::Float32(v) => write!(f, "{v:?}"),
            Operand::Float64(v) => write!(f, "{v:?}"),
            Operand::Type(ty) => write!(f, "{ty}"),
            Operand::Method(method) => write!(f, "{method}"),
            Operand::Field(field) => write!(f, "{field}"),
            Operand::String(s) => write!(f, "{s:?}"),
            Operand::Signature(sig) => write!(f, "{sig}"),
            Operand::Token(member) => write!(f, "{member}"),
            Operand::Target(target) => write!(f, "IL_{target:04x}"),
            Operand::Switch(targets) => {
                let labels: Vec<String> = targets.iter().map(|t| format!("IL_{t:04x}")).collect();
                write!(f, "({})", labels.join(", "))
            }
        }
    }
}

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// Byte offset of the instruction's first opcode byte (prefixes excluded).
    pub offset: u32,
    pub opcode: Opcode,
    pub kind: InstructionKind,
    pub flags: FlagsContext,
    pub pops: u16,
    pub pushes: u16,
    pub operand: Operand,
    pub location: Option<SourceLocation>,
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        cild_isa::lookup(self.opcode).map_or("<unknown>", |info| info.mnemonic())
    }

    /// Net change in evaluation-stack depth.
    pub fn stack_delta(&self) -> i32 {
        i32::from(self.pushes) - i32::from(self.pops)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IL_{:04x}: {}{}", self.offset, self.flags, self.mnemonic())?;
        // `ldarg.0` and friends already spell their operand.
        let implicit = cild_isa::lookup(self.opcode).is_some_and(|info| {
            matches!(
                info.operand(),
                OperandShape::ImplicitIndex(_) | OperandShape::ImplicitInt(_)
            )
        });
        if !implicit && !self.operand.is_none() {
            write!(f, " {}", self.operand)?;
        }
        Ok(())
    }
}

/// The decoded body of one method.
#[derive(Clone, Debug, PartialEq)]
pub struct DisassembledMethod {
    method: MethodDesc,
    instructions: Vec<Instruction>,
    max_stack: u16,
}

impl DisassembledMethod {
    pub fn new(method: MethodDesc, instructions: Vec<Instruction>, max_stack: u16) -> Self {
        Self {
            method,
            instructions,
            max_stack,
        }
    }

    pub fn method(&self) -> &MethodDesc {
        &self.method
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Declared maximum evaluation-stack depth.
    pub fn max_stack(&self) -> u16 {
        self.max_stack
    }

    /// Instruction starting exactly at `offset`.
    pub fn instruction_at(&self, offset: u32) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&offset, |insn| insn.offset)
            .ok()
            .map(|i| &self.instructions[i])
    }

    pub fn into_parts(self) -> (MethodDesc, Vec<Instruction>, u16) {
        (self.method, self.instructions, self.max_stack)
    }
}

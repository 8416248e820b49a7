//! Semantic instruction kinds.
//!
//! Short and long encodings of the same operation share one kind: `ldarg.0`,
//! `ldarg.s` and `ldarg` all decode to [`InstructionKind::Ldarg`], and the
//! argument index becomes the operand.

/// Primitive element type carried by typed load/store/convert families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    /// Native int.
    I,
    /// Native unsigned int.
    U,
    R4,
    R8,
    /// Float converted from an unsigned integer (`conv.r.un`).
    RUn,
    /// Object reference.
    Ref,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    DivUn,
    Rem,
    RemUn,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    ShrUn,
    AddOvf,
    AddOvfUn,
    MulOvf,
    MulOvfUn,
    SubOvf,
    SubOvfUn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Ceq,
    Cgt,
    CgtUn,
    Clt,
    CltUn,
}

/// Condition of a branch instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchCond {
    Always,
    False,
    True,
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
    NeUn,
    GeUn,
    GtUn,
    LeUn,
    LtUn,
}

/// The closed set of decoded instruction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Nop,
    Break,
    Ldarg,
    Ldarga,
    Starg,
    Ldloc,
    Ldloca,
    Stloc,
    Ldnull,
    LdcI4,
    LdcI8,
    LdcR4,
    LdcR8,
    Dup,
    Pop,
    Call,
    Callvirt,
    Calli,
    Newobj,
    Ret,
    Branch(BranchCond),
    Leave,
    Switch,
    Ldind(ValueKind),
    Stind(ValueKind),
    Binary(BinaryOp),
    Unary(UnaryOp),
    Compare(CompareOp),
    Conv {
        target: ValueKind,
        overflow: bool,
        unsigned_source: bool,
    },
    Cpobj,
    Ldobj,
    Stobj,
    Ldstr,
    Castclass,
    Isinst,
    Box,
    Unbox,
    UnboxAny,
    Throw,
    Rethrow,
    Ldfld,
    Ldflda,
    Stfld,
    Ldsfld,
    Ldsflda,
    Stsfld,
    Newarr,
    Ldlen,
    Ldelema,
    Ldelem(ValueKind),
    Stelem(ValueKind),
    /// `ldelem <type>`
    LdelemAny,
    /// `stelem <type>`
    StelemAny,
    Ckfinite,
    Ldtoken,
    Endfinally,
    Endfilter,
    Localloc,
    Initobj,
    Cpblk,
    Initblk,
    Sizeof,
}

impl InstructionKind {
    /// `call`, `callvirt`, `calli` and `newobj`.
    pub const fn is_call_family(self) -> bool {
        matches!(self, Self::Call | Self::Callvirt | Self::Calli | Self::Newobj)
    }

    /// Kinds whose operand is one or more branch targets.
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Branch(_) | Self::Leave | Self::Switch)
    }

    /// Kinds after which control never falls through to the next instruction.
    pub const fn is_terminator(self) -> bool {
        matches!(
            self,
            Self::Branch(BranchCond::Always)
                | Self::Leave
                | Self::Ret
                | Self::Throw
                | Self::Rethrow
                | Self::Endfinally
                | Self::Endfilter
        )
    }
}

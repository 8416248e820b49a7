//! Static opcode table.
//!
//! Each supported instruction opcode maps to an [`OpcodeInfo`] giving its
//! mnemonic, semantic kind, operand shape and stack effect. Prefix opcodes
//! live in [`crate::prefix`] and are not part of this table. Opcodes that
//! are deliberately absent (`jmp`, `arglist`, `ldftn`, `ldvirtftn` and the
//! typed-reference family) decode as unsupported.

use crate::kind::BranchCond as B;
use crate::kind::InstructionKind as K;
use crate::kind::ValueKind as V;
use crate::kind::{BinaryOp, CompareOp, InstructionKind, UnaryOp, ValueKind};
use crate::opcode::Opcode;

/// How an instruction's operand is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandShape {
    None,
    /// Unsigned index folded into the opcode (`ldarg.0`, `stloc.3`).
    ImplicitIndex(u16),
    /// Signed constant folded into the opcode (`ldc.i4.m1`).
    ImplicitInt(i32),
    Int8,
    UInt8,
    UInt16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Signed 8-bit displacement.
    ShortBranch,
    /// Signed 32-bit displacement.
    LongBranch,
    /// `u32` count followed by that many `i32` displacements.
    Switch,
    TypeToken,
    MethodToken,
    FieldToken,
    StringToken,
    SignatureToken,
    /// Type, method or field token (`ldtoken`).
    MemberToken,
}

impl OperandShape {
    /// Encoded size in bytes, or `None` for the variable-length switch table.
    pub const fn size(self) -> Option<usize> {
        Some(match self {
            Self::None | Self::ImplicitIndex(_) | Self::ImplicitInt(_) => 0,
            Self::Int8 | Self::UInt8 | Self::ShortBranch => 1,
            Self::UInt16 => 2,
            Self::Int32
            | Self::Float32
            | Self::LongBranch
            | Self::TypeToken
            | Self::MethodToken
            | Self::FieldToken
            | Self::StringToken
            | Self::SignatureToken
            | Self::MemberToken => 4,
            Self::Int64 | Self::Float64 => 8,
            Self::Switch => return None,
        })
    }

    pub const fn is_token(self) -> bool {
        matches!(
            self,
            Self::TypeToken
                | Self::MethodToken
                | Self::FieldToken
                | Self::StringToken
                | Self::SignatureToken
                | Self::MemberToken
        )
    }
}

/// Evaluation-stack effect of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackEffect {
    Fixed { pops: u8, pushes: u8 },
    /// Depends on the resolved callee signature.
    Call,
    /// Pops the return value when the enclosing method returns one.
    Return,
}

/// Metadata for one instruction opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    opcode: Opcode,
    mnemonic: &'static str,
    kind: InstructionKind,
    operand: OperandShape,
    stack: StackEffect,
}

impl OpcodeInfo {
    #[inline]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub const fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    #[inline]
    pub const fn kind(&self) -> InstructionKind {
        self.kind
    }

    #[inline]
    pub const fn operand(&self) -> OperandShape {
        self.operand
    }

    #[inline]
    pub const fn stack(&self) -> StackEffect {
        self.stack
    }
}

const fn fixed(pops: u8, pushes: u8) -> StackEffect {
    StackEffect::Fixed { pops, pushes }
}

const fn one(
    byte: u8,
    mnemonic: &'static str,
    kind: InstructionKind,
    operand: OperandShape,
    stack: StackEffect,
) -> OpcodeInfo {
    OpcodeInfo {
        opcode: Opcode::one_byte(byte),
        mnemonic,
        kind,
        operand,
        stack,
    }
}

const fn ext(
    byte: u8,
    mnemonic: &'static str,
    kind: InstructionKind,
    operand: OperandShape,
    stack: StackEffect,
) -> OpcodeInfo {
    OpcodeInfo {
        opcode: Opcode::extended(byte),
        mnemonic,
        kind,
        operand,
        stack,
    }
}

const fn conv(target: ValueKind) -> InstructionKind {
    InstructionKind::Conv {
        target,
        overflow: false,
        unsigned_source: false,
    }
}

const fn conv_ovf(target: ValueKind) -> InstructionKind {
    InstructionKind::Conv {
        target,
        overflow: true,
        unsigned_source: false,
    }
}

const fn conv_ovf_un(target: ValueKind) -> InstructionKind {
    InstructionKind::Conv {
        target,
        overflow: true,
        unsigned_source: true,
    }
}

use self::OperandShape as S;

#[rustfmt::skip]
const OPCODES: &[OpcodeInfo] = &[
    one(0x00, "nop",        K::Nop,    S::None, fixed(0, 0)),
    one(0x01, "break",      K::Break,  S::None, fixed(0, 0)),
    one(0x02, "ldarg.0",    K::Ldarg,  S::ImplicitIndex(0), fixed(0, 1)),
    one(0x03, "ldarg.1",    K::Ldarg,  S::ImplicitIndex(1), fixed(0, 1)),
    one(0x04, "ldarg.2",    K::Ldarg,  S::ImplicitIndex(2), fixed(0, 1)),
    one(0x05, "ldarg.3",    K::Ldarg,  S::ImplicitIndex(3), fixed(0, 1)),
    one(0x06, "ldloc.0",    K::Ldloc,  S::ImplicitIndex(0), fixed(0, 1)),
    one(0x07, "ldloc.1",    K::Ldloc,  S::ImplicitIndex(1), fixed(0, 1)),
    one(0x08, "ldloc.2",    K::Ldloc,  S::ImplicitIndex(2), fixed(0, 1)),
    one(0x09, "ldloc.3",    K::Ldloc,  S::ImplicitIndex(3), fixed(0, 1)),
    one(0x0A, "stloc.0",    K::Stloc,  S::ImplicitIndex(0), fixed(1, 0)),
    one(0x0B, "stloc.1",    K::Stloc,  S::ImplicitIndex(1), fixed(1, 0)),
    one(0x0C, "stloc.2",    K::Stloc,  S::ImplicitIndex(2), fixed(1, 0)),
    one(0x0D, "stloc.3",    K::Stloc,  S::ImplicitIndex(3), fixed(1, 0)),
    one(0x0E, "ldarg.s",    K::Ldarg,  S::UInt8, fixed(0, 1)),
    one(0x0F, "ldarga.s",   K::Ldarga, S::UInt8, fixed(0, 1)),
    one(0x10, "starg.s",    K::Starg,  S::UInt8, fixed(1, 0)),
    one(0x11, "ldloc.s",    K::Ldloc,  S::UInt8, fixed(0, 1)),
    one(0x12, "ldloca.s",   K::Ldloca, S::UInt8, fixed(0, 1)),
    one(0x13, "stloc.s",    K::Stloc,  S::UInt8, fixed(1, 0)),
    one(0x14, "ldnull",     K::Ldnull, S::None, fixed(0, 1)),
    one(0x15, "ldc.i4.m1",  K::LdcI4,  S::ImplicitInt(-1), fixed(0, 1)),
    one(0x16, "ldc.i4.0",   K::LdcI4,  S::ImplicitInt(0), fixed(0, 1)),
    one(0x17, "ldc.i4.1",   K::LdcI4,  S::ImplicitInt(1), fixed(0, 1)),
    one(0x18, "ldc.i4.2",   K::LdcI4,  S::ImplicitInt(2), fixed(0, 1)),
    one(0x19, "ldc.i4.3",   K::LdcI4,  S::ImplicitInt(3), fixed(0, 1)),
    one(0x1A, "ldc.i4.4",   K::LdcI4,  S::ImplicitInt(4), fixed(0, 1)),
    one(0x1B, "ldc.i4.5",   K::LdcI4,  S::ImplicitInt(5), fixed(0, 1)),
    one(0x1C, "ldc.i4.6",   K::LdcI4,  S::ImplicitInt(6), fixed(0, 1)),
    one(0x1D, "ldc.i4.7",   K::LdcI4,  S::ImplicitInt(7), fixed(0, 1)),
    one(0x1E, "ldc.i4.8",   K::LdcI4,  S::ImplicitInt(8), fixed(0, 1)),
    one(0x1F, "ldc.i4.s",   K::LdcI4,  S::Int8, fixed(0, 1)),
    one(0x20, "ldc.i4",     K::LdcI4,  S::Int32, fixed(0, 1)),
    one(0x21, "ldc.i8",     K::LdcI8,  S::Int64, fixed(0, 1)),
    one(0x22, "ldc.r4",     K::LdcR4,  S::Float32, fixed(0, 1)),
    one(0x23, "ldc.r8",     K::LdcR8,  S::Float64, fixed(0, 1)),
    one(0x25, "dup",        K::Dup,    S::None, fixed(1, 2)),
    one(0x26, "pop",        K::Pop,    S::None, fixed(1, 0)),
    one(0x28, "call",       K::Call,   S::MethodToken, StackEffect::Call),
    one(0x29, "calli",      K::Calli,  S::SignatureToken, StackEffect::Call),
    one(0x2A, "ret",        K::Ret,    S::None, StackEffect::Return),

    one(0x2B, "br.s",       K::Branch(B::Always), S::ShortBranch, fixed(0, 0)),
    one(0x2C, "brfalse.s",  K::Branch(B::False),  S::ShortBranch, fixed(1, 0)),
    one(0x2D, "brtrue.s",   K::Branch(B::True),   S::ShortBranch, fixed(1, 0)),
    one(0x2E, "beq.s",      K::Branch(B::Eq),     S::ShortBranch, fixed(2, 0)),
    one(0x2F, "bge.s",      K::Branch(B::Ge),     S::ShortBranch, fixed(2, 0)),
    one(0x30, "bgt.s",      K::Branch(B::Gt),     S::ShortBranch, fixed(2, 0)),
    one(0x31, "ble.s",      K::Branch(B::Le),     S::ShortBranch, fixed(2, 0)),
    one(0x32, "blt.s",      K::Branch(B::Lt),     S::ShortBranch, fixed(2, 0)),
    one(0x33, "bne.un.s",   K::Branch(B::NeUn),   S::ShortBranch, fixed(2, 0)),
    one(0x34, "bge.un.s",   K::Branch(B::GeUn),   S::ShortBranch, fixed(2, 0)),
    one(0x35, "bgt.un.s",   K::Branch(B::GtUn),   S::ShortBranch, fixed(2, 0)),
    one(0x36, "ble.un.s",   K::Branch(B::LeUn),   S::ShortBranch, fixed(2, 0)),
    one(0x37, "blt.un.s",   K::Branch(B::LtUn),   S::ShortBranch, fixed(2, 0)),
    one(0x38, "br",         K::Branch(B::Always), S::LongBranch, fixed(0, 0)),
    one(0x39, "brfalse",    K::Branch(B::False),  S::LongBranch, fixed(1, 0)),
    one(0x3A, "brtrue",     K::Branch(B::True),   S::LongBranch, fixed(1, 0)),
    one(0x3B, "beq",        K::Branch(B::Eq),     S::LongBranch, fixed(2, 0)),
    one(0x3C, "bge",        K::Branch(B::Ge),     S::LongBranch, fixed(2, 0)),
    one(0x3D, "bgt",        K::Branch(B::Gt),     S::LongBranch, fixed(2, 0)),
    one(0x3E, "ble",        K::Branch(B::Le),     S::LongBranch, fixed(2, 0)),
    one(0x3F, "blt",        K::Branch(B::Lt),     S::LongBranch, fixed(2, 0)),
    one(0x40, "bne.un",     K::Branch(B::NeUn),   S::LongBranch, fixed(2, 0)),
    one(0x41, "bge.un",     K::Branch(B::GeUn),   S::LongBranch, fixed(2, 0)),
    one(0x42, "bgt.un",     K::Branch(B::GtUn),   S::LongBranch, fixed(2, 0)),
    one(0x43, "ble.un",     K::Branch(B::LeUn),   S::LongBranch, fixed(2, 0)),
    one(0x44, "blt.un",     K::Branch(B::LtUn),   S::LongBranch, fixed(2, 0)),
    one(0x45, "switch",     K::Switch, S::Switch, fixed(1, 0)),

    one(0x46, "ldind.i1",   K::Ldind(V::I1),  S::None, fixed(1, 1)),
    one(0x47, "ldind.u1",   K::Ldind(V::U1),  S::None, fixed(1, 1)),
    one(0x48, "ldind.i2",   K::Ldind(V::I2),  S::None, fixed(1, 1)),
    one(0x49, "ldind.u2",   K::Ldind(V::U2),  S::None, fixed(1, 1)),
    one(0x4A, "ldind.i4",   K::Ldind(V::I4),  S::None, fixed(1, 1)),
    one(0x4B, "ldind.u4",   K::Ldind(V::U4),  S::None, fixed(1, 1)),
    one(0x4C, "ldind.i8",   K::Ldind(V::I8),  S::None, fixed(1, 1)),
    one(0x4D, "ldind.i",    K::Ldind(V::I),   S::None, fixed(1, 1)),
    one(0x4E, "ldind.r4",   K::Ldind(V::R4),  S::None, fixed(1, 1)),
    one(0x4F, "ldind.r8",   K::Ldind(V::R8),  S::None, fixed(1, 1)),
    one(0x50, "ldind.ref",  K::Ldind(V::Ref), S::None, fixed(1, 1)),
    one(0x51, "stind.ref",  K::Stind(V::Ref), S::None, fixed(2, 0)),
    one(0x52, "stind.i1",   K::Stind(V::I1),  S::None, fixed(2, 0)),
    one(0x53, "stind.i2",   K::Stind(V::I2),  S::None, fixed(2, 0)),
    one(0x54, "stind.i4",   K::Stind(V::I4),  S::None, fixed(2, 0)),
    one(0x55, "stind.i8",   K::Stind(V::I8),  S::None, fixed(2, 0)),
    one(0x56, "stind.r4",   K::Stind(V::R4),  S::None, fixed(2, 0)),
    one(0x57, "stind.r8",   K::Stind(V::R8),  S::None, fixed(2, 0)),

    one(0x58, "add",        K::Binary(BinaryOp::Add),   S::None, fixed(2, 1)),
    one(0x59, "sub",        K::Binary(BinaryOp::Sub),   S::None, fixed(2, 1)),
    one(0x5A, "mul",        K::Binary(BinaryOp::Mul),   S::None, fixed(2, 1)),
    one(0x5B, "div",        K::Binary(BinaryOp::Div),   S::None, fixed(2, 1)),
    one(0x5C, "div.un",     K::Binary(BinaryOp::DivUn), S::None, fixed(2, 1)),
    one(0x5D, "rem",        K::Binary(BinaryOp::Rem),   S::None, fixed(2, 1)),
    one(0x5E, "rem.un",     K::Binary(BinaryOp::RemUn), S::None, fixed(2, 1)),
    one(0x5F, "and",        K::Binary(BinaryOp::And),   S::None, fixed(2, 1)),
    one(0x60, "or",         K::Binary(BinaryOp::Or),    S::None, fixed(2, 1)),
    one(0x61, "xor",        K::Binary(BinaryOp::Xor),   S::None, fixed(2, 1)),
    one(0x62, "shl",        K::Binary(BinaryOp::Shl),   S::None, fixed(2, 1)),
    one(0x63, "shr",        K::Binary(BinaryOp::Shr),   S::None, fixed(2, 1)),
    one(0x64, "shr.un",     K::Binary(BinaryOp::ShrUn), S::None, fixed(2, 1)),
    one(0x65, "neg",        K::Unary(UnaryOp::Neg),     S::None, fixed(1, 1)),
    one(0x66, "not",        K::Unary(UnaryOp::Not),     S::None, fixed(1, 1)),
    one(0x67, "conv.i1",    conv(V::I1), S::None, fixed(1, 1)),
    one(0x68, "conv.i2",    conv(V::I2), S::None, fixed(1, 1)),
    one(0x69, "conv.i4",    conv(V::I4), S::None, fixed(1, 1)),
    one(0x6A, "conv.i8",    conv(V::I8), S::None, fixed(1, 1)),
    one(0x6B, "conv.r4",    conv(V::R4), S::None, fixed(1, 1)),
    one(0x6C, "conv.r8",    conv(V::R8), S::None, fixed(1, 1)),
    one(0x6D, "conv.u4",    conv(V::U4), S::None, fixed(1, 1)),
    one(0x6E, "conv.u8",    conv(V::U8), S::None, fixed(1, 1)),

    one(0x6F, "callvirt",   K::Callvirt,  S::MethodToken, StackEffect::Call),
    one(0x70, "cpobj",      K::Cpobj,     S::TypeToken, fixed(2, 0)),
    one(0x71, "ldobj",      K::Ldobj,     S::TypeToken, fixed(1, 1)),
    one(0x72, "ldstr",      K::Ldstr,     S::StringToken, fixed(0, 1)),
    one(0x73, "newobj",     K::Newobj,    S::MethodToken, StackEffect::Call),
    one(0x74, "castclass",  K::Castclass, S::TypeToken, fixed(1, 1)),
    one(0x75, "isinst",     K::Isinst,    S::TypeToken, fixed(1, 1)),
    one(0x76, "conv.r.un",  conv(V::RUn), S::None, fixed(1, 1)),
    one(0x79, "unbox",      K::Unbox,     S::TypeToken, fixed(1, 1)),
    one(0x7A, "throw",      K::Throw,     S::None, fixed(1, 0)),
    one(0x7B, "ldfld",      K::Ldfld,     S::FieldToken, fixed(1, 1)),
    one(0x7C, "ldflda",     K::Ldflda,    S::FieldToken, fixed(1, 1)),
    one(0x7D, "stfld",      K::Stfld,     S::FieldToken, fixed(2, 0)),
    one(0x7E, "ldsfld",     K::Ldsfld,    S::FieldToken, fixed(0, 1)),
    one(0x7F, "ldsflda",    K::Ldsflda,   S::FieldToken, fixed(0, 1)),
    one(0x80, "stsfld",     K::Stsfld,    S::FieldToken, fixed(1, 0)),
    one(0x81, "stobj",      K::Stobj,     S::TypeToken, fixed(2, 0)),

    one(0x82, "conv.ovf.i1.un", conv_ovf_un(V::I1), S::None, fixed(1, 1)),
    one(0x83, "conv.ovf.i2.un", conv_ovf_un(V::I2), S::None, fixed(1, 1)),
    one(0x84, "conv.ovf.i4.un", conv_ovf_un(V::I4), S::None, fixed(1, 1)),
    one(0x85, "conv.ovf.i8.un", conv_ovf_un(V::I8), S::None, fixed(1, 1)),
    one(0x86, "conv.ovf.u1.un", conv_ovf_un(V::U1), S::None, fixed(1, 1)),
    one(0x87, "conv.ovf.u2.un", conv_ovf_un(V::U2), S::None, fixed(1, 1)),
    one(0x88, "conv.ovf.u4.un", conv_ovf_un(V::U4), S::None, fixed(1, 1)),
    one(0x89, "conv.ovf.u8.un", conv_ovf_un(V::U8), S::None, fixed(1, 1)),
    one(0x8A, "conv.ovf.i.un",  conv_ovf_un(V::I),  S::None, fixed(1, 1)),
    one(0x8B, "conv.ovf.u.un",  conv_ovf_un(V::U),  S::None, fixed(1, 1)),

    one(0x8C, "box",        K::Box,     S::TypeToken, fixed(1, 1)),
    one(0x8D, "newarr",     K::Newarr,  S::TypeToken, fixed(1, 1)),
    one(0x8E, "ldlen",      K::Ldlen,   S::None, fixed(1, 1)),
    one(0x8F, "ldelema",    K::Ldelema, S::TypeToken, fixed(2, 1)),
    one(0x90, "ldelem.i1",  K::Ldelem(V::I1),  S::None, fixed(2, 1)),
    one(0x91, "ldelem.u1",  K::Ldelem(V::U1),  S::None, fixed(2, 1)),
    one(0x92, "ldelem.i2",  K::Ldelem(V::I2),  S::None, fixed(2, 1)),
    one(0x93, "ldelem.u2",  K::Ldelem(V::U2),  S::None, fixed(2, 1)),
    one(0x94, "ldelem.i4",  K::Ldelem(V::I4),  S::None, fixed(2, 1)),
    one(0x95, "ldelem.u4",  K::Ldelem(V::U4),  S::None, fixed(2, 1)),
    one(0x96, "ldelem.i8",  K::Ldelem(V::I8),  S::None, fixed(2, 1)),
    one(0x97, "ldelem.i",   K::Ldelem(V::I),   S::None, fixed(2, 1)),
    one(0x98, "ldelem.r4",  K::Ldelem(V::R4),  S::None, fixed(2, 1)),
    one(0x99, "ldelem.r8",  K::Ldelem(V::R8),  S::None, fixed(2, 1)),
    one(0x9A, "ldelem.ref", K::Ldelem(V::Ref), S::None, fixed(2, 1)),
    one(0x9B, "stelem.i",   K::Stelem(V::I),   S::None, fixed(3, 0)),
    one(0x9C, "stelem.i1",  K::Stelem(V::I1),  S::None, fixed(3, 0)),
    one(0x9D, "stelem.i2",  K::Stelem(V::I2),  S::None, fixed(3, 0)),
    one(0x9E, "stelem.i4",  K::Stelem(V::I4),  S::None, fixed(3, 0)),
    one(0x9F, "stelem.i8",  K::Stelem(V::I8),  S::None, fixed(3, 0)),
    one(0xA0, "stelem.r4",  K::Stelem(V::R4),  S::None, fixed(3, 0)),
    one(0xA1, "stelem.r8",  K::Stelem(V::R8),  S::None, fixed(3, 0)),
    one(0xA2, "stelem.ref", K::Stelem(V::Ref), S::None, fixed(3, 0)),
    one(0xA3, "ldelem",     K::LdelemAny, S::TypeToken, fixed(2, 1)),
    one(0xA4, "stelem",     K::StelemAny, S::TypeToken, fixed(3, 0)),
    one(0xA5, "unbox.any",  K::UnboxAny,  S::TypeToken, fixed(1, 1)),

    one(0xB3, "conv.ovf.i1", conv_ovf(V::I1), S::None, fixed(1, 1)),
    one(0xB4, "conv.ovf.u1", conv_ovf(V::U1), S::None, fixed(1, 1)),
    one(0xB5, "conv.ovf.i2", conv_ovf(V::I2), S::None, fixed(1, 1)),
    one(0xB6, "conv.ovf.u2", conv_ovf(V::U2), S::None, fixed(1, 1)),
    one(0xB7, "conv.ovf.i4", conv_ovf(V::I4), S::None, fixed(1, 1)),
    one(0xB8, "conv.ovf.u4", conv_ovf(V::U4), S::None, fixed(1, 1)),
    one(0xB9, "conv.ovf.i8", conv_ovf(V::I8), S::None, fixed(1, 1)),
    one(0xBA, "conv.ovf.u8", conv_ovf(V::U8), S::None, fixed(1, 1)),
    one(0xC3, "ckfinite",    K::Ckfinite, S::None, fixed(1, 1)),
    one(0xD0, "ldtoken",     K::Ldtoken,  S::MemberToken, fixed(0, 1)),
    one(0xD1, "conv.u2",     conv(V::U2), S::None, fixed(1, 1)),
    one(0xD2, "conv.u1",     conv(V::U1), S::None, fixed(1, 1)),
    one(0xD3, "conv.i",      conv(V::I),  S::None, fixed(1, 1)),
    one(0xD4, "conv.ovf.i",  conv_ovf(V::I), S::None, fixed(1, 1)),
    one(0xD5, "conv.ovf.u",  conv_ovf(V::U), S::None, fixed(1, 1)),
    one(0xD6, "add.ovf",     K::Binary(BinaryOp::AddOvf),   S::None, fixed(2, 1)),
    one(0xD7, "add.ovf.un",  K::Binary(BinaryOp::AddOvfUn), S::None, fixed(2, 1)),
    one(0xD8, "mul.ovf",     K::Binary(BinaryOp::MulOvf),   S::None, fixed(2, 1)),
    one(0xD9, "mul.ovf.un",  K::Binary(BinaryOp::MulOvfUn), S::None, fixed(2, 1)),
    one(0xDA, "sub.ovf",     K::Binary(BinaryOp::SubOvf),   S::None, fixed(2, 1)),
    one(0xDB, "sub.ovf.un",  K::Binary(BinaryOp::SubOvfUn), S::None, fixed(2, 1)),
    one(0xDC, "endfinally",  K::Endfinally, S::None, fixed(0, 0)),
    one(0xDD, "leave",       K::Leave, S::LongBranch, fixed(0, 0)),
    one(0xDE, "leave.s",     K::Leave, S::ShortBranch, fixed(0, 0)),
    one(0xDF, "stind.i",     K::Stind(V::I), S::None, fixed(2, 0)),
    one(0xE0, "conv.u",      conv(V::U), S::None, fixed(1, 1)),

    ext(0x01, "ceq",       K::Compare(CompareOp::Ceq),   S::None, fixed(2, 1)),
    ext(0x02, "cgt",       K::Compare(CompareOp::Cgt),   S::None, fixed(2, 1)),
    ext(0x03, "cgt.un",    K::Compare(CompareOp::CgtUn), S::None, fixed(2, 1)),
    ext(0x04, "clt",       K::Compare(CompareOp::Clt),   S::None, fixed(2, 1)),
    ext(0x05, "clt.un",    K::Compare(CompareOp::CltUn), S::None, fixed(2, 1)),
    ext(0x09, "ldarg",     K::Ldarg,  S::UInt16, fixed(0, 1)),
    ext(0x0A, "ldarga",    K::Ldarga, S::UInt16, fixed(0, 1)),
    ext(0x0B, "starg",     K::Starg,  S::UInt16, fixed(1, 0)),
    ext(0x0C, "ldloc",     K::Ldloc,  S::UInt16, fixed(0, 1)),
    ext(0x0D, "ldloca",    K::Ldloca, S::UInt16, fixed(0, 1)),
    ext(0x0E, "stloc",     K::Stloc,  S::UInt16, fixed(1, 0)),
    ext(0x0F, "localloc",  K::Localloc,  S::None, fixed(1, 1)),
    ext(0x11, "endfilter", K::Endfilter, S::None, fixed(1, 0)),
    ext(0x15, "initobj",   K::Initobj,   S::TypeToken, fixed(1, 0)),
    ext(0x17, "cpblk",     K::Cpblk,     S::None, fixed(3, 0)),
    ext(0x18, "initblk",   K::Initblk,   S::None, fixed(3, 0)),
    ext(0x1A, "rethrow",   K::Rethrow,   S::None, fixed(0, 0)),
    ext(0x1C, "sizeof",    K::Sizeof,    S::TypeToken, fixed(0, 1)),
];

const MISSING: u8 = u8::MAX;

const fn build_index(extended: bool) -> [u8; 256] {
    let mut index = [MISSING; 256];
    let mut i = 0;
    while i < OPCODES.len() {
        let opcode = OPCODES[i].opcode;
        if opcode.is_extended() == extended {
            index[opcode.table_byte() as usize] = i as u8;
        }
        i += 1;
    }
    index
}

static ONE_BYTE_INDEX: [u8; 256] = build_index(false);
static EXTENDED_INDEX: [u8; 256] = build_index(true);

/// Every instruction opcode in the table, one-byte opcodes first.
pub fn opcode_table() -> &'static [OpcodeInfo] {
    OPCODES
}

/// Look up the instruction metadata for `opcode`.
///
/// Returns `None` for prefixes, reserved values and unsupported opcodes.
pub fn lookup(opcode: Opcode) -> Option<&'static OpcodeInfo> {
    let index = if opcode.is_extended() {
        if opcode.raw() >> 8 != crate::opcode::ESCAPE as u16 {
            return None;
        }
        &EXTENDED_INDEX
    } else {
        &ONE_BYTE_INDEX
    };
    match index[opcode.table_byte() as usize] {
        MISSING => None,
        i => OPCODES.get(i as usize),
    }
}

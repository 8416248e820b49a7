//! CIL (ECMA-335) instruction set definitions.
//!
//! This crate provides the bounds-checked [`ByteCursor`], opcode identifiers
//! and the [`classify`] function that reads them, and the static opcode table
//! mapping each identifier to its semantic kind, operand shape and stack
//! effect.

pub mod cursor;
pub mod kind;
pub mod opcode;
pub mod prefix;
pub mod table;

pub use cursor::{ByteCursor, ReadError};
pub use kind::{BinaryOp, BranchCond, CompareOp, InstructionKind, UnaryOp, ValueKind};
pub use opcode::{ESCAPE, Opcode, classify};
pub use prefix::Prefix;
pub use table::{OpcodeInfo, OperandShape, StackEffect, lookup, opcode_table};

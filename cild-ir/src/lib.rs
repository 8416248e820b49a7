//! Decoded-method data model shared by the decoder and its consumers.

pub mod instruction;
pub mod location;
pub mod metadata;

pub use instruction::{DisassembledMethod, FlagsContext, Instruction, InstructionFlags, Operand};
pub use location::SourceLocation;
pub use metadata::{CallSiteSig, FieldDesc, MemberRef, MethodDesc, Token, TypeDesc};

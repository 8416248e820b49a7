//! Resolved metadata descriptors.
//!
//! These are the values a metadata resolver hands back for a token. The
//! decoder only inspects parameter counts, return types and staticness; the
//! rest is carried through to the decoded instructions.

use std::fmt;

/// A 32-bit metadata token: table id in the high byte, row in the low 24 bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    pub const TYPE_REF: u8 = 0x01;
    pub const TYPE_DEF: u8 = 0x02;
    pub const FIELD: u8 = 0x04;
    pub const METHOD_DEF: u8 = 0x06;
    pub const MEMBER_REF: u8 = 0x0A;
    pub const STAND_ALONE_SIG: u8 = 0x11;
    pub const TYPE_SPEC: u8 = 0x1B;
    pub const METHOD_SPEC: u8 = 0x2B;
    pub const USER_STRING: u8 = 0x70;

    #[inline]
    pub const fn new(table: u8, row: u32) -> Self {
        Self(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    #[inline]
    pub const fn table(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn row(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({self})")
    }
}

impl From<u32> for Token {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// A resolved type, possibly a generic instantiation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    pub name: String,
    pub generic_args: Vec<TypeDesc>,
}

impl TypeDesc {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, generic_args: Vec<TypeDesc>) -> Self {
        Self {
            name: name.into(),
            generic_args,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.generic_args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// A resolved method or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDesc {
    pub declaring_type: TypeDesc,
    pub name: String,
    pub parameters: Vec<TypeDesc>,
    /// `None` for `void`.
    pub return_type: Option<TypeDesc>,
    pub is_static: bool,
    pub generic_args: Vec<TypeDesc>,
}

impl MethodDesc {
    pub const CONSTRUCTOR: &'static str = ".ctor";
    pub const TYPE_INITIALIZER: &'static str = ".cctor";

    /// Instance or static constructor.
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR || self.name == Self::TYPE_INITIALIZER
    }

    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Display for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_static {
            f.write_str("instance ")?;
        }
        match &self.return_type {
            Some(ty) => write!(f, "{ty} ")?,
            None => f.write_str("void ")?,
        }
        write!(f, "{}::{}", self.declaring_type, self.name)?;
        if !self.generic_args.is_empty() {
            let args: Vec<String> = self.generic_args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        write!(f, "({})", params.join(", "))
    }
}

/// A resolved field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    pub declaring_type: TypeDesc,
    pub name: String,
    pub field_type: TypeDesc,
    pub is_static: bool,
}

impl fmt::Display for FieldDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}::{}", self.field_type, self.declaring_type, self.name)
    }
}

/// A stand-alone call-site signature, the operand of `calli`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSiteSig {
    pub parameters: Vec<TypeDesc>,
    pub return_type: Option<TypeDesc>,
    /// The callee takes an implicit `this` argument.
    pub has_this: bool,
}

impl fmt::Display for CallSiteSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_this {
            f.write_str("instance ")?;
        }
        match &self.return_type {
            Some(ty) => write!(f, "{ty}")?,
            None => f.write_str("void")?,
        }
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        write!(f, "({})", params.join(", "))
    }
}

/// Any member an `ldtoken` operand can name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberRef {
    Type(TypeDesc),
    Method(MethodDesc),
    Field(FieldDesc),
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::Type(ty) => write!(f, "{ty}"),
            MemberRef::Method(method) => write!(f, "method {method}"),
            MemberRef::Field(field) => write!(f, "field {field}"),
        }
    }
}

//! Serde view of a module description, before validation.

use serde::Deserialize;

use cild_ir::Token;

use crate::error::{Error, Result};

/// A token written either as a YAML integer or as a `"0x..."` string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
    Number(u32),
    Text(String),
}

impl RawToken {
    pub fn parse(&self) -> Result<Token> {
        match self {
            RawToken::Number(raw) => Ok(Token(*raw)),
            RawToken::Text(text) => {
                let trimmed = text.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u32::from_str_radix(hex, 16),
                    None => trimmed.parse(),
                };
                parsed
                    .map(Token)
                    .map_err(|_| Error::InvalidToken(text.clone()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDoc {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeDoc>,
    #[serde(default)]
    pub type_specs: Vec<TypeSpecDoc>,
    #[serde(default)]
    pub methods: Vec<MethodDoc>,
    #[serde(default)]
    pub member_refs: Vec<MethodDoc>,
    #[serde(default)]
    pub method_specs: Vec<MethodSpecDoc>,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
    #[serde(default)]
    pub strings: Vec<StringDoc>,
    #[serde(default)]
    pub signatures: Vec<SignatureDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDoc {
    pub token: RawToken,
    pub name: String,
    #[serde(default)]
    pub generic_params: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpecDoc {
    pub token: RawToken,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDoc {
    pub token: RawToken,
    pub declaring_type: String,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Absent for `void`.
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub generic_params: usize,
    #[serde(default)]
    pub body: Option<BodyDoc>,
}

fn default_max_stack() -> u16 {
    8
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyDoc {
    #[serde(default = "default_max_stack")]
    pub max_stack: u16,
    /// Hex bytes, whitespace ignored.
    pub il: String,
    #[serde(default)]
    pub sequence_points: Vec<SequencePointDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequencePointDoc {
    pub offset: u32,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub end_line: Option<u32>,
    #[serde(default)]
    pub end_column: Option<u32>,
    /// Compiler-generated code with no source line.
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpecDoc {
    pub token: RawToken,
    pub method: RawToken,
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDoc {
    pub token: RawToken,
    pub declaring_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringDoc {
    pub token: RawToken,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureDoc {
    pub token: RawToken,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub has_this: bool,
}

/// Decode whitespace-separated hex into bytes.
pub fn parse_hex(text: &str) -> std::result::Result<Vec<u8>, String> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_digit(pair[0]);
            let lo = hex_digit(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(format!(
                    "invalid hex byte {:?}",
                    String::from_utf8_lossy(pair)
                )),
            }
        })
        .collect()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

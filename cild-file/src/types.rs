//! Type-name expressions.
//!
//! Module descriptions spell types as text: `System.Int32`,
//! ``System.Collections.Generic.List`1<!!0>``. `!N` names the N-th type
//! parameter of the declaring type and `!!N` the N-th method type
//! parameter; both are substituted when a token is resolved.

use std::str::FromStr;

use cild_decoder::GenericContext;
use cild_ir::TypeDesc;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Named { name: String, args: Vec<TypeExpr> },
    /// `!N`
    TypeParam(usize),
    /// `!!N`
    MethodParam(usize),
}

impl TypeExpr {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser { text, pos: 0 };
        let expr = parser.expr().map_err(|reason| Error::InvalidTypeName {
            name: text.to_string(),
            reason,
        })?;
        parser.skip_ws();
        if parser.pos != text.len() {
            return Err(Error::InvalidTypeName {
                name: text.to_string(),
                reason: "trailing characters",
            });
        }
        Ok(expr)
    }

    /// Substitute generic parameters from `generics`. Parameters the context
    /// does not cover stay as `!N` / `!!N` placeholders.
    pub fn instantiate(&self, generics: GenericContext<'_>) -> TypeDesc {
        match self {
            TypeExpr::Named { name, args } => TypeDesc::generic(
                name.clone(),
                args.iter().map(|arg| arg.instantiate(generics)).collect(),
            ),
            TypeExpr::TypeParam(i) => generics
                .type_args
                .get(*i)
                .cloned()
                .unwrap_or_else(|| TypeDesc::named(format!("!{i}"))),
            TypeExpr::MethodParam(i) => generics
                .method_args
                .get(*i)
                .cloned()
                .unwrap_or_else(|| TypeDesc::named(format!("!!{i}"))),
        }
    }
}

impl FromStr for TypeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

type Step<T> = std::result::Result<T, &'static str>;

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expr(&mut self) -> Step<TypeExpr> {
        self.skip_ws();
        if self.eat(b'!') {
            let method = self.eat(b'!');
            let index = self.index()?;
            return Ok(if method {
                TypeExpr::MethodParam(index)
            } else {
                TypeExpr::TypeParam(index)
            });
        }

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !matches!(b, b'<' | b'>' | b',' | b'!') && !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err("expected a type name");
        }
        let name = self.text[start..self.pos].to_string();

        self.skip_ws();
        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.expr()?);
                self.skip_ws();
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err("expected ',' or '>'");
            }
        }
        Ok(TypeExpr::Named { name, args })
    }

    fn index(&mut self) -> Step<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.text[start..self.pos]
            .parse()
            .map_err(|_| "expected a generic parameter index")
    }
}

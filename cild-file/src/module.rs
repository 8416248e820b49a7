use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use cild_decoder::{
    DecodeOptions, GenericContext, HIDDEN_LINE, MetadataResolver, MethodSource, SequencePoint,
    SequencePointCursor,
};
use cild_ir::{
    CallSiteSig, DisassembledMethod, FieldDesc, MethodDesc, SourceLocation, Token, TypeDesc,
};

use crate::error::{Error, Result};
use crate::schema::{self, MethodDoc, ModuleDoc, SequencePointDoc};
use crate::types::TypeExpr;

/// A method or member-reference signature with unsubstituted generics.
#[derive(Clone, Debug)]
struct MethodSig {
    declaring_type: TypeExpr,
    name: String,
    parameters: Vec<TypeExpr>,
    return_type: Option<TypeExpr>,
    is_static: bool,
    generic_params: usize,
}

impl MethodSig {
    fn from_doc(doc: &MethodDoc) -> Result<Self> {
        Ok(Self {
            declaring_type: doc.declaring_type.parse()?,
            name: doc.name.clone(),
            parameters: parse_all(&doc.parameters)?,
            return_type: doc.return_type.as_deref().map(TypeExpr::parse).transpose()?,
            is_static: doc.is_static,
            generic_params: doc.generic_params,
        })
    }

    fn instantiate(&self, generics: GenericContext<'_>) -> MethodDesc {
        MethodDesc {
            declaring_type: self.declaring_type.instantiate(generics),
            name: self.name.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|p| p.instantiate(generics))
                .collect(),
            return_type: self.return_type.as_ref().map(|r| r.instantiate(generics)),
            is_static: self.is_static,
            generic_args: (0..self.generic_params)
                .map(|i| TypeExpr::MethodParam(i).instantiate(generics))
                .collect(),
        }
    }
}

/// A method defined in the module, with or without an IL body.
#[derive(Clone, Debug)]
pub struct MethodEntry {
    token: Token,
    desc: MethodDesc,
    body: Option<MethodBody>,
}

#[derive(Clone, Debug)]
struct MethodBody {
    il: Vec<u8>,
    max_stack: u16,
    sequence_points: Vec<SequencePoint>,
}

impl MethodEntry {
    pub fn token(&self) -> Token {
        self.token
    }

    /// `Declaring.Type::Name`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.desc.declaring_type, self.desc.name)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Sequence points sorted by offset; empty without debug information.
    pub fn sequence_points(&self) -> &[SequencePoint] {
        self.body
            .as_ref()
            .map(|body| body.sequence_points.as_slice())
            .unwrap_or_default()
    }
}

impl MethodSource for MethodEntry {
    fn method(&self) -> &MethodDesc {
        &self.desc
    }

    fn il_body(&self) -> Option<&[u8]> {
        self.body.as_ref().map(|body| body.il.as_slice())
    }

    fn max_stack(&self) -> u16 {
        self.body.as_ref().map_or(0, |body| body.max_stack)
    }
}

#[derive(Clone, Debug)]
struct TypeEntry {
    name: String,
    generic_params: usize,
}

#[derive(Clone, Debug)]
struct FieldEntry {
    declaring_type: TypeExpr,
    name: String,
    field_type: TypeExpr,
    is_static: bool,
}

#[derive(Clone, Debug)]
struct SignatureEntry {
    parameters: Vec<TypeExpr>,
    return_type: Option<TypeExpr>,
    has_this: bool,
}

#[derive(Clone, Debug)]
struct MethodSpec {
    method: Token,
    args: Vec<TypeExpr>,
}

/// Table sizes of a loaded module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModuleStats {
    pub types: usize,
    pub type_specs: usize,
    pub methods: usize,
    pub method_bodies: usize,
    pub member_refs: usize,
    pub method_specs: usize,
    pub fields: usize,
    pub strings: usize,
    pub signatures: usize,
}

impl fmt::Display for ModuleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "types:        {}", self.types)?;
        writeln!(f, "type specs:   {}", self.type_specs)?;
        writeln!(
            f,
            "methods:      {} ({} with IL)",
            self.methods, self.method_bodies
        )?;
        writeln!(f, "member refs:  {}", self.member_refs)?;
        writeln!(f, "method specs: {}", self.method_specs)?;
        writeln!(f, "fields:       {}", self.fields)?;
        writeln!(f, "strings:      {}", self.strings)?;
        write!(f, "signatures:   {}", self.signatures)
    }
}

/// An in-memory metadata module.
///
/// Placeholders in member signatures are substituted from the generic
/// context of the method being decoded; a method spec replaces the method
/// arguments with its own instantiation.
#[derive(Debug)]
pub struct Module {
    name: String,
    types: HashMap<Token, TypeEntry>,
    type_specs: HashMap<Token, TypeExpr>,
    methods: Vec<MethodEntry>,
    method_sigs: HashMap<Token, MethodSig>,
    member_refs: usize,
    method_specs: HashMap<Token, MethodSpec>,
    fields: HashMap<Token, FieldEntry>,
    strings: HashMap<Token, String>,
    signatures: HashMap<Token, SignatureEntry>,
}

impl Module {
    /// Load a module from a YAML file.
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let doc: ModuleDoc = serde_yaml::from_str(text)?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: ModuleDoc) -> Result<Self> {
        let mut seen = Tokens::default();
        let mut module = Module {
            name: doc.name,
            types: HashMap::new(),
            type_specs: HashMap::new(),
            methods: Vec::new(),
            method_sigs: HashMap::new(),
            member_refs: doc.member_refs.len(),
            method_specs: HashMap::new(),
            fields: HashMap::new(),
            strings: HashMap::new(),
            signatures: HashMap::new(),
        };

        for ty in doc.types {
            let token = seen.claim(ty.token.parse()?)?;
            module.types.insert(
                token,
                TypeEntry {
                    name: ty.name,
                    generic_params: ty.generic_params,
                },
            );
        }
        for spec in doc.type_specs {
            let token = seen.claim(spec.token.parse()?)?;
            module.type_specs.insert(token, spec.ty.parse()?);
        }
        for method in &doc.methods {
            let token = seen.claim(method.token.parse()?)?;
            let sig = MethodSig::from_doc(method)?;
            let desc = sig.instantiate(GenericContext::default());
            let body = method
                .body
                .as_ref()
                .map(|body| -> Result<MethodBody> {
                    let il = schema::parse_hex(&body.il).map_err(|reason| Error::InvalidHex {
                        method: format!("{}::{}", desc.declaring_type, desc.name),
                        reason,
                    })?;
                    let mut sequence_points: Vec<SequencePoint> =
                        body.sequence_points.iter().map(sequence_point).collect();
                    sequence_points.sort_by_key(|point| point.offset);
                    Ok(MethodBody {
                        il,
                        max_stack: body.max_stack,
                        sequence_points,
                    })
                })
                .transpose()?;
            module.methods.push(MethodEntry { token, desc, body });
            module.method_sigs.insert(token, sig);
        }
        for reference in &doc.member_refs {
            let token = seen.claim(reference.token.parse()?)?;
            module
                .method_sigs
                .insert(token, MethodSig::from_doc(reference)?);
        }
        for spec in doc.method_specs {
            let token = seen.claim(spec.token.parse()?)?;
            module.method_specs.insert(
                token,
                MethodSpec {
                    method: spec.method.parse()?,
                    args: parse_all(&spec.args)?,
                },
            );
        }
        for field in doc.fields {
            let token = seen.claim(field.token.parse()?)?;
            module.fields.insert(
                token,
                FieldEntry {
                    declaring_type: field.declaring_type.parse()?,
                    name: field.name,
                    field_type: field.field_type.parse()?,
                    is_static: field.is_static,
                },
            );
        }
        for string in doc.strings {
            let token = seen.claim(string.token.parse()?)?;
            module.strings.insert(token, string.value);
        }
        for sig in doc.signatures {
            let token = seen.claim(sig.token.parse()?)?;
            module.signatures.insert(
                token,
                SignatureEntry {
                    parameters: parse_all(&sig.parameters)?,
                    return_type: sig.return_type.as_deref().map(TypeExpr::parse).transpose()?,
                    has_this: sig.has_this,
                },
            );
        }

        log::debug!(
            "loaded module {} ({} methods, {} tokens)",
            module.name,
            module.methods.len(),
            seen.0.len()
        );
        Ok(module)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods defined in the module, in description order.
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Find a defined method by `Type::Name` or by bare name. A bare name
    /// must be unambiguous.
    pub fn find_method(&self, name: &str) -> Result<&MethodEntry> {
        if let Some(entry) = self.methods.iter().find(|m| m.qualified_name() == name) {
            return Ok(entry);
        }
        let mut matches = self.methods.iter().filter(|m| m.desc.name == name);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            _ => Err(Error::UnknownMethod(name.to_string())),
        }
    }

    pub fn stats(&self) -> ModuleStats {
        ModuleStats {
            types: self.types.len(),
            type_specs: self.type_specs.len(),
            methods: self.methods.len(),
            method_bodies: self.methods.iter().filter(|m| m.has_body()).count(),
            member_refs: self.member_refs,
            method_specs: self.method_specs.len(),
            fields: self.fields.len(),
            strings: self.strings.len(),
            signatures: self.signatures.len(),
        }
    }

    /// Decode `entry` against this module, with its sequence points as the
    /// location source.
    pub fn disassemble(
        &self,
        entry: &MethodEntry,
        options: DecodeOptions,
    ) -> cild_decoder::Result<DisassembledMethod> {
        let mut points = SequencePointCursor::new(entry.sequence_points());
        cild_decoder::disassemble(entry, self, &mut points, options)
    }
}

impl MetadataResolver for Module {
    fn resolve_type(&self, token: Token, generics: GenericContext<'_>) -> Option<TypeDesc> {
        if let Some(ty) = self.types.get(&token) {
            let params = (0..ty.generic_params)
                .map(|i| TypeDesc::named(format!("!{i}")))
                .collect();
            return Some(TypeDesc::generic(ty.name.clone(), params));
        }
        self.type_specs
            .get(&token)
            .map(|spec| spec.instantiate(generics))
    }

    fn resolve_method(&self, token: Token, generics: GenericContext<'_>) -> Option<MethodDesc> {
        if let Some(spec) = self.method_specs.get(&token) {
            let sig = self.method_sigs.get(&spec.method)?;
            let args: Vec<TypeDesc> = spec.args.iter().map(|a| a.instantiate(generics)).collect();
            return Some(sig.instantiate(GenericContext::new(&args, generics.type_args)));
        }
        self.method_sigs
            .get(&token)
            .map(|sig| sig.instantiate(generics))
    }

    fn resolve_field(&self, token: Token, generics: GenericContext<'_>) -> Option<FieldDesc> {
        self.fields.get(&token).map(|field| FieldDesc {
            declaring_type: field.declaring_type.instantiate(generics),
            name: field.name.clone(),
            field_type: field.field_type.instantiate(generics),
            is_static: field.is_static,
        })
    }

    fn resolve_string(&self, token: Token) -> Option<String> {
        self.strings.get(&token).cloned()
    }

    fn resolve_signature(
        &self,
        token: Token,
        generics: GenericContext<'_>,
    ) -> Option<CallSiteSig> {
        self.signatures.get(&token).map(|sig| CallSiteSig {
            parameters: sig
                .parameters
                .iter()
                .map(|p| p.instantiate(generics))
                .collect(),
            return_type: sig.return_type.as_ref().map(|r| r.instantiate(generics)),
            has_this: sig.has_this,
        })
    }
}

#[derive(Default)]
struct Tokens(std::collections::HashSet<Token>);

impl Tokens {
    fn claim(&mut self, token: Token) -> Result<Token> {
        if self.0.insert(token) {
            Ok(token)
        } else {
            Err(Error::DuplicateToken(token))
        }
    }
}

fn parse_all(names: &[String]) -> Result<Vec<TypeExpr>> {
    names.iter().map(|name| name.parse()).collect()
}

fn sequence_point(doc: &SequencePointDoc) -> SequencePoint {
    let line = if doc.hidden { HIDDEN_LINE } else { doc.line };
    SequencePoint {
        offset: doc.offset,
        location: SourceLocation {
            document: doc.document.clone(),
            start_line: line,
            start_column: doc.column,
            end_line: doc.end_line.unwrap_or(line),
            end_column: doc.end_column.unwrap_or(doc.column),
        },
    }
}

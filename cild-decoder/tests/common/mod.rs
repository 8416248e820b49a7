#![allow(dead_code)]

use std::collections::HashMap;

use cild_decoder::*;
use cild_ir::*;

pub const WIDGET_RESIZE: u32 = 0x0A00_0001;
pub const WIDGET_CTOR: u32 = 0x0A00_0002;
pub const CONSOLE_WRITE: u32 = 0x0A00_0003;
pub const WIDGET_CCTOR: u32 = 0x0A00_0004;
pub const WIDGET_TYPE: u32 = 0x0100_0001;
pub const WIDGET_SIZE: u32 = 0x0400_0001;
pub const HELLO: u32 = 0x7000_0001;
pub const BINARY_SIG: u32 = 0x1100_0001;
pub const T_SPEC: u32 = 0x1B00_0001;

pub fn ty(name: &str) -> TypeDesc {
    TypeDesc::named(name)
}

pub fn int32() -> TypeDesc {
    ty("System.Int32")
}

/// In-memory metadata with a handful of well-known members.
#[derive(Default)]
pub struct FakeMetadata {
    pub types: HashMap<u32, TypeDesc>,
    pub methods: HashMap<u32, MethodDesc>,
    pub fields: HashMap<u32, FieldDesc>,
    pub strings: HashMap<u32, String>,
    pub signatures: HashMap<u32, CallSiteSig>,
}

impl FakeMetadata {
    pub fn standard() -> Self {
        let widget = ty("Demo.Widget");
        let mut meta = Self::default();
        meta.types.insert(WIDGET_TYPE, widget.clone());
        meta.methods.insert(
            WIDGET_RESIZE,
            MethodDesc {
                declaring_type: widget.clone(),
                name: "Resize".into(),
                parameters: vec![int32(), int32()],
                return_type: Some(int32()),
                is_static: false,
                generic_args: vec![],
            },
        );
        meta.methods.insert(
            WIDGET_CTOR,
            MethodDesc {
                declaring_type: widget.clone(),
                name: ".ctor".into(),
                parameters: vec![int32()],
                return_type: None,
                is_static: false,
                generic_args: vec![],
            },
        );
        meta.methods.insert(
            WIDGET_CCTOR,
            MethodDesc {
                declaring_type: widget.clone(),
                name: ".cctor".into(),
                parameters: vec![],
                return_type: None,
                is_static: true,
                generic_args: vec![],
            },
        );
        meta.methods.insert(
            CONSOLE_WRITE,
            MethodDesc {
                declaring_type: ty("System.Console"),
                name: "WriteLine".into(),
                parameters: vec![ty("System.String")],
                return_type: None,
                is_static: true,
                generic_args: vec![],
            },
        );
        meta.fields.insert(
            WIDGET_SIZE,
            FieldDesc {
                declaring_type: widget,
                name: "size".into(),
                field_type: int32(),
                is_static: false,
            },
        );
        meta.strings.insert(HELLO, "hello".into());
        meta.signatures.insert(
            BINARY_SIG,
            CallSiteSig {
                parameters: vec![int32(), int32()],
                return_type: Some(int32()),
                has_this: false,
            },
        );
        meta
    }
}

impl MetadataResolver for FakeMetadata {
    fn resolve_type(&self, token: Token, generics: GenericContext<'_>) -> Option<TypeDesc> {
        // A type spec standing for the first type parameter of the method's
        // declaring type.
        if token.0 == T_SPEC {
            return generics.type_args.first().cloned();
        }
        self.types.get(&token.0).cloned()
    }

    fn resolve_method(&self, token: Token, _: GenericContext<'_>) -> Option<MethodDesc> {
        self.methods.get(&token.0).cloned()
    }

    fn resolve_field(&self, token: Token, _: GenericContext<'_>) -> Option<FieldDesc> {
        self.fields.get(&token.0).cloned()
    }

    fn resolve_string(&self, token: Token) -> Option<String> {
        self.strings.get(&token.0).cloned()
    }

    fn resolve_signature(&self, token: Token, _: GenericContext<'_>) -> Option<CallSiteSig> {
        self.signatures.get(&token.0).cloned()
    }
}

/// A method under decode.
pub struct FakeMethod {
    pub desc: MethodDesc,
    pub body: Option<Vec<u8>>,
    pub max_stack: u16,
}

impl FakeMethod {
    /// `static int32 Demo.Program::Run()` with `body`.
    pub fn returning_int(body: &[u8]) -> Self {
        Self::new(Some(int32()), body)
    }

    /// `static void Demo.Program::Run()` with `body`.
    pub fn void(body: &[u8]) -> Self {
        Self::new(None, body)
    }

    fn new(return_type: Option<TypeDesc>, body: &[u8]) -> Self {
        Self {
            desc: MethodDesc {
                declaring_type: ty("Demo.Program"),
                name: "Run".into(),
                parameters: vec![],
                return_type,
                is_static: true,
                generic_args: vec![],
            },
            body: Some(body.to_vec()),
            max_stack: 8,
        }
    }
}

impl MethodSource for FakeMethod {
    fn method(&self) -> &MethodDesc {
        &self.desc
    }

    fn il_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn max_stack(&self) -> u16 {
        self.max_stack
    }
}

pub fn decode_method(method: &FakeMethod) -> Result<DisassembledMethod> {
    disassemble(
        method,
        &FakeMetadata::standard(),
        &mut NoDebugInfo,
        DecodeOptions::default(),
    )
}

/// Decode `body` as a static method returning `int32`.
pub fn decode(body: &[u8]) -> Result<DisassembledMethod> {
    decode_method(&FakeMethod::returning_int(body))
}

pub fn token_bytes(token: u32) -> [u8; 4] {
    token.to_le_bytes()
}

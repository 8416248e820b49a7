use cild_decoder::{DecodeErrorKind, DecodeOptions, GenericContext, MetadataResolver, Unsupported};
use cild_file::*;
use cild_ir::*;
use cild_isa::InstructionKind;

const DEMO: &str = include_str!("data/demo.yaml");

fn demo() -> Module {
    Module::from_yaml(DEMO).unwrap()
}

#[test]
fn stats() {
    let stats = demo().stats();
    assert_eq!(stats.types, 2);
    assert_eq!(stats.type_specs, 2);
    assert_eq!(stats.methods, 5);
    assert_eq!(stats.method_bodies, 4);
    assert_eq!(stats.member_refs, 2);
    assert_eq!(stats.method_specs, 1);
    assert_eq!(stats.fields, 1);
    assert_eq!(stats.strings, 1);
    assert_eq!(stats.signatures, 1);
}

#[test]
fn disassemble_with_locations() {
    let module = demo();
    let add = module.find_method("Add").unwrap();
    let body = module.disassemble(add, DecodeOptions::default()).unwrap();

    let insns = body.instructions();
    assert_eq!(insns.len(), 4);
    assert_eq!(insns[2].kind, InstructionKind::Binary(cild_isa::BinaryOp::Add));
    assert_eq!((insns[3].pops, insns[3].pushes), (1, 0));
    assert_eq!(body.max_stack(), 2);

    let lines: Vec<Option<u32>> = insns
        .iter()
        .map(|i| i.location.as_ref().map(|l| l.start_line))
        .collect();
    // The hidden point at offset 2 keeps line 5 current.
    assert_eq!(lines, [Some(5), Some(5), Some(5), Some(6)]);
}

#[test]
fn calls_resolve_through_module() {
    let module = demo();
    let main = module.find_method("Demo.Program::Main").unwrap();
    let body = module.disassemble(main, DecodeOptions::default()).unwrap();
    let insns = body.instructions();

    let add = &insns[2];
    assert_eq!(add.kind, InstructionKind::Call);
    assert_eq!((add.pops, add.pushes), (2, 1));
    assert_eq!(insns[3].operand, Operand::String("hello".into()));
    let write = &insns[4];
    assert_eq!((write.pops, write.pushes), (1, 0));
    assert_eq!(insns.last().map(|i| i.kind), Some(InstructionKind::Ret));
    // Main is void.
    assert_eq!(insns.last().map(|i| i.pops), Some(0));
}

#[test]
fn generic_field_in_generic_type() {
    let module = demo();
    let get = module.find_method("Get").unwrap();
    let body = module.disassemble(get, DecodeOptions::default()).unwrap();
    match &body.instructions()[1].operand {
        Operand::Field(field) => {
            assert_eq!(field.declaring_type.to_string(), "Demo.Box`1<!0>");
            assert_eq!(field.field_type.to_string(), "!0");
        }
        other => panic!("expected field operand, got {other:?}"),
    }
}

#[test]
fn method_without_body() {
    let module = demo();
    let peek = module.find_method("Peek").unwrap();
    assert!(!peek.has_body());
    let err = module
        .disassemble(peek, DecodeOptions::default())
        .unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::MissingBody { .. }));
}

#[test]
fn ldftn_in_module() {
    let module = demo();
    let broken = module.find_method("Broken").unwrap();
    let err = module
        .disassemble(broken, DecodeOptions::default())
        .unwrap_err();
    assert!(matches!(
        err.kind,
        DecodeErrorKind::UnsupportedInstruction {
            reason: Unsupported::ClosureCapture,
            offset: 1,
            ..
        }
    ));
}

#[test]
fn type_specs_substitute_context() {
    let module = demo();
    let type_args = [TypeDesc::named("System.Int32")];
    let method_args = [TypeDesc::named("System.String")];
    let generics = GenericContext::new(&method_args, &type_args);

    let t = module.resolve_type(Token(0x1B00_0001), generics).unwrap();
    assert_eq!(t.to_string(), "System.Int32");
    let list = module.resolve_type(Token(0x1B00_0002), generics).unwrap();
    assert_eq!(list.to_string(), "System.Collections.Generic.List`1<System.String>");

    let open = module
        .resolve_type(Token(0x0200_0002), GenericContext::default())
        .unwrap();
    assert_eq!(open.to_string(), "Demo.Box`1<!0>");
}

#[test]
fn method_spec_instantiates_callee() {
    let module = demo();
    let make = module
        .resolve_method(Token(0x2B00_0001), GenericContext::default())
        .unwrap();
    assert_eq!(make.generic_args, [TypeDesc::named("System.Int64")]);
    assert_eq!(make.return_type, Some(TypeDesc::named("System.Int64")));
}

#[test]
fn member_token_falls_through_to_field() {
    let module = demo();
    let member = module
        .resolve_member(Token(0x0400_0001), GenericContext::default())
        .unwrap();
    assert!(matches!(member, MemberRef::Field(_)));
    assert!(module.resolve_string(Token(0x7000_0002)).is_none());
}

#[test]
fn unknown_method_name() {
    let module = demo();
    assert!(matches!(
        module.find_method("Missing"),
        Err(Error::UnknownMethod(_))
    ));
}

#[test]
fn duplicate_tokens_rejected() {
    let yaml = r#"
name: Dup
types:
  - { token: 1, name: A }
strings:
  - { token: 1, value: x }
"#;
    assert!(matches!(
        Module::from_yaml(yaml),
        Err(Error::DuplicateToken(Token(1)))
    ));
}

#[test]
fn bad_il_hex_rejected() {
    let yaml = r#"
name: Bad
methods:
  - token: "0x06000001"
    declaring_type: A
    name: M
    body: { il: "2" }
"#;
    let err = Module::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::InvalidHex { .. }), "got {err}");
}

#[test]
fn unknown_fields_rejected() {
    let err = Module::from_yaml("name: X\nbogus: 1\n").unwrap_err();
    assert!(matches!(err, Error::Yaml(_)));
}

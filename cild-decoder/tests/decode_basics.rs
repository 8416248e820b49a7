mod common;

use cild_ir::*;
use cild_isa::{BinaryOp, CompareOp, InstructionKind, Opcode, ValueKind};
use common::*;

#[test]
fn add_two_constants() {
    // ldc.i4.1; ldc.i4.2; add; ret
    let body = decode(&[0x17, 0x18, 0x58, 0x2A]).unwrap();
    let counts: Vec<(u16, u16)> = body
        .instructions()
        .iter()
        .map(|i| (i.pushes, i.pops))
        .collect();
    assert_eq!(counts, [(1, 0), (1, 0), (1, 2), (0, 1)]);

    let kinds: Vec<InstructionKind> = body.instructions().iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        [
            InstructionKind::LdcI4,
            InstructionKind::LdcI4,
            InstructionKind::Binary(BinaryOp::Add),
            InstructionKind::Ret,
        ]
    );
    assert_eq!(body.instructions()[0].operand, Operand::Int(1));
    assert_eq!(body.instructions()[1].operand, Operand::Int(2));
    assert_eq!(body.max_stack(), 8);
}

#[test]
fn void_return_pops_nothing() {
    let body = decode_method(&FakeMethod::void(&[0x00, 0x2A])).unwrap();
    let ret = &body.instructions()[1];
    assert_eq!(ret.kind, InstructionKind::Ret);
    assert_eq!((ret.pops, ret.pushes), (0, 0));
}

#[test]
fn empty_body_decodes_to_nothing() {
    let body = decode(&[]).unwrap();
    assert!(body.instructions().is_empty());
}

#[test]
fn offsets_follow_encoding() {
    let mut bytes = vec![
        0x1F, 0x80, // ldc.i4.s -128
        0xFE, 0x01, // ceq (two-byte, no operand)
        0x20, 0x78, 0x56, 0x34, 0x12, // ldc.i4 0x12345678
        0xFE, 0x09, 0x02, 0x00, // ldarg 2
    ];
    bytes.push(0x72); // ldstr
    bytes.extend_from_slice(&token_bytes(HELLO));
    bytes.push(0x2A);

    let body = decode(&bytes).unwrap();
    let offsets: Vec<u32> = body.instructions().iter().map(|i| i.offset).collect();
    assert_eq!(offsets, [0, 2, 4, 9, 13, 18]);
    assert!(offsets.windows(2).all(|w| w[0] < w[1]));

    let insns = body.instructions();
    assert_eq!(insns[0].operand, Operand::Int(-128));
    assert_eq!(insns[1].kind, InstructionKind::Compare(CompareOp::Ceq));
    assert_eq!(insns[1].opcode, Opcode::extended(0x01));
    assert_eq!(insns[2].operand, Operand::Int(0x1234_5678));
    assert_eq!(insns[3].kind, InstructionKind::Ldarg);
    assert_eq!(insns[3].operand, Operand::UInt(2));
    assert_eq!(insns[4].operand, Operand::String("hello".into()));
}

#[test]
fn two_byte_opcode_advances_past_operand() {
    // initobj <Demo.Widget>; ret
    let mut bytes = vec![0xFE, 0x15];
    bytes.extend_from_slice(&token_bytes(WIDGET_TYPE));
    bytes.push(0x2A);

    let body = decode(&bytes).unwrap();
    let insns = body.instructions();
    assert_eq!(insns.len(), 2);
    assert_eq!(insns[0].kind, InstructionKind::Initobj);
    assert!(insns[0].opcode.is_extended());
    assert_eq!(insns[0].operand, Operand::Type(ty("Demo.Widget")));
    assert_eq!(insns[1].offset, 6);
}

#[test]
fn short_and_long_forms_share_kind() {
    // ldarg.0; ldarg.s 0; ldarg 0; pop; pop; pop; ret
    let bytes = [0x02, 0x0E, 0x00, 0xFE, 0x09, 0x00, 0x00, 0x26, 0x26, 0x26, 0x2A];
    let body = decode(&bytes).unwrap();
    let loads = &body.instructions()[..3];
    assert!(loads.iter().all(|i| i.kind == InstructionKind::Ldarg));
    assert!(loads.iter().all(|i| i.operand == Operand::UInt(0)));
    let mnemonics: Vec<&str> = loads.iter().map(Instruction::mnemonic).collect();
    assert_eq!(mnemonics, ["ldarg.0", "ldarg.s", "ldarg"]);
}

#[test]
fn typed_and_float_operands() {
    let mut bytes = vec![0x23];
    bytes.extend_from_slice(&1.5f64.to_le_bytes()); // ldc.r8 1.5
    bytes.push(0x22);
    bytes.extend_from_slice(&(-0.25f32).to_le_bytes()); // ldc.r4 -0.25
    bytes.extend_from_slice(&[0x26, 0x4A, 0x2A]); // pop; ldind.i4; ret

    let body = decode(&bytes).unwrap();
    let insns = body.instructions();
    assert_eq!(insns[0].operand, Operand::Float64(1.5));
    assert_eq!(insns[1].operand, Operand::Float32(-0.25));
    assert_eq!(insns[3].kind, InstructionKind::Ldind(ValueKind::I4));
    assert_eq!((insns[3].pops, insns[3].pushes), (1, 1));
}

#[test]
fn field_and_member_tokens() {
    let mut bytes = vec![0x02, 0x7B];
    bytes.extend_from_slice(&token_bytes(WIDGET_SIZE)); // ldarg.0; ldfld size
    bytes.push(0xD0);
    bytes.extend_from_slice(&token_bytes(WIDGET_TYPE)); // ldtoken Demo.Widget
    bytes.extend_from_slice(&[0x26, 0x2A]);

    let body = decode(&bytes).unwrap();
    let insns = body.instructions();
    match &insns[1].operand {
        Operand::Field(field) => assert_eq!(field.name, "size"),
        other => panic!("expected field operand, got {other:?}"),
    }
    assert_eq!(
        insns[2].operand,
        Operand::Token(MemberRef::Type(ty("Demo.Widget")))
    );
}

#[test]
fn decoding_is_repeatable() {
    let mut bytes = vec![0x02, 0x17, 0x18, 0x6F];
    bytes.extend_from_slice(&token_bytes(WIDGET_RESIZE));
    bytes.extend_from_slice(&[0x2B, 0x00, 0x2A]);

    let method = FakeMethod::returning_int(&bytes);
    let first = decode_method(&method).unwrap();
    let second = decode_method(&method).unwrap();
    assert_eq!(first, second);
}

#[test]
fn listing_text() {
    let body = decode(&[0x17, 0x2B, 0x00, 0x2A]).unwrap();
    let lines: Vec<String> = body.instructions().iter().map(ToString::to_string).collect();
    assert_eq!(lines, ["IL_0000: ldc.i4.1", "IL_0001: br.s IL_0003", "IL_0003: ret"]);
}

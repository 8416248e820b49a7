mod common;

use cild_decoder::*;
use cild_ir::*;
use cild_isa::{Opcode, ReadError};
use common::*;

#[test]
fn truncated_token_operand() {
    // call with only two of four token bytes
    let err = decode(&[0x00, 0x28, 0x01, 0x00]).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::BufferUnderrun(ReadError::BufferUnderrun {
            offset: 2,
            width: 4,
            remaining: 2,
        })
    );
}

#[test]
fn truncated_escape_sequence() {
    let err = decode(&[0x00, 0xFE]).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::BufferUnderrun(ReadError::BufferUnderrun {
            offset: 2,
            width: 1,
            remaining: 0,
        })
    );
}

#[test]
fn unknown_opcode() {
    let err = decode(&[0x00, 0x24]).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::UnsupportedInstruction {
            opcode: Opcode::one_byte(0x24),
            offset: 1,
            reason: Unsupported::Generic,
        }
    );
}

#[test]
fn excluded_opcodes_are_unsupported() {
    for bytes in [&[0x27u8, 0, 0, 0, 0][..], &[0xFE, 0x00], &[0xFE, 0x07, 0, 0, 0, 0]] {
        let err = decode(bytes).unwrap_err();
        assert!(
            matches!(
                err.kind,
                DecodeErrorKind::UnsupportedInstruction {
                    reason: Unsupported::Generic,
                    ..
                }
            ),
            "expected unsupported for {bytes:02x?}, got {err}"
        );
    }
}

#[test]
fn ldftn_reports_closure_capture() {
    let mut bytes = vec![0xFE, 0x06];
    bytes.extend_from_slice(&token_bytes(WIDGET_RESIZE));
    let err = decode(&bytes).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::UnsupportedInstruction {
            opcode: Opcode::LDFTN,
            offset: 0,
            reason: Unsupported::ClosureCapture,
        }
    );
    assert!(err.to_string().contains("closure"));
}

#[test]
fn unresolved_token() {
    let err = decode(&[0x28, 0xFF, 0x00, 0x00, 0x0A, 0x2A]).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::UnresolvedToken {
            token: Token(0x0A00_00FF),
            kind: TokenKind::Method,
            offset: 0,
        }
    );
}

#[test]
fn missing_body_fails_at_construction() {
    let mut method = FakeMethod::void(&[]);
    method.body = None;
    let meta = FakeMetadata::standard();
    let options = DecodeOptions {
        context: vec!["compiling Demo.Program::Main".into()],
    };
    let err = Decoder::new(&method, &meta, &mut NoDebugInfo, options)
        .err()
        .expect("construction should fail");
    assert!(matches!(err.kind, DecodeErrorKind::MissingBody { .. }));
    assert_eq!(err.context, ["compiling Demo.Program::Main"]);
}

#[test]
fn error_carries_location_and_context() {
    let points = [SequencePoint {
        offset: 0,
        location: SourceLocation::at("Program.cs", 7, 13),
    }];
    let method = FakeMethod::void(&[0x00, 0x24]);
    let options = DecodeOptions {
        context: vec!["compiling Demo.Program::Main".into()],
    };
    let err = disassemble(
        &method,
        &FakeMetadata::standard(),
        &mut SequencePointCursor::new(&points),
        options,
    )
    .unwrap_err();

    assert_eq!(err.location, Some(SourceLocation::at("Program.cs", 7, 13)));
    assert_eq!(
        err.render(&PlainFormatter),
        "Program.cs(7,13): unsupported instruction 0x24 at offset 0x0001\n  \
         while compiling Demo.Program::Main"
    );
}

//! The decode loop.

use cild_ir::{DisassembledMethod, Instruction, MethodDesc, Operand};
use cild_isa::{ByteCursor, Opcode, OpcodeInfo, Prefix, StackEffect, classify, lookup};

use crate::call::{StackCounts, indirect_stack_effect, method_stack_effect};
use crate::context::{DebugLocationSource, GenericContext, MetadataResolver, MethodSource};
use crate::error::{DecodeError, DecodeErrorKind, Result, Unsupported};
use crate::location::LocationTracker;
use crate::operand::OperandDecoder;
use crate::prefix::{PendingModifiers, read_modifier};

/// Per-run settings.
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Compilation-stack frames attached to every error of the run,
    /// outermost first.
    pub context: Vec<String>,
}

/// Outcome of one loop iteration.
enum Step {
    /// A prefix was merged; nothing is emitted yet.
    Modifier(PendingModifiers),
    Emit(Instruction),
}

/// Decodes one method body. Each instance is consumed by a single run.
pub struct Decoder<'a, 'd> {
    method: &'a MethodDesc,
    body: &'a [u8],
    max_stack: u16,
    operands: OperandDecoder<'a>,
    locations: LocationTracker<'d>,
    options: DecodeOptions,
}

impl<'a, 'd> Decoder<'a, 'd> {
    /// Fails with [`DecodeErrorKind::MissingBody`] when `source` has no IL.
    pub fn new(
        source: &'a dyn MethodSource,
        resolver: &'a dyn MetadataResolver,
        debug: &'d mut dyn DebugLocationSource,
        options: DecodeOptions,
    ) -> Result<Self> {
        let method = source.method();
        let Some(body) = source.il_body() else {
            return Err(DecodeError {
                kind: DecodeErrorKind::MissingBody {
                    method: method.to_string(),
                },
                location: None,
                context: options.context,
            });
        };
        let generics =
            GenericContext::new(source.method_generic_args(), source.type_generic_args());
        Ok(Self {
            method,
            body,
            max_stack: source.max_stack(),
            operands: OperandDecoder::new(resolver, generics),
            locations: LocationTracker::new(debug),
            options,
        })
    }

    pub fn decode(mut self) -> Result<DisassembledMethod> {
        log::debug!("decoding {} ({} bytes)", self.method, self.body.len());

        let mut cursor = ByteCursor::new(self.body);
        let mut pending = PendingModifiers::default();
        let mut instructions = Vec::new();

        while !cursor.is_at_end() {
            pending = match self.step(&mut cursor, pending) {
                Ok(Step::Modifier(pending)) => pending,
                Ok(Step::Emit(insn)) => {
                    log::trace!("{insn}");
                    instructions.push(insn);
                    PendingModifiers::default()
                }
                Err(kind) => return Err(self.fail(kind)),
            };
        }

        if let Some(offset) = pending.first_offset() {
            let flags = pending.flags();
            return Err(self.fail(DecodeErrorKind::DanglingModifier { flags, offset }));
        }

        log::debug!(
            "decoded {} instructions from {}",
            instructions.len(),
            self.method
        );
        Ok(DisassembledMethod::new(
            self.method.clone(),
            instructions,
            self.max_stack,
        ))
    }

    fn step(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        pending: PendingModifiers,
    ) -> std::result::Result<Step, DecodeErrorKind> {
        let offset = cursor.position() as u32;
        let opcode = classify(cursor)?;
        self.locations.correlate(offset);

        if let Some(prefix) = Prefix::from_opcode(opcode) {
            let modifier = read_modifier(prefix, cursor, &self.operands, offset)?;
            log::trace!("IL_{offset:04x}: {} pending", prefix.mnemonic());
            return Ok(Step::Modifier(pending.with(modifier, offset)));
        }

        let Some(info) = lookup(opcode) else {
            let reason = if opcode == Opcode::LDFTN {
                Unsupported::ClosureCapture
            } else {
                Unsupported::Generic
            };
            log::warn!("unsupported opcode {opcode} at IL_{offset:04x} in {}", self.method);
            return Err(DecodeErrorKind::UnsupportedInstruction {
                opcode,
                offset,
                reason,
            });
        };

        let operand = self.operands.decode(cursor, info.operand(), offset)?;
        let counts = self.stack_counts(info, &operand, offset)?;

        Ok(Step::Emit(Instruction {
            offset,
            opcode,
            kind: info.kind(),
            flags: pending.into_context(),
            pops: counts.pops,
            pushes: counts.pushes,
            operand,
            location: self.locations.current().cloned(),
        }))
    }

    fn stack_counts(
        &self,
        info: &OpcodeInfo,
        operand: &Operand,
        offset: u32,
    ) -> std::result::Result<StackCounts, DecodeErrorKind> {
        match (info.stack(), operand) {
            (StackEffect::Fixed { pops, pushes }, _) => Ok(StackCounts {
                pops: u16::from(pops),
                pushes: u16::from(pushes),
            }),
            (StackEffect::Call, Operand::Method(method)) => {
                method_stack_effect(info.opcode(), method, offset)
            }
            (StackEffect::Call, Operand::Signature(sig)) => Ok(indirect_stack_effect(sig)),
            (StackEffect::Call, _) => Err(DecodeErrorKind::UnsupportedInstruction {
                opcode: info.opcode(),
                offset,
                reason: Unsupported::Generic,
            }),
            (StackEffect::Return, _) => Ok(StackCounts {
                pops: u16::from(self.method.returns_value()),
                pushes: 0,
            }),
        }
    }

    fn fail(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError {
            kind,
            location: self.locations.current().cloned(),
            context: self.options.context.clone(),
        }
    }
}

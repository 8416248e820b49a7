//! Stack effects of the call family.

use cild_ir::{CallSiteSig, MethodDesc};
use cild_isa::Opcode;

use crate::error::DecodeErrorKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackCounts {
    pub pops: u16,
    pub pushes: u16,
}

fn count(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Pops and pushes of `call`, `callvirt` or `newobj` targeting `method`.
///
/// Instance constructors may only be reached through `newobj` (allocation)
/// or plain `call` (chaining to a base constructor). Type initializers are
/// never called explicitly.
pub fn method_stack_effect(
    opcode: Opcode,
    method: &MethodDesc,
    offset: u32,
) -> Result<StackCounts, DecodeErrorKind> {
    let params = count(method.parameter_count());
    let invalid = || DecodeErrorKind::InvalidConstructorUsage {
        method: method.to_string(),
        opcode,
        offset,
    };

    if method.is_constructor() {
        if method.is_static || method.name == MethodDesc::TYPE_INITIALIZER {
            return Err(invalid());
        }
        return match opcode {
            Opcode::NEWOBJ => Ok(StackCounts { pops: params, pushes: 1 }),
            Opcode::CALL => Ok(StackCounts {
                pops: params.saturating_add(1),
                pushes: 0,
            }),
            _ => Err(invalid()),
        };
    }
    if opcode == Opcode::NEWOBJ {
        return Err(invalid());
    }

    let receiver = u16::from(!method.is_static);
    Ok(StackCounts {
        pops: params.saturating_add(receiver),
        pushes: u16::from(method.returns_value()),
    })
}

/// Pops and pushes of `calli`: the arguments, then the function pointer.
pub fn indirect_stack_effect(sig: &CallSiteSig) -> StackCounts {
    StackCounts {
        pops: count(sig.parameters.len())
            .saturating_add(u16::from(sig.has_this))
            .saturating_add(1),
        pushes: u16::from(sig.return_type.is_some()),
    }
}

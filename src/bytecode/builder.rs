/*!
  Builds instructions from an opcode and an ordered list of operands.

  Operands are consumed in a fixed order: the destination register if the instruction has one,
  then each source register, then at most one trailing literal or branch offset. Anything that
  does not fit that shape is an error, reported before the caller ever sees the instruction.

  ```text
  dasm(AddInt,      &[vreg(0), vreg(1), vreg(2)])   // add-int v0, v1, v2
  dasm(AddIntLit8,  &[vreg(0), vreg(1), literal(4)]) // add-int/lit8 v0, v1, #4
  dasm(IfEqz,       &[vreg(3), offset(-6)])          // if-eqz v3, @-6
  ```
*/

use tracing::debug;
#[cfg(feature = "trace_assembly")]
use tracing::trace;

use super::{
  is_unsupported, FieldRef, Instruction, IrInstruction, MethodRef, Opcode, Operand, Register,
  StringRef, TypeRef,
};
use crate::error::{AssemblyError, Slot};

/**
  Binds `operands` into the slots of `insn`. This is the only place where the
  dest / sources / trailing literal-or-offset structure of an operand list is interpreted.
*/
pub fn assemble<I: Instruction>(insn: &mut I, operands: &[Operand]) -> Result<(), AssemblyError> {
  let opcode = insn.opcode();
  let dests = insn.dests_size();
  let srcs = insn.srcs_size();

  let required = dests + srcs;
  if operands.len() < required {
    return Err(AssemblyError::InsufficientOperands {
      opcode,
      required,
      given: operands.len(),
    });
  }

  let mut args = operands.iter();

  if dests > 0 {
    // The length check above guarantees these are present.
    if let Some(arg) = args.next() {
      let register = require_register(opcode, Slot::Dest, arg)?;
      #[cfg(feature = "trace_assembly")]
      trace!(target: "dexasm::builder", %opcode, register, "bind dest");
      insn.set_dest(register);
    }
  }

  for (i, arg) in args.by_ref().take(srcs).enumerate() {
    let register = require_register(opcode, Slot::Src(i), arg)?;
    #[cfg(feature = "trace_assembly")]
    trace!(target: "dexasm::builder", %opcode, index = i, register, "bind src");
    insn.set_src(i, register);
  }

  if let Some(arg) = args.next() {
    match *arg {
      Operand::Literal(value) => insn.set_literal(value),
      Operand::Offset(value)  => insn.set_offset(value),
      Operand::Register(_)    => {
        return Err(AssemblyError::UnexpectedTrailingRegister { opcode, found: *arg });
      }
    }
  }

  let excess = args.count();
  if excess > 0 {
    return Err(AssemblyError::ExcessOperands { opcode, excess });
  }

  Ok(())
}

fn require_register(opcode: Opcode, slot: Slot, arg: &Operand) -> Result<Register, AssemblyError> {
  match arg.register() {
    Some(register) => Ok(register),
    None => Err(AssemblyError::ExpectedRegister { opcode, slot, found: *arg })
  }
}

/// Builds an instruction that needs no symbolic reference.
pub fn dasm(opcode: Opcode, operands: &[Operand]) -> Result<IrInstruction, AssemblyError> {
  if is_unsupported(opcode) {
    debug!(target: "dexasm::builder", %opcode, "rejected by the generic builder");
    return Err(AssemblyError::UnsupportedOpcode(opcode));
  }
  let mut insn = IrInstruction::new(opcode);
  assemble(&mut insn, operands)?;
  Ok(insn)
}

pub fn dasm_string(
  opcode: Opcode,
  string: StringRef,
  operands: &[Operand]
) -> Result<IrInstruction, AssemblyError> {
  let mut insn = IrInstruction::new(opcode);
  insn.set_string(string);
  assemble(&mut insn, operands)?;
  Ok(insn)
}

pub fn dasm_type(
  opcode: Opcode,
  ty: TypeRef,
  operands: &[Operand]
) -> Result<IrInstruction, AssemblyError> {
  let mut insn = IrInstruction::new(opcode);
  insn.set_type(ty);
  assemble(&mut insn, operands)?;
  Ok(insn)
}

pub fn dasm_field(
  opcode: Opcode,
  field: FieldRef,
  operands: &[Operand]
) -> Result<IrInstruction, AssemblyError> {
  let mut insn = IrInstruction::new(opcode);
  insn.set_field(field);
  assemble(&mut insn, operands)?;
  Ok(insn)
}

/// The argument word count is the number of operands, i.e. every operand is a call argument.
pub fn dasm_method(
  opcode: Opcode,
  method: MethodRef,
  operands: &[Operand]
) -> Result<IrInstruction, AssemblyError> {
  let mut insn = IrInstruction::new(opcode);
  insn.set_method(method);
  insn.set_arg_word_count(operands.len());
  assemble(&mut insn, operands)?;
  Ok(insn)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{literal, offset, vreg, Reference};

  #[test]
  fn binds_dest_srcs_and_literal() {
    let insn = dasm(Opcode::AddIntLit8, &[vreg(1), vreg(2), literal(-3)]).unwrap();
    assert_eq!(insn.dest(), Some(1));
    assert_eq!(insn.srcs(), &[2]);
    assert_eq!(insn.literal(), Some(-3));
    assert_eq!(insn.offset(), None);
  }

  #[test]
  fn binds_trailing_offset() {
    let insn = dasm(Opcode::IfNe, &[vreg(0), vreg(1), offset(8)]).unwrap();
    assert_eq!(insn.dest(), None);
    assert_eq!(insn.srcs(), &[0, 1]);
    assert_eq!(insn.offset(), Some(8));
  }

  #[test]
  fn trailing_operand_is_optional() {
    let insn = dasm(Opcode::Goto, &[]).unwrap();
    assert_eq!(insn.offset(), None);
  }

  #[test]
  fn rejects_literal_in_register_slot() {
    let err = dasm(Opcode::Move, &[vreg(0), literal(1)]).unwrap_err();
    assert_eq!(
      err,
      AssemblyError::ExpectedRegister { opcode: Opcode::Move, slot: Slot::Src(0), found: literal(1) }
    );
    assert!(err.is_contract_violation());
  }

  #[test]
  fn rejects_insufficient_operands() {
    let err = dasm(Opcode::AddInt, &[vreg(0), vreg(1)]).unwrap_err();
    assert_eq!(
      err,
      AssemblyError::InsufficientOperands { opcode: Opcode::AddInt, required: 3, given: 2 }
    );
    assert!(!err.is_contract_violation());
  }

  #[test]
  fn method_path_records_arg_word_count() {
    let method = MethodRef::new("LFoo;", "bar", &["I", "I"], "V");
    let insn =
      dasm_method(Opcode::InvokeStatic, method.clone(), &[vreg(4), vreg(5)]).unwrap();
    assert_eq!(insn.arg_word_count(), 2);
    assert_eq!(insn.srcs(), &[4, 5]);
    assert_eq!(insn.reference(), Some(&Reference::Method(method)));
  }

  #[test]
  fn field_path_binds_reference_then_operands() {
    let field = FieldRef::new("LFoo;", "x", "I");
    let insn = dasm_field(Opcode::Iget, field, &[vreg(0), vreg(1)]).unwrap();
    assert_eq!(insn.dest(), Some(0));
    assert_eq!(insn.srcs(), &[1]);
  }
}

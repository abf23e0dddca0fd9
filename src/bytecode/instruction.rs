use std::fmt::{Display, Formatter};

use super::{FieldRef, MethodRef, Opcode, Reference, Register, StringRef, TypeRef};

/**
  The contract the builder needs from an instruction. The instruction owns the knowledge of
  how many destination and source slots it has; the builder only fills them in order.

  The four reference setters are mutually exclusive: an instruction carries at most one
  symbolic reference, and setting one replaces whatever was there.
*/
pub trait Instruction {
  fn opcode(&self) -> Opcode;

  /// Either 0 or 1.
  fn dests_size(&self) -> usize;
  fn srcs_size(&self) -> usize;

  fn set_dest(&mut self, register: Register);
  fn set_src(&mut self, index: usize, register: Register);
  fn set_literal(&mut self, value: i64);
  fn set_offset(&mut self, value: i32);

  fn set_string(&mut self, string: StringRef);
  fn set_type(&mut self, ty: TypeRef);
  fn set_field(&mut self, field: FieldRef);
  fn set_method(&mut self, method: MethodRef);

  /// The number of register words the call arguments occupy.
  fn set_arg_word_count(&mut self, count: usize);
}

/// Holds the unencoded components of an instruction.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IrInstruction {
  opcode          : Opcode,
  dest            : Option<Register>,
  srcs            : Vec<Register>,
  literal         : Option<i64>,
  offset          : Option<i32>,
  reference       : Option<Reference>,
  arg_word_count  : usize,
}

impl IrInstruction {
  pub fn new(opcode: Opcode) -> IrInstruction {
    IrInstruction {
      opcode,
      dest           : None,
      srcs           : vec![0; opcode.fixed_srcs_size().unwrap_or(0)],
      literal        : None,
      offset         : None,
      reference      : None,
      arg_word_count : 0,
    }
  }

  pub fn dest(&self) -> Option<Register> {
    self.dest
  }

  pub fn srcs(&self) -> &[Register] {
    &self.srcs
  }

  pub fn src(&self, index: usize) -> Option<Register> {
    self.srcs.get(index).copied()
  }

  pub fn literal(&self) -> Option<i64> {
    self.literal
  }

  pub fn offset(&self) -> Option<i32> {
    self.offset
  }

  pub fn reference(&self) -> Option<&Reference> {
    self.reference.as_ref()
  }

  pub fn arg_word_count(&self) -> usize {
    self.arg_word_count
  }
}

impl Instruction for IrInstruction {
  fn opcode(&self) -> Opcode {
    self.opcode
  }

  fn dests_size(&self) -> usize {
    self.opcode.dests_size()
  }

  fn srcs_size(&self) -> usize {
    match self.opcode.fixed_srcs_size() {
      Some(size) => size,
      // Call and filled-array forms take one source per argument word.
      None => self.arg_word_count
    }
  }

  fn set_dest(&mut self, register: Register) {
    self.dest = Some(register);
  }

  fn set_src(&mut self, index: usize, register: Register) {
    if index >= self.srcs.len() {
      self.srcs.resize(index + 1, 0);
    }
    self.srcs[index] = register;
  }

  fn set_literal(&mut self, value: i64) {
    self.literal = Some(value);
  }

  fn set_offset(&mut self, value: i32) {
    self.offset = Some(value);
  }

  fn set_string(&mut self, string: StringRef) {
    self.reference = Some(Reference::String(string));
  }

  fn set_type(&mut self, ty: TypeRef) {
    self.reference = Some(Reference::Type(ty));
  }

  fn set_field(&mut self, field: FieldRef) {
    self.reference = Some(Reference::Field(field));
  }

  fn set_method(&mut self, method: MethodRef) {
    self.reference = Some(Reference::Method(method));
  }

  fn set_arg_word_count(&mut self, count: usize) {
    self.arg_word_count = count;
    if self.opcode.fixed_srcs_size().is_none() {
      self.srcs.resize(count, 0);
    }
  }
}

impl Display for IrInstruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut parts: Vec<String> = vec![];

    if let Some(dest) = self.dest {
      parts.push(format!("v{}", dest));
    }
    parts.extend(self.srcs.iter().map(|src| format!("v{}", src)));
    if let Some(reference) = &self.reference {
      parts.push(reference.to_string());
    }
    if let Some(value) = self.literal {
      parts.push(format!("#{}", value));
    }
    if let Some(value) = self.offset {
      parts.push(format!("@{:+}", value));
    }

    match parts.is_empty() {
      true  => write!(f, "{}", self.opcode),
      false => write!(f, "{} {}", self.opcode, parts.join(", "))
    }
  }
}

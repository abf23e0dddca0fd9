//! A tagged value holding one construction-time operand: a virtual register, an integer
//! literal, or a branch offset, with some convenience constructors.

use std::fmt::{Display, Formatter};

// Registers are 16 bit in the widest encodings, but the IR does not care about width.
pub type Register = u32;

/// An `Either`-like operand given to the builder. The order of a list of operands is significant.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Operand {
  /// A virtual register number.
  Register(Register),
  /// An integer literal, wide enough for `const-wide`.
  Literal(i64),
  /// A branch offset in code units, relative to the instruction.
  Offset(i32),
}

/// The tag of an `Operand` without its value, used when reporting mismatches.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperandTag {
  Register,
  Literal,
  Offset,
}

pub fn vreg(register: Register) -> Operand {
  Operand::Register(register)
}

pub fn literal(value: i64) -> Operand {
  Operand::Literal(value)
}

pub fn offset(value: i32) -> Operand {
  Operand::Offset(value)
}

impl Operand {
  pub fn tag(&self) -> OperandTag {
    match self {
      Operand::Register(_) => OperandTag::Register,
      Operand::Literal(_)  => OperandTag::Literal,
      Operand::Offset(_)   => OperandTag::Offset,
    }
  }

  pub fn is_register(&self) -> bool {
    match self {
      Operand::Register(_) => true,
      _ => false
    }
  }

  /// The register number, if this is a register operand.
  pub fn register(&self) -> Option<Register> {
    match self {
      Operand::Register(r) => Some(*r),
      _ => None
    }
  }
}

impl Display for Operand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Operand::Register(r) => {
        write!(f, "v{}", r)
      },
      Operand::Literal(value) => {
        write!(f, "#{}", value)
      },
      Operand::Offset(value) => {
        write!(f, "@{:+}", value)
      }
    }
  }
}

impl Display for OperandTag {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name =
      match self {
        OperandTag::Register => "register",
        OperandTag::Literal  => "literal",
        OperandTag::Offset   => "offset",
      };
    write!(f, "{}", name)
  }
}

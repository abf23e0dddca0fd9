//! Error types. Nothing here is transient: every error is a structural mistake by the caller
//! and retrying the same call gives the same result.

use std::path::PathBuf;

use thiserror::Error;

use crate::bytecode::{Opcode, Operand};

/// Which slot of an instruction an operand was bound to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Slot {
  Dest,
  Src(usize),
}

impl std::fmt::Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Slot::Dest     => write!(f, "destination"),
      Slot::Src(i)   => write!(f, "source {}", i),
    }
  }
}

/// Failures of the instruction construction protocol.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AssemblyError {
  #[error("{0} is unsupported by the generic builder")]
  UnsupportedOpcode(Opcode),

  #[error("{opcode}: {slot} requires a register, found {found}")]
  ExpectedRegister {
    opcode : Opcode,
    slot   : Slot,
    found  : Operand,
  },

  #[error("{opcode}: encountered unexpected trailing register {found}")]
  UnexpectedTrailingRegister {
    opcode : Opcode,
    found  : Operand,
  },

  #[error("Found {excess} excess operands for opcode {opcode}")]
  ExcessOperands {
    opcode : Opcode,
    excess : usize,
  },

  #[error("{opcode} requires {required} register operands but was given {given}")]
  InsufficientOperands {
    opcode   : Opcode,
    required : usize,
    given    : usize,
  },
}

impl AssemblyError {
  /// True for construction contract violations; false for insufficient operands.
  pub fn is_contract_violation(&self) -> bool {
    match self {
      AssemblyError::InsufficientOperands { .. } => false,
      _ => true
    }
  }
}

/// Failures while assembling instruction text, tagged with the 1-based line number.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AssemblyTextError {
  #[error("Error on line {line}: {name} is not an operation")]
  NotAnOperation {
    line : usize,
    name : String,
  },

  #[error("Error on line {line}: cannot parse `{text}`")]
  Syntax {
    line : usize,
    text : String,
  },

  #[error("Error on line {line}: at most one symbolic reference is allowed, found {count}")]
  MultipleReferences {
    line  : usize,
    count : usize,
  },

  #[error("Error on line {line}: {source}")]
  Build {
    line   : usize,
    source : AssemblyError,
  },
}

/// Failures of module metadata parsing.
#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("Cannot read module metadata {path}: {source}")]
  Io {
    path   : PathBuf,
    source : std::io::Error,
  },

  #[error("Malformed module metadata: {0}")]
  Json(#[from] serde_json::Error),
}

/// Traversal preconditions over a store collection.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum StoreError {
  #[error("Cannot traverse an empty store collection")]
  NoStores,

  #[error("The first store `{0}` has no file-groups")]
  FirstStoreEmpty(String),
}

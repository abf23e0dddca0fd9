/*!
  Instruction assembly and multi-module class stores for register-based dex bytecode.

  - `bytecode` builds IR instructions from an opcode, an optional symbolic reference, and an
    ordered list of operands, and assembles them from text.
  - `store` groups compiled classes into dependency-bearing module stores and traverses every
    class of every store as one sequence.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod error;
pub mod store;

pub use bytecode::{dasm, is_unsupported, Instruction, IrInstruction, Opcode, Operand};
pub use error::{AssemblyError, AssemblyTextError, MetadataError, Slot, StoreError};
pub use store::{ClassView, ModuleMetadata, ModuleStore};

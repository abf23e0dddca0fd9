/*!
  Which opcodes the generic builder entry point `dasm` cannot construct.

  Opcodes that need a string, type, field, or method reference must go through the matching
  symbolic entry point. The two-address arithmetic forms, whose destination is also their first
  source, are rejected as well; build the three-register form instead.

  The list is a closed table over `Opcode`. Adding an opcode means deciding here, explicitly.
*/

use super::Opcode;

/// Returns `true` if `opcode` cannot be built from bare operands by `dasm`.
pub fn is_unsupported(opcode: Opcode) -> bool {
  use Opcode::*;

  match opcode {
    ConstString
    | ConstStringJumbo

    | ConstClass
    | CheckCast
    | InstanceOf
    | NewInstance
    | NewArray
    | FilledNewArray
    | FilledNewArrayRange

    | Iget
    | IgetWide
    | IgetObject
    | IgetBoolean
    | IgetByte
    | IgetChar
    | IgetShort
    | Iput
    | IputWide
    | IputObject
    | IputBoolean
    | IputByte
    | IputChar
    | IputShort
    | Sget
    | SgetWide
    | SgetObject
    | SgetBoolean
    | SgetByte
    | SgetChar
    | SgetShort
    | Sput
    | SputWide
    | SputObject
    | SputBoolean
    | SputByte
    | SputChar
    | SputShort

    | InvokeVirtual
    | InvokeSuper
    | InvokeDirect
    | InvokeStatic
    | InvokeInterface
    | InvokeVirtualRange
    | InvokeSuperRange
    | InvokeDirectRange
    | InvokeStaticRange
    | InvokeInterfaceRange

    | AddInt2Addr
    | SubInt2Addr
    | MulInt2Addr
    | DivInt2Addr
    | RemInt2Addr
    | AndInt2Addr
    | OrInt2Addr
    | XorInt2Addr
    | ShlInt2Addr
    | ShrInt2Addr
    | UshrInt2Addr
    | AddLong2Addr
    | SubLong2Addr
    | MulLong2Addr
    | DivLong2Addr
    | RemLong2Addr
    | AndLong2Addr
    | OrLong2Addr
    | XorLong2Addr
    | ShlLong2Addr
    | ShrLong2Addr
    | UshrLong2Addr
    | AddFloat2Addr
    | SubFloat2Addr
    | MulFloat2Addr
    | DivFloat2Addr
    | RemFloat2Addr
    | AddDouble2Addr
    | SubDouble2Addr
    | MulDouble2Addr
    | DivDouble2Addr
    | RemDouble2Addr => true,

    _ => false
  }
}

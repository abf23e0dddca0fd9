//! Integration tests for assembling instructions from text.

use dexasm::bytecode::{assemble_line, assemble_text, Opcode, Reference, TypeRef};
use dexasm::{AssemblyError, AssemblyTextError, Instruction};

/// Trace output is captured per test; see it with `cargo test -- --nocapture`.
fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_max_level(tracing::Level::TRACE)
    .try_init();
}

const PROGRAM: &str = r#"
# Count to ten.
const/4 v0, 0
const/16 v1, 10
if-ge v0, v1, @+5        # exit the loop
add-int/lit8 v0, v0, 1
goto @-3

new-instance v2, Ljava/lang/StringBuilder;
invoke-direct v2, Ljava/lang/StringBuilder;-><init>()V
const-string v3, "done"
iget v4, v2, LFoo;->count:I
return-void
"#;

#[test]
fn assembles_a_whole_program() {
  init_logging();
  let insns = assemble_text(PROGRAM).unwrap();
  let opcodes: Vec<Opcode> = insns.iter().map(|i| i.opcode()).collect();
  assert_eq!(
    opcodes,
    vec![
      Opcode::Const4,
      Opcode::Const16,
      Opcode::IfGe,
      Opcode::AddIntLit8,
      Opcode::Goto,
      Opcode::NewInstance,
      Opcode::InvokeDirect,
      Opcode::ConstString,
      Opcode::Iget,
      Opcode::ReturnVoid,
    ]
  );

  assert_eq!(insns[2].srcs(), &[0, 1]);
  assert_eq!(insns[2].offset(), Some(5));
  assert_eq!(insns[4].offset(), Some(-3));
  assert_eq!(insns[5].reference(), Some(&Reference::Type(TypeRef::new("Ljava/lang/StringBuilder;"))));
  assert_eq!(insns[6].arg_word_count(), 1);
  assert_eq!(insns[8].to_string(), "iget v4, v2, LFoo;->count:I");
}

#[test]
fn unknown_mnemonic_is_reported_with_its_line() {
  let err = assemble_text("nop\nfrobnicate v0\n").unwrap_err();
  assert_eq!(
    err,
    AssemblyTextError::NotAnOperation { line: 2, name: "frobnicate".to_string() }
  );
}

#[test]
fn builder_errors_carry_the_line_number() {
  init_logging();
  let err = assemble_text("const/4 v0, 1\nadd-int/2addr v0, v1\n").unwrap_err();
  assert_eq!(
    err,
    AssemblyTextError::Build {
      line: 2,
      source: AssemblyError::UnsupportedOpcode(Opcode::AddInt2Addr),
    }
  );
  assert_eq!(err.to_string(), "Error on line 2: add-int/2addr is unsupported by the generic builder");
}

#[test]
fn at_most_one_symbolic_reference_per_line() {
  let err = assemble_line(4, r#"const-string v0, "a", "b""#).unwrap_err();
  assert_eq!(err, AssemblyTextError::MultipleReferences { line: 4, count: 2 });
}

#[test]
fn malformed_operands_are_syntax_errors() {
  let err = assemble_line(1, "move v0, %v1").unwrap_err();
  assert!(matches!(err, AssemblyTextError::Syntax { line: 1, .. }));
}

#[test]
fn hex_and_negative_literals() {
  let insn = assemble_line(1, "const v0, -0x10").unwrap().unwrap();
  assert_eq!(insn.literal(), Some(-16));
}

#[test]
fn wide_literals_use_the_full_64_bits() {
  let insn = assemble_line(1, "const-wide v0, -9223372036854775808").unwrap().unwrap();
  assert_eq!(insn.literal(), Some(i64::MIN));

  let insn = assemble_line(2, "const-wide v0, 0xffffffffffffffff").unwrap().unwrap();
  assert_eq!(insn.literal(), Some(-1));

  let err = assemble_line(3, "const-wide v0, 9223372036854775808").unwrap_err();
  assert!(matches!(err, AssemblyTextError::Syntax { line: 3, .. }));
}

/*!
  The human readable textual form of instructions is called assembly. This module leverages the
  `strum` derives of `Opcode` to read mnemonics and hands each parsed line to the builder.

  One instruction per line:

  ```text
  const/4 v0, 1                               # literal
  if-eqz v0, @+4                              # branch offset
  const-string v1, "hello"                    # string reference
  new-instance v2, Ljava/lang/StringBuilder;  # type reference
  iget v3, v2, LFoo;->count:I                 # field reference
  invoke-static v0, v1, LFoo;->bar(II)V       # method reference
  ```

  A line holds at most one symbolic reference, which selects the builder entry point.
*/

use std::convert::TryFrom;
use std::str::FromStr;

use nom::{
  branch::alt,
  bytes::complete::{is_not, tag, take_while1},
  character::complete::{char as one_char, digit1, hex_digit1, one_of, space0},
  combinator::{all_consuming, map, map_opt, map_res, opt, recognize, rest},
  multi::{many0, separated_list},
  sequence::{delimited, pair, preceded, tuple},
  IResult,
};
use string_cache::DefaultAtom;
use tracing::debug;

use super::{
  dasm, dasm_field, dasm_method, dasm_string, dasm_type, FieldRef, IrInstruction, MethodRef,
  Opcode, Operand, Reference, TypeRef, StringRef,
};
use crate::error::AssemblyTextError;

/// One comma separated item of an instruction line.
#[derive(Clone, Debug, PartialEq)]
enum Token {
  Operand(Operand),
  Symbol(Reference),
}

// region Parsers

/**
  A decimal or `0x` hexadecimal integer with an optional sign. Decimal values must fit in an
  `i64`, so `-9223372036854775808` is the smallest accepted. Hexadecimal values are 64-bit
  patterns: `0xffffffffffffffff` reads as -1.
*/
fn integer(input: &str) -> IResult<&str, i64> {
  let magnitude = alt((
    map(preceded(tag("0x"), hex_digit1), |h: &str| (h, 16)),
    map(digit1, |d: &str| (d, 10)),
  ));
  map_opt(
    pair(opt(one_of("+-")), magnitude),
    |(sign, (digits, radix))| signed_value(sign == Some('-'), digits, radix)
  )(input)
}

fn signed_value(negative: bool, digits: &str, radix: u32) -> Option<i64> {
  let magnitude = u64::from_str_radix(digits, radix).ok()?;
  match (radix, negative) {
    (16, false) => Some(magnitude as i64),
    (16, true)  => Some((magnitude as i64).wrapping_neg()),
    (_, false)  => i64::try_from(magnitude).ok(),
    (_, true) if magnitude <= 1 << 63 => Some((magnitude as i64).wrapping_neg()),
    _ => None
  }
}

fn register(input: &str) -> IResult<&str, Operand> {
  map_res(preceded(one_char('v'), digit1), |d: &str| d.parse().map(Operand::Register))(input)
}

fn branch_offset(input: &str) -> IResult<&str, Operand> {
  map_res(preceded(one_char('@'), integer), |v| i32::try_from(v).map(Operand::Offset))(input)
}

fn literal(input: &str) -> IResult<&str, Operand> {
  map(integer, Operand::Literal)(input)
}

fn type_descriptor(input: &str) -> IResult<&str, TypeRef> {
  map(
    recognize(pair(
      many0(one_char('[')),
      alt((
        recognize(delimited(one_char('L'), is_not(";,\" \t"), one_char(';'))),
        recognize(one_of("ZBSCIJFDV")),
      )),
    )),
    TypeRef::new,
  )(input)
}

fn member_name(input: &str) -> IResult<&str, DefaultAtom> {
  map(
    take_while1(|c: char| c.is_alphanumeric() || "_$<>-".contains(c)),
    |name: &str| DefaultAtom::from(name),
  )(input)
}

fn method_ref(input: &str) -> IResult<&str, Reference> {
  map(
    tuple((
      type_descriptor,
      tag("->"),
      member_name,
      delimited(one_char('('), many0(type_descriptor), one_char(')')),
      type_descriptor,
    )),
    |(owner, _, name, params, ret)| Reference::Method(MethodRef { owner, name, params, ret }),
  )(input)
}

fn field_ref(input: &str) -> IResult<&str, Reference> {
  map(
    tuple((type_descriptor, tag("->"), member_name, one_char(':'), type_descriptor)),
    |(owner, _, name, _, ty)| Reference::Field(FieldRef { owner, name, ty }),
  )(input)
}

fn string_ref(input: &str) -> IResult<&str, Reference> {
  map(
    delimited(one_char('"'), opt(is_not("\"")), one_char('"')),
    |text: Option<&str>| Reference::String(StringRef::new(text.unwrap_or(""))),
  )(input)
}

fn token(input: &str) -> IResult<&str, Token> {
  alt((
    map(register, Token::Operand),
    map(branch_offset, Token::Operand),
    map(literal, Token::Operand),
    map(method_ref, Token::Symbol),
    map(field_ref, Token::Symbol),
    map(type_descriptor, |t| Token::Symbol(Reference::Type(t))),
    map(string_ref, Token::Symbol),
  ))(input)
}

fn mnemonic(input: &str) -> IResult<&str, &str> {
  take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '/')(input)
}

fn instruction_line(input: &str) -> IResult<&str, (&str, Vec<Token>)> {
  all_consuming(
    delimited(
      space0,
      pair(
        mnemonic,
        preceded(space0, separated_list(delimited(space0, one_char(','), space0), token)),
      ),
      tuple((space0, opt(preceded(one_char('#'), rest)))),
    )
  )(input)
}

// endregion

fn is_blank(line: &str) -> bool {
  let trimmed = line.trim();
  trimmed.is_empty() || trimmed.starts_with('#')
}

/**
  Assembles one line of text into an instruction. `line_number` is only used for error
  reporting. Returns `Ok(None)` for blank and comment-only lines.
*/
pub fn assemble_line(line_number: usize, line: &str)
  -> Result<Option<IrInstruction>, AssemblyTextError>
{
  if is_blank(line) {
    return Ok(None);
  }

  let (name, tokens) =
    match instruction_line(line) {
      Ok((_, parsed)) => parsed,
      Err(_e) => {
        return Err(AssemblyTextError::Syntax { line: line_number, text: line.trim().to_string() });
      }
    };

  let opcode =
    Opcode::from_str(name).map_err(|_| AssemblyTextError::NotAnOperation {
      line: line_number,
      name: name.to_string(),
    })?;

  let mut operands: Vec<Operand> = vec![];
  let mut symbols: Vec<Reference> = vec![];
  for token in tokens {
    match token {
      Token::Operand(operand) => operands.push(operand),
      Token::Symbol(symbol)   => symbols.push(symbol),
    }
  }
  if symbols.len() > 1 {
    return Err(AssemblyTextError::MultipleReferences { line: line_number, count: symbols.len() });
  }

  let built =
    match symbols.pop() {
      None                        => dasm(opcode, &operands),
      Some(Reference::String(s))  => dasm_string(opcode, s, &operands),
      Some(Reference::Type(t))    => dasm_type(opcode, t, &operands),
      Some(Reference::Field(f))   => dasm_field(opcode, f, &operands),
      Some(Reference::Method(m))  => dasm_method(opcode, m, &operands),
    };

  match built {
    Ok(insn) => Ok(Some(insn)),
    Err(source) => {
      debug!(target: "dexasm::assembly", line = line_number, %source, "build failed");
      Err(AssemblyTextError::Build { line: line_number, source })
    }
  }
}

/// Assembles every line of `text`, stopping at the first error.
pub fn assemble_text(text: &str) -> Result<Vec<IrInstruction>, AssemblyTextError> {
  let mut instructions = vec![];
  for (index, line) in text.lines().enumerate() {
    if let Some(insn) = assemble_line(index + 1, line)? {
      instructions.push(insn);
    }
  }
  debug!(target: "dexasm::assembly", count = instructions.len(), "assembled text");
  Ok(instructions)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{literal as lit, offset, vreg};

  #[test]
  fn integers_accept_sign_and_hex() {
    assert_eq!(integer("-12"), Ok(("", -12)));
    assert_eq!(integer("0x1f,"), Ok((",", 31)));
    assert_eq!(integer("+7"), Ok(("", 7)));
  }

  #[test]
  fn integers_cover_the_full_64_bit_range() {
    assert_eq!(integer("-9223372036854775808"), Ok(("", i64::MIN)));
    assert_eq!(integer("9223372036854775807"), Ok(("", i64::MAX)));
    assert_eq!(integer("0xffffffffffffffff"), Ok(("", -1)));
    assert_eq!(integer("0x8000000000000000"), Ok(("", i64::MIN)));
    assert!(integer("9223372036854775808").is_err());
    assert!(integer("-9223372036854775809").is_err());
    assert!(integer("0x10000000000000000").is_err());
  }

  #[test]
  fn tokens_are_classified_by_prefix() {
    assert_eq!(token("v3"), Ok(("", Token::Operand(vreg(3)))));
    assert_eq!(token("@-2"), Ok(("", Token::Operand(offset(-2)))));
    assert_eq!(token("42"), Ok(("", Token::Operand(lit(42)))));
    assert_eq!(token("[I"), Ok(("", Token::Symbol(Reference::Type(TypeRef::new("[I"))))));
  }

  #[test]
  fn member_references_parse() {
    assert_eq!(
      token("LFoo;->count:I"),
      Ok(("", Token::Symbol(Reference::Field(FieldRef::new("LFoo;", "count", "I")))))
    );
    assert_eq!(
      token("LFoo;-><init>(IJ)V"),
      Ok(("", Token::Symbol(Reference::Method(MethodRef::new("LFoo;", "<init>", &["I", "J"], "V")))))
    );
  }

  #[test]
  fn comment_lines_are_skipped() {
    assert_eq!(assemble_line(1, "   # nothing here"), Ok(None));
    assert_eq!(assemble_line(2, ""), Ok(None));
  }
}

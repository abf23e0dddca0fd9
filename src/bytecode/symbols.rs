//! Symbolic references carried by instructions out of band from their register operands.
//! As with all strings in this codebase, the names are interned, so clones are cheap.

use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

/// A string constant, as loaded by `const-string`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct StringRef(pub DefaultAtom);

/**
  A type in descriptor form, e.g. `Ljava/lang/Object;`, `[I`, or `J`. The descriptor is not
  validated here; the assembly parser only produces well-formed descriptors.
*/
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TypeRef(pub DefaultAtom);

/// A field `owner->name:ty`. Two fields are the same only if all three components match.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FieldRef {
  pub owner : TypeRef,
  pub name  : DefaultAtom,
  pub ty    : TypeRef,
}

/// A method `owner->name(params)ret`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MethodRef {
  pub owner  : TypeRef,
  pub name   : DefaultAtom,
  pub params : Vec<TypeRef>,
  pub ret    : TypeRef,
}

/// The one symbolic reference an instruction may hold.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Reference {
  String(StringRef),
  Type(TypeRef),
  Field(FieldRef),
  Method(MethodRef),
}

impl StringRef {
  pub fn new(text: &str) -> StringRef {
    StringRef(DefaultAtom::from(text))
  }
}

impl TypeRef {
  pub fn new(descriptor: &str) -> TypeRef {
    TypeRef(DefaultAtom::from(descriptor))
  }

  pub fn descriptor(&self) -> &str {
    &self.0
  }
}

impl FieldRef {
  pub fn new(owner: &str, name: &str, ty: &str) -> FieldRef {
    FieldRef {
      owner : TypeRef::new(owner),
      name  : DefaultAtom::from(name),
      ty    : TypeRef::new(ty),
    }
  }
}

impl MethodRef {
  pub fn new(owner: &str, name: &str, params: &[&str], ret: &str) -> MethodRef {
    MethodRef {
      owner  : TypeRef::new(owner),
      name   : DefaultAtom::from(name),
      params : params.iter().map(|p| TypeRef::new(p)).collect(),
      ret    : TypeRef::new(ret),
    }
  }
}

impl Display for StringRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "\"{}\"", self.0)
  }
}

impl Display for TypeRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Display for FieldRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}->{}:{}", self.owner, self.name, self.ty)
  }
}

impl Display for MethodRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}->{}({}){}",
      self.owner,
      self.name,
      self.params
          .iter()
          .map(TypeRef::to_string)
          .collect::<Vec<String>>()
          .join(""),
      self.ret
    )
  }
}

impl Display for Reference {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Reference::String(s) => write!(f, "{}", s),
      Reference::Type(t)   => write!(f, "{}", t),
      Reference::Field(fd) => write!(f, "{}", fd),
      Reference::Method(m) => write!(f, "{}", m),
    }
  }
}

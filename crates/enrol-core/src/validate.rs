//! Field validation for user drafts.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

use crate::draft::Fields;

static NAME_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// An editable scalar field of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
  Name,
  Email,
}

impl Field {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Email => "email",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Field name → human-readable message. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, field: Field) -> Option<&str> { self.0.get(&field).map(String::as_str) }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }

  fn insert(&mut self, field: Field, message: &str) { self.0.insert(field, message.to_owned()); }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (field, message)) in self.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
    }
    Ok(())
  }
}

/// Validate the scalar fields of a draft.
///
/// - name: required, letters and whitespace only
/// - email: required, `local@domain.tld` shape with no whitespace
pub fn validate(fields: &Fields) -> ValidationErrors {
  let mut errors = ValidationErrors::default();

  if fields.name.trim().is_empty() {
    errors.insert(Field::Name, "Name is required");
  } else if !NAME_RE.is_match(&fields.name) {
    errors.insert(Field::Name, "Only letters and spaces allowed");
  }

  if fields.email.trim().is_empty() {
    errors.insert(Field::Email, "Email is required");
  } else if !EMAIL_RE.is_match(&fields.email) {
    errors.insert(Field::Email, "Invalid email format");
  }

  errors
}

use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

/// Inputs of the branch-administrator form that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Username,
    Email,
    Password,
    ConfirmPassword,
    Branch,
}

impl FormField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "username" => Some(FormField::Username),
            "email" => Some(FormField::Email),
            "password" => Some(FormField::Password),
            "confirm_password" => Some(FormField::ConfirmPassword),
            "branch_id" => Some(FormField::Branch),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Username => "Usuario",
            FormField::Email => "Email",
            FormField::Password => "Contraseña",
            FormField::ConfirmPassword => "Confirmar contraseña",
            FormField::Branch => "Sucursal",
        }
    }
}

/// One message per field, kept in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one; the
    /// first rule a field breaks is the one reported.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (name, errs) in errors.field_errors() {
            let name: &str = &name;
            let Some(field) = FormField::from_name(name) else {
                tracing::warn!(field = name, "validation error for unknown form field");
                continue;
            };
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.insert(field, message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field.label(), message)?;
        }
        Ok(())
    }
}

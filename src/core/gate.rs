use crate::errors::{AppError, AppResult};

/// Authentication collaborator consulted before any write.
pub trait SessionGate {
    fn is_authenticated(&self) -> bool;
}

/// Compares the password supplied on the command line with the one in the
/// configuration. With no configured password the gate is open.
pub struct PasswordGate {
    expected: Option<String>,
    supplied: Option<String>,
}

impl PasswordGate {
    pub fn new(expected: Option<String>, supplied: Option<String>) -> Self {
        Self { expected, supplied }
    }
}

impl SessionGate for PasswordGate {
    fn is_authenticated(&self) -> bool {
        match (&self.expected, &self.supplied) {
            (None, _) => true,
            (Some(exp), _) if exp.is_empty() => true,
            (Some(exp), Some(given)) => exp == given,
            (Some(_), None) => false,
        }
    }
}

pub fn ensure_authenticated<G: SessionGate + ?Sized>(gate: &G) -> AppResult<()> {
    if gate.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

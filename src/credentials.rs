//! Credential normalization: turns a bare username and realm into the
//! realm-qualified principal presented at login.

use std::fmt;

/// Realm-qualified login identity (`user@realm`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    /// Qualify `username` with `realm` unless it already carries an embedded realm.
    ///
    /// An embedded realm always wins over the explicit one.
    pub fn normalize(username: &str, realm: &str) -> Self {
        if username.contains('@') {
            Principal(username.to_string())
        } else {
            Principal(format!("{}@{}", username, realm))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// User part, everything before the first `@`.
    pub fn user(&self) -> &str {
        self.0.split_once('@').map(|(user, _)| user).unwrap_or(&self.0)
    }

    /// Realm part, everything after the first `@`.
    pub fn realm(&self) -> &str {
        self.0.split_once('@').map(|(_, realm)| realm).unwrap_or("")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

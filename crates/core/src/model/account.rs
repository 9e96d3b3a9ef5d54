use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::AccountId;

/// Lower-cased display name used as the unique account key.
///
/// Names are compared case-insensitively by normalizing once, up front, so the
/// store only ever sees the canonical form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    /// Normalize a display name as typed by the student.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    /// Wrap a value read back from storage, which is already canonical.
    #[must_use]
    pub fn from_persisted(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({:?})", self.0)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name/password pair submitted at signup or login.
///
/// The password is kept verbatim; it is compared by plain equality.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    name: NameKey,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(name: &str, password: impl Into<String>) -> Self {
        Self {
            name: NameKey::normalize(name),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &NameKey {
        &self.name
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A registered student account as returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    name: NameKey,
}

impl Account {
    #[must_use]
    pub fn new(id: AccountId, name: NameKey) -> Self {
        Self { id, name }
    }

    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &NameKey {
        &self.name
    }
}

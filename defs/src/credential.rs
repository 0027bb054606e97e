use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a credential held by the host's credential store.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CredentialRef(String);

impl CredentialRef {
    pub fn new(reference: &str) -> Self {
        CredentialRef(reference.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Username/password pair for HTTP Basic authentication.
///
/// Only lives for the duration of one request. `Debug` never prints the
/// password.
#[derive(Deserialize, Clone, PartialEq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: &str, password: &str) -> Self {
        Credential {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

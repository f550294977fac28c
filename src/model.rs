use std::fmt;

use serde::{Deserialize, Serialize};

/// Stored credential hash.
///
/// Not `Serialize`, and `Debug` prints a placeholder: records holding one never reach a
/// response body or a log line with the secret intact.
#[derive(Clone, PartialEq, Eq, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Test fixture: hash a plaintext password the way stored rows are hashed.
    #[cfg(test)]
    pub(crate) fn new(plain: &str) -> Self {
        Self(password_auth::generate_hash(plain))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Test fixture: check a plaintext against the hash.
    #[cfg(test)]
    pub(crate) fn verify(&self, plain: &str) -> bool {
        password_auth::verify_password(plain, &self.0).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct Buyer {
    pub id: u64,               //BigInt unsigned primary key auto_increment
    pub name: String,          //Varchar(32)
    pub email: String,         //Varchar(48) unique
    pub password: PasswordHash, //Varchar(255)
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct Influencer {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    pub handle: Option<String>, //Varchar(64), public social handle
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PublicBuyer {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PublicInfluencer {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PublicAdmin {
    pub id: u64,
    pub name: String,
    pub email: String,
}

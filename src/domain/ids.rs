use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Length of the hexadecimal form of an [`ObjectId`].
pub const OBJECT_ID_LEN: usize = 24;

/// A 24-character hexadecimal entity identifier.
///
/// Parsing is case-insensitive; the stored form is always lowercase so two ids
/// naming the same entity compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh id: 4 bytes of big-endian unix seconds followed by 8
    /// random bytes.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = Uuid::new_v4();

        let mut bytes = [0_u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[..8]);

        Self(hex::encode(bytes))
    }

    /// Validate `raw` as an identifier for `entity`, which names the entity in
    /// the resulting error message.
    pub fn parse_for(entity: &'static str, raw: &str) -> Result<Self, DomainError> {
        if is_object_id(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(DomainError::InvalidIdentifierFormat(entity))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `raw` matches `^[0-9a-fA-F]{24}$`.
pub fn is_object_id(raw: &str) -> bool {
    raw.len() == OBJECT_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

impl FromStr for ObjectId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("object", s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

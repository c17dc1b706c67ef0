//! Signed bearer tokens.
//!
//! Format: `<user-id>.<expiry-unix-seconds>.<hex HMAC-SHA256>`, where the MAC
//! covers `<user-id>.<expiry-unix-seconds>`.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::TokenService;

type HmacSha256 = Hmac<Sha256>;

pub struct HmacTokenService {
    secret: Vec<u8>,
    ttl: Duration,
}

impl HmacTokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, DomainError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| DomainError::Internal(format!("invalid token key: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn issue_with_expiry(&self, user_id: &ObjectId, expires_at: i64) -> Result<String, DomainError> {
        let payload = format!("{user_id}.{expires_at}");
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }
}

impl std::fmt::Debug for HmacTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacTokenService")
            .field("secret", &"**redacted**")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService for HmacTokenService {
    fn issue(&self, user_id: &ObjectId) -> Result<String, DomainError> {
        let expires_at = (Utc::now() + self.ttl).timestamp();
        self.issue_with_expiry(user_id, expires_at)
    }

    fn verify(&self, token: &str) -> Result<ObjectId, DomainError> {
        let (payload, signature) = token
            .rsplit_once('.')
            .ok_or(DomainError::Unauthorized("token failed"))?;
        let (user_id, expires_at) = payload
            .split_once('.')
            .ok_or(DomainError::Unauthorized("token failed"))?;

        let signature =
            hex::decode(signature).map_err(|_| DomainError::Unauthorized("token failed"))?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| DomainError::Unauthorized("token failed"))?;

        let expires_at: i64 = expires_at
            .parse()
            .map_err(|_| DomainError::Unauthorized("token failed"))?;
        if expires_at <= Utc::now().timestamp() {
            return Err(DomainError::Unauthorized("token expired"));
        }

        user_id
            .parse()
            .map_err(|_| DomainError::Unauthorized("token failed"))
    }
}

//! Bearer tokens.
//!
//! A token reads `sw_v1_<token uuid>.<64 hex chars>`. The secret half is
//! never stored: the `api_tokens` row keeps a SHA-256 verifier bound to the
//! owning customer instead.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::customers::records::CustomerUuid;

const PREFIX: &str = "sw_";
const SECRET_LEN: usize = 32;

/// Token layout version, stored alongside the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            other => Err(ApiTokenError::UnsupportedVersion(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token is malformed")]
    Malformed,

    #[error("api token version {0} is not supported")]
    UnsupportedVersion(String),
}

/// A bearer token held in memory; the secret is wiped on drop.
#[derive(Clone)]
pub struct ApiToken {
    pub id: Uuid,
    pub version: ApiTokenVersion,
    secret: Zeroizing<[u8; SECRET_LEN]>,
}

impl ApiToken {
    /// Draws a fresh token from the OS random source.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = Zeroizing::new([0_u8; SECRET_LEN]);

        OsRng.fill_bytes(secret.as_mut_slice());

        Self {
            id: Uuid::now_v7(),
            version: ApiTokenVersion::V1,
            secret,
        }
    }

    /// Hex SHA-256 over `id:version:customer:secret`; a leaked row is useless
    /// for any other customer.
    #[must_use]
    pub fn verifier(&self, customer: CustomerUuid) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.id.simple().to_string());
        hasher.update(b":");
        hasher.update(self.version.as_i16().to_string());
        hasher.update(b":");
        hasher.update(customer.into_uuid().simple().to_string());
        hasher.update(b":");
        hasher.update(self.secret.as_slice());

        format!("{:x}", hasher.finalize())
    }

    #[cfg(test)]
    fn with_secret(id: Uuid, secret: [u8; SECRET_LEN]) -> Self {
        Self {
            id,
            version: ApiTokenVersion::V1,
            secret: Zeroizing::new(secret),
        }
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("id", &self.id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Display for ApiToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let version = match self.version {
            ApiTokenVersion::V1 => "v1",
        };

        write!(f, "{PREFIX}{version}_{}.", self.id.simple())?;

        self.secret
            .iter()
            .try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl FromStr for ApiToken {
    type Err = ApiTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let rest = token.strip_prefix(PREFIX).ok_or(ApiTokenError::Malformed)?;
        let (version, rest) = rest.split_once('_').ok_or(ApiTokenError::Malformed)?;
        let (id, secret_hex) = rest.split_once('.').ok_or(ApiTokenError::Malformed)?;

        let version = match version {
            "v1" => ApiTokenVersion::V1,
            other => return Err(ApiTokenError::UnsupportedVersion(other.to_owned())),
        };

        let id = Uuid::try_parse(id).map_err(|_bad_uuid| ApiTokenError::Malformed)?;

        Ok(Self {
            id,
            version,
            secret: decode_secret(secret_hex).ok_or(ApiTokenError::Malformed)?,
        })
    }
}

fn decode_secret(hex: &str) -> Option<Zeroizing<[u8; SECRET_LEN]>> {
    if hex.len() != SECRET_LEN * 2 {
        return None;
    }

    let mut secret = Zeroizing::new([0_u8; SECRET_LEN]);

    for (byte, pair) in secret.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
        let high = char::from(*pair.first()?).to_digit(16)?;
        let low = char::from(*pair.get(1)?).to_digit(16)?;

        *byte = u8::try_from(high * 16 + low).ok()?;
    }

    Some(secret)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn displays_and_parses() -> TestResult {
        let token = ApiToken::with_secret(Uuid::nil(), [0xAB; SECRET_LEN]);
        let text = token.to_string();

        assert_eq!(
            text,
            format!("sw_v1_{}.{}", Uuid::nil().simple(), "ab".repeat(SECRET_LEN))
        );

        let parsed: ApiToken = text.parse()?;

        assert_eq!(parsed.id, Uuid::nil());
        assert_eq!(parsed.secret.as_slice(), token.secret.as_slice());

        Ok(())
    }

    #[test]
    fn rejects_malformed_tokens() {
        let id = Uuid::nil().simple();

        for bad in [
            format!("lt_v1_{id}.{}", "ab".repeat(SECRET_LEN)),
            format!("sw_v1_{id}.{}", "zz".repeat(SECRET_LEN)),
            format!("sw_v1_{id}.abcd"),
            format!("sw_v1_not-a-uuid.{}", "ab".repeat(SECRET_LEN)),
            "sw_v1".to_string(),
        ] {
            assert_eq!(bad.parse::<ApiToken>().err(), Some(ApiTokenError::Malformed), "{bad}");
        }

        assert_eq!(
            format!("sw_v9_{id}.{}", "ab".repeat(SECRET_LEN))
                .parse::<ApiToken>()
                .err(),
            Some(ApiTokenError::UnsupportedVersion("v9".to_string()))
        );
    }

    #[test]
    fn verifier_is_bound_to_customer() {
        let token = ApiToken::with_secret(Uuid::nil(), [0xCD; SECRET_LEN]);
        let alice = CustomerUuid::from_uuid(Uuid::from_u128(1));
        let bob = CustomerUuid::from_uuid(Uuid::from_u128(2));

        assert_eq!(token.verifier(alice), token.verifier(alice));
        assert_ne!(token.verifier(alice), token.verifier(bob));
        assert_eq!(token.verifier(alice).len(), 64);
    }

    #[test]
    fn generated_tokens_differ() {
        let first = ApiToken::generate();
        let second = ApiToken::generate();

        assert_ne!(first.id, second.id);
        assert_ne!(first.to_string(), second.to_string());
    }
}

//! Core identity types and traits for "log in with" providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Missing subject identifier")]
    MissingSubject,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Well-known claim types. Vendor-specific claims use `urn:` prefixed
/// types instead (e.g. `urn:weibo:screen_name`).
pub mod claim_types {
    pub const SUBJECT: &str = "sub";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const GENDER: &str = "gender";
}

/// A single assertion about the authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

/// Normalized result of a successful login attempt, handed to the host
/// framework's session issuance layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub provider_id: String,
    /// The provider's stable unique identifier for the user. Never empty.
    pub subject: String,
    pub claims: Vec<Claim>,
    /// The profile payload the claims were mapped from, for downstream use.
    pub raw_profile: Option<serde_json::Value>,
}

impl Identity {
    pub fn new(provider_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            subject: subject.into(),
            claims: Vec::new(),
            raw_profile: None,
        }
    }

    pub fn add_claim(&mut self, claim_type: impl Into<String>, value: impl Into<String>) {
        self.claims.push(Claim {
            claim_type: claim_type.into(),
            value: value.into(),
        });
    }

    /// First claim value of the given type, if any.
    pub fn claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim(&self, claim_type: &str) -> bool {
        self.claim(claim_type).is_some()
    }
}

/// A provider the host's authentication pipeline can hand a redirect
/// callback to. The host validates the CSRF `state` parameter before
/// calling `authenticate`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn authenticate(&self, code: &str, redirect_uri: &str) -> IdentityResult<Identity>;
}

//! The provider adapter: code exchange, profile fetch and identity
//! construction for one configured provider.

use crate::client::{OAuth2Client, token_request_form};
use crate::config::{ProviderConfig, SubjectSource};
use crate::error::{OAuth2Error, OAuth2Result};
use crate::hooks::{AdapterHooks, NoopHooks};
use crate::types::{RawProfile, TokenResponse};
use async_trait::async_trait;
use loginwith_core::{Claim, Identity, IdentityError, IdentityProvider, IdentityResult, claim_types};
use std::sync::Arc;
use tracing::info;

/// Generic "log in with" adapter, parameterized by a [`ProviderConfig`]
/// and a set of [`AdapterHooks`]. Each login attempt is an independent,
/// sequential chain of network calls with no state shared between
/// attempts.
#[derive(Clone)]
pub struct ProviderAdapter {
    config: ProviderConfig,
    client: OAuth2Client,
    hooks: Arc<dyn AdapterHooks>,
}

impl ProviderAdapter {
    /// The HTTP client is injected by the host; its timeout and pooling
    /// policy govern all outbound calls.
    pub fn new(config: ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            client: OAuth2Client::new(http),
            hooks: Arc::new(NoopHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AdapterHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Authorization redirect URL for the host to send the user to.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> OAuth2Result<String> {
        self.client
            .authorization_url(&self.config, redirect_uri, state)
    }

    /// Exchange the callback code for tokens.
    pub async fn exchange(&self, code: &str, redirect_uri: &str) -> OAuth2Result<TokenResponse> {
        let mut form = token_request_form(&self.config, code, redirect_uri);
        self.hooks.pre_exchange(&mut form).await?;
        self.client.exchange_code(&self.config, &form).await
    }

    /// Fetch the profile payload, running the separate identifier lookup
    /// first when the provider splits the two. Returns the payload and
    /// the subject obtained from the lookup, if any.
    pub async fn fetch_profile(
        &self,
        tokens: &TokenResponse,
    ) -> OAuth2Result<(RawProfile, Option<String>)> {
        let subject = match &self.config.subject_source {
            SubjectSource::Identification { path } => {
                let endpoint = self.config.identification_endpoint.as_deref().ok_or_else(|| {
                    OAuth2Error::ConfigError(format!(
                        "provider '{}' uses an identification step but no endpoint is configured",
                        self.config.provider_id
                    ))
                })?;
                let payload = self
                    .client
                    .fetch_identification(&self.config, endpoint, tokens)
                    .await?;
                let subject = payload
                    .get_scalar(path)
                    .filter(|s| !s.is_empty())
                    .ok_or(OAuth2Error::MissingIdentifier)?;
                Some(subject)
            }
            SubjectSource::Profile { .. } => None,
        };

        let mut profile = self
            .client
            .fetch_profile(&self.config, tokens, subject.as_deref())
            .await?;
        self.hooks.post_profile(&mut profile).await?;

        Ok((profile, subject))
    }

    /// Build the normalized identity: resolve the subject, apply the
    /// claim-mapping table, attach the raw payload, run the final hook.
    pub async fn build_identity(
        &self,
        profile: &RawProfile,
        tokens: &TokenResponse,
        subject: Option<String>,
    ) -> OAuth2Result<Identity> {
        let subject = match (&self.config.subject_source, subject) {
            (_, Some(subject)) => subject,
            (SubjectSource::Profile { path }, None) => profile
                .get_scalar(path)
                .filter(|s| !s.is_empty())
                .ok_or(OAuth2Error::MissingIdentifier)?,
            (SubjectSource::Identification { .. }, None) => {
                return Err(OAuth2Error::MissingIdentifier);
            }
        };

        let mut identity = Identity::new(self.config.provider_id.clone(), subject);
        for mapping in &self.config.claim_mappings {
            if let Some(value) = profile.get_scalar(&mapping.path) {
                identity.add_claim(&mapping.claim_type, value);
            }
        }

        // The subject is always asserted as a claim, but only once.
        if !identity.has_claim(claim_types::SUBJECT) {
            identity.claims.insert(
                0,
                Claim {
                    claim_type: claim_types::SUBJECT.to_string(),
                    value: identity.subject.clone(),
                },
            );
        }

        identity.raw_profile = Some(profile.as_value().clone());

        self.hooks
            .post_identity(&mut identity, profile, tokens)
            .await?;

        if identity.subject.is_empty() {
            return Err(OAuth2Error::MissingIdentifier);
        }
        Ok(identity)
    }

    /// Complete a login attempt end to end.
    pub async fn authenticate(&self, code: &str, redirect_uri: &str) -> OAuth2Result<Identity> {
        let tokens = self.exchange(code, redirect_uri).await?;
        let (profile, subject) = self.fetch_profile(&tokens).await?;
        let identity = self.build_identity(&profile, &tokens, subject).await?;

        info!(
            "completed login for provider {} subject {}",
            self.config.provider_id, identity.subject
        );
        Ok(identity)
    }
}

#[async_trait]
impl IdentityProvider for ProviderAdapter {
    fn provider_id(&self) -> &str {
        &self.config.provider_id
    }

    async fn authenticate(&self, code: &str, redirect_uri: &str) -> IdentityResult<Identity> {
        ProviderAdapter::authenticate(self, code, redirect_uri)
            .await
            .map_err(|e| IdentityError::ProviderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped_adapter() -> ProviderAdapter {
        let config = ProviderConfig::new(
            "acme",
            "client",
            "secret",
            "https://example.com/auth",
            "https://example.com/token",
            "https://example.com/userinfo",
        )
        .with_subject_source(SubjectSource::Profile {
            path: "id".to_string(),
        })
        .map_claim(claim_types::SUBJECT, "id")
        .map_claim(claim_types::NAME, "name");

        ProviderAdapter::new(config, reqwest::Client::new())
    }

    fn test_tokens() -> TokenResponse {
        TokenResponse::from_json(r#"{"access_token":"T","token_type":"Bearer"}"#).unwrap()
    }

    #[tokio::test]
    async fn mapping_table_yields_exactly_the_configured_claims() {
        let adapter = mapped_adapter();
        let profile =
            RawProfile::new(serde_json::json!({"id": "42", "name": "Alice", "extra": "x"}));

        let identity = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap();

        assert_eq!(identity.subject, "42");
        assert_eq!(
            identity.claims,
            vec![
                Claim {
                    claim_type: claim_types::SUBJECT.to_string(),
                    value: "42".to_string()
                },
                Claim {
                    claim_type: claim_types::NAME.to_string(),
                    value: "Alice".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn absent_mapped_fields_are_skipped_silently() {
        let adapter = mapped_adapter();
        let profile = RawProfile::new(serde_json::json!({"id": "42"}));

        let identity = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap();

        assert_eq!(identity.claims.len(), 1);
        assert!(!identity.has_claim(claim_types::NAME));
    }

    #[tokio::test]
    async fn missing_identifier_is_fatal() {
        let adapter = mapped_adapter();
        let profile = RawProfile::new(serde_json::json!({"name": "Alice"}));

        let err = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OAuth2Error::MissingIdentifier));

        let empty = RawProfile::new(serde_json::json!({"id": "", "name": "Alice"}));
        let err = adapter
            .build_identity(&empty, &test_tokens(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OAuth2Error::MissingIdentifier));
    }

    #[tokio::test]
    async fn identifier_from_the_lookup_step_takes_precedence() {
        let adapter = mapped_adapter();
        let profile = RawProfile::new(serde_json::json!({"name": "Alice"}));

        let identity = adapter
            .build_identity(&profile, &test_tokens(), Some("U123".to_string()))
            .await
            .unwrap();

        assert_eq!(identity.subject, "U123");
        assert_eq!(identity.claim(claim_types::SUBJECT), Some("U123"));
    }

    #[tokio::test]
    async fn building_twice_is_idempotent() {
        let adapter = mapped_adapter();
        let profile = RawProfile::new(serde_json::json!({"id": "42", "name": "Alice"}));

        let first = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap();
        let second = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap();

        assert_eq!(first.claims, second.claims);
        assert_eq!(first.subject, second.subject);
    }

    #[tokio::test]
    async fn raw_profile_is_attached_for_downstream_use() {
        let adapter = mapped_adapter();
        let profile = RawProfile::new(serde_json::json!({"id": "42", "extra": "x"}));

        let identity = adapter
            .build_identity(&profile, &test_tokens(), None)
            .await
            .unwrap();

        assert_eq!(
            identity.raw_profile,
            Some(serde_json::json!({"id": "42", "extra": "x"}))
        );
    }
}

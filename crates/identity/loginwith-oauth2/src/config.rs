//! Provider configuration types.
//!
//! A [`ProviderConfig`] captures everything that differs between
//! providers: endpoints, credentials, scopes, the claim-mapping table and
//! the wire-format quirks of the vendor's API. It is built once at
//! startup and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire format of the token endpoint response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenFormat {
    /// Standard JSON body.
    Json,
    /// URL-query-encoded body (`access_token=..&expires_in=..`), as
    /// returned by QQ.
    FormEncoded,
}

/// How the user-info endpoint expects to be called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileRequest {
    /// GET with an `Authorization: Bearer` header.
    BearerGet,
    /// GET with the access token (and optionally the subject) as query
    /// parameters. When `subject_param` is set, its value is the subject
    /// from the identification step if the provider has one, otherwise
    /// the token-response extra field of the same name (Weibo's `uid`).
    QueryGet {
        token_param: String,
        subject_param: Option<String>,
    },
    /// POST with a form carrying the client id, access token and subject
    /// (QQ's `get_user_info`).
    ConsumerForm {
        key_param: String,
        token_param: String,
        subject_param: String,
    },
}

/// Where the subject identifier comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectSource {
    /// Read from the profile payload at this field path.
    Profile { path: String },
    /// Fetched from a separate identification endpoint before the profile
    /// request (QQ's `me` endpoint), at this field path.
    Identification { path: String },
}

/// One entry of the claim-mapping table: target claim type to JSON field
/// path in the profile payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMapping {
    pub claim_type: String,
    pub path: String,
}

/// Static per-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    /// Endpoint of the separate identifier lookup, for providers with a
    /// `SubjectSource::Identification` flow.
    pub identification_endpoint: Option<String>,
    /// Path the host mounts the provider's redirect callback on.
    pub callback_path: String,
    pub scopes: Vec<String>,
    /// Separator used when joining scopes into the authorization URL.
    /// OAuth2 says space; QQ and Weibo want commas.
    pub scope_delimiter: String,
    /// Additional fixed parameters for the authorization URL.
    pub auth_params: HashMap<String, String>,
    pub token_format: TokenFormat,
    pub profile_request: ProfileRequest,
    /// Strip JSONP-style padding around the JSON object in identification
    /// and profile responses.
    pub strip_padding: bool,
    /// In-body status field; a nonzero value signals an upstream failure
    /// even under HTTP 200 (QQ's `ret`).
    pub status_field: Option<String>,
    pub subject_source: SubjectSource,
    /// Applied in order; absent fields are skipped, not errors.
    pub claim_mappings: Vec<ClaimMapping>,
}

impl ProviderConfig {
    pub fn new(
        provider_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        userinfo_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            userinfo_endpoint: userinfo_endpoint.into(),
            identification_endpoint: None,
            callback_path: "/signin".to_string(),
            scopes: Vec::new(),
            scope_delimiter: " ".to_string(),
            auth_params: HashMap::new(),
            token_format: TokenFormat::Json,
            profile_request: ProfileRequest::BearerGet,
            strip_padding: false,
            status_field: None,
            subject_source: SubjectSource::Profile {
                path: "sub".to_string(),
            },
            claim_mappings: Vec::new(),
        }
    }

    pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = path.into();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scope_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.scope_delimiter = delimiter.into();
        self
    }

    pub fn with_auth_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_params.insert(key.into(), value.into());
        self
    }

    pub fn with_token_format(mut self, format: TokenFormat) -> Self {
        self.token_format = format;
        self
    }

    pub fn with_profile_request(mut self, request: ProfileRequest) -> Self {
        self.profile_request = request;
        self
    }

    pub fn with_identification_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.identification_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_strip_padding(mut self, strip: bool) -> Self {
        self.strip_padding = strip;
        self
    }

    pub fn with_status_field(mut self, field: impl Into<String>) -> Self {
        self.status_field = Some(field.into());
        self
    }

    pub fn with_subject_source(mut self, source: SubjectSource) -> Self {
        self.subject_source = source;
        self
    }

    /// Append an entry to the claim-mapping table.
    pub fn map_claim(mut self, claim_type: impl Into<String>, path: impl Into<String>) -> Self {
        self.claim_mappings.push(ClaimMapping {
            claim_type: claim_type.into(),
            path: path.into(),
        });
        self
    }
}

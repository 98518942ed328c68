//! HTTP client for the OAuth2 login flow.

use crate::config::{ProfileRequest, ProviderConfig, TokenFormat};
use crate::error::{OAuth2Error, OAuth2Result};
use crate::types::{RawProfile, TokenResponse};
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

/// Standard form for the authorization-code grant. The pre-exchange hook
/// may extend it before the request goes out.
pub fn token_request_form(
    config: &ProviderConfig,
    code: &str,
    redirect_uri: &str,
) -> Vec<(String, String)> {
    vec![
        ("grant_type".to_string(), "authorization_code".to_string()),
        ("code".to_string(), code.to_string()),
        ("client_id".to_string(), config.client_id.clone()),
        ("client_secret".to_string(), config.client_secret.clone()),
        ("redirect_uri".to_string(), redirect_uri.to_string()),
    ]
}

/// Performs the outbound calls of a login attempt. Timeout, pooling and
/// connection reuse belong to the injected [`reqwest::Client`]; this
/// layer defines no policy of its own and keeps no state between
/// attempts.
#[derive(Clone)]
pub struct OAuth2Client {
    http: Client,
}

impl OAuth2Client {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Build the authorization redirect URL. The `state` parameter is
    /// generated and validated by the host, never here.
    pub fn authorization_url(
        &self,
        config: &ProviderConfig,
        redirect_uri: &str,
        state: &str,
    ) -> OAuth2Result<String> {
        let mut url = Url::parse(&config.authorization_endpoint)?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("response_type", "code");
            params.append_pair("client_id", &config.client_id);
            params.append_pair("redirect_uri", redirect_uri);
            params.append_pair("state", state);

            if !config.scopes.is_empty() {
                params.append_pair("scope", &config.scopes.join(&config.scope_delimiter));
            }

            for (key, value) in &config.auth_params {
                params.append_pair(key, value);
            }
        }

        debug!(
            "built authorization URL for provider {}",
            config.provider_id
        );
        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens, normalizing JSON and
    /// form-encoded response bodies into the same shape.
    pub async fn exchange_code(
        &self,
        config: &ProviderConfig,
        form: &[(String, String)],
    ) -> OAuth2Result<TokenResponse> {
        let response = self
            .http
            .post(&config.token_endpoint)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "token exchange failed");
            return Err(OAuth2Error::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let tokens = match config.token_format {
            TokenFormat::Json => TokenResponse::from_json(&body)?,
            // Vendors that used to answer with query strings have been
            // migrating to JSON; take whichever actually arrived.
            TokenFormat::FormEncoded if body.trim_start().starts_with('{') => {
                TokenResponse::from_json(&body)?
            }
            TokenFormat::FormEncoded => TokenResponse::from_form_encoded(&body)?,
        };

        debug!(
            "exchanged authorization code for provider {}",
            config.provider_id
        );
        Ok(tokens)
    }

    /// Fetch the identifier-bearing payload from the provider's
    /// identification endpoint (QQ's `me`).
    pub async fn fetch_identification(
        &self,
        config: &ProviderConfig,
        endpoint: &str,
        tokens: &TokenResponse,
    ) -> OAuth2Result<RawProfile> {
        let mut url = Url::parse(endpoint)?;
        url.query_pairs_mut()
            .append_pair("access_token", &tokens.access_token);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                headers = ?headers,
                body = %body,
                "identifier lookup failed"
            );
            return Err(OAuth2Error::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        RawProfile::parse(&body, config.strip_padding)
    }

    /// Fetch the profile payload in the provider's preferred style,
    /// enforcing the configured in-body status field.
    pub async fn fetch_profile(
        &self,
        config: &ProviderConfig,
        tokens: &TokenResponse,
        subject: Option<&str>,
    ) -> OAuth2Result<RawProfile> {
        let response = match &config.profile_request {
            ProfileRequest::BearerGet => {
                self.http
                    .get(&config.userinfo_endpoint)
                    .bearer_auth(&tokens.access_token)
                    .send()
                    .await?
            }
            ProfileRequest::QueryGet {
                token_param,
                subject_param,
            } => {
                let mut url = Url::parse(&config.userinfo_endpoint)?;
                {
                    let mut params = url.query_pairs_mut();
                    params.append_pair(token_param, &tokens.access_token);
                    if let Some(name) = subject_param {
                        let value = subject
                            .map(str::to_string)
                            .or_else(|| tokens.extra_scalar(name));
                        if let Some(value) = value {
                            params.append_pair(name, &value);
                        }
                    }
                }
                self.http.get(url).send().await?
            }
            ProfileRequest::ConsumerForm {
                key_param,
                token_param,
                subject_param,
            } => {
                let subject = subject.ok_or(OAuth2Error::MissingIdentifier)?;
                let form = [
                    (key_param.as_str(), config.client_id.as_str()),
                    (token_param.as_str(), tokens.access_token.as_str()),
                    (subject_param.as_str(), subject),
                ];
                self.http
                    .post(&config.userinfo_endpoint)
                    .form(&form)
                    .send()
                    .await?
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "user info request failed");
            return Err(OAuth2Error::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let profile = RawProfile::parse(&body, config.strip_padding)?;

        // Some providers report failures inside an HTTP 200 body.
        if let Some(field) = &config.status_field {
            let code = profile.get(field).and_then(|v| v.as_i64()).unwrap_or(0);
            if code != 0 {
                error!(
                    status = status.as_u16(),
                    code,
                    body = %body,
                    "provider signaled in-body error"
                );
                return Err(OAuth2Error::UpstreamError {
                    status: status.as_u16(),
                    body,
                });
            }
        }

        debug!("fetched profile for provider {}", config.provider_id);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn comma_scoped_config() -> ProviderConfig {
        ProviderConfig::new(
            "test_provider",
            "test_client_id",
            "test_secret",
            "https://example.com/auth",
            "https://example.com/token",
            "https://example.com/userinfo",
        )
        .with_scopes(["get_user_info", "email"])
        .with_scope_delimiter(",")
    }

    #[test]
    fn authorization_url_carries_the_standard_parameters() {
        let client = OAuth2Client::new(Client::new());
        let config = comma_scoped_config();

        let auth_url = client
            .authorization_url(&config, "http://localhost:3000/callback", "xyzzy")
            .unwrap();

        let url = Url::parse(&auth_url).unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/auth");

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("response_type"), Some(&"code".into()));
        assert_eq!(params.get("client_id"), Some(&"test_client_id".into()));
        assert_eq!(
            params.get("redirect_uri"),
            Some(&"http://localhost:3000/callback".into())
        );
        assert_eq!(params.get("state"), Some(&"xyzzy".into()));
        assert_eq!(params.get("scope"), Some(&"get_user_info,email".into()));
    }

    #[test]
    fn authorization_url_includes_configured_auth_params() {
        let client = OAuth2Client::new(Client::new());
        let config = comma_scoped_config().with_auth_param("display", "mobile");

        let auth_url = client
            .authorization_url(&config, "http://localhost:3000/callback", "s")
            .unwrap();

        let url = Url::parse(&auth_url).unwrap();
        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("display"), Some(&"mobile".into()));
    }

    #[test]
    fn token_request_form_uses_the_authorization_code_grant() {
        let config = comma_scoped_config();
        let form = token_request_form(&config, "the_code", "http://localhost/cb");

        assert!(
            form.contains(&("grant_type".to_string(), "authorization_code".to_string()))
        );
        assert!(form.contains(&("code".to_string(), "the_code".to_string())));
        assert!(form.contains(&("client_id".to_string(), "test_client_id".to_string())));
        assert!(form.contains(&("client_secret".to_string(), "test_secret".to_string())));
        assert!(form.contains(&("redirect_uri".to_string(), "http://localhost/cb".to_string())));
    }
}

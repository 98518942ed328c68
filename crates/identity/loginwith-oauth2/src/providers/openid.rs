//! Generic OpenID-style provider preset.
//!
//! Standard JSON token response, bearer-authenticated user-info endpoint,
//! subject in the `sub` field. Endpoints come from the hosting
//! application since there is no single OpenID issuer.

use crate::config::ProviderConfig;
use loginwith_core::claim_types;

pub const CALLBACK_PATH: &str = "/signin-openid";

pub fn config(
    provider_id: impl Into<String>,
    client_id: impl Into<String>,
    client_secret: impl Into<String>,
    authorization_endpoint: impl Into<String>,
    token_endpoint: impl Into<String>,
    userinfo_endpoint: impl Into<String>,
) -> ProviderConfig {
    ProviderConfig::new(
        provider_id,
        client_id,
        client_secret,
        authorization_endpoint,
        token_endpoint,
        userinfo_endpoint,
    )
    .with_callback_path(CALLBACK_PATH)
    .with_scopes(["openid", "profile", "email"])
    .map_claim(claim_types::SUBJECT, "sub")
    .map_claim(claim_types::NAME, "name")
    .map_claim(claim_types::EMAIL, "email")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProfileRequest, SubjectSource, TokenFormat};

    #[test]
    fn preset_uses_the_standard_flow() {
        let config = config(
            "google",
            "id",
            "secret",
            "https://accounts.google.com/o/oauth2/v2/auth",
            "https://oauth2.googleapis.com/token",
            "https://www.googleapis.com/oauth2/v1/userinfo",
        );

        assert_eq!(config.token_format, TokenFormat::Json);
        assert_eq!(config.profile_request, ProfileRequest::BearerGet);
        assert_eq!(
            config.subject_source,
            SubjectSource::Profile {
                path: "sub".to_string()
            }
        );
        assert_eq!(config.scopes, ["openid", "profile", "email"]);
    }
}

//! Sina Weibo login preset.
//!
//! Weibo speaks standard JSON but expects the access token and the `uid`
//! returned alongside it as query parameters on the user-info request.

use crate::config::{ProfileRequest, ProviderConfig, SubjectSource};
use loginwith_core::claim_types;

pub const AUTHORIZATION_ENDPOINT: &str = "https://api.weibo.com/oauth2/authorize";
pub const TOKEN_ENDPOINT: &str = "https://api.weibo.com/oauth2/access_token";
pub const USERINFO_ENDPOINT: &str = "https://api.weibo.com/2/users/show.json";
pub const CALLBACK_PATH: &str = "/signin-weibo";

pub fn config(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig::new(
        "weibo",
        client_id,
        client_secret,
        AUTHORIZATION_ENDPOINT,
        TOKEN_ENDPOINT,
        USERINFO_ENDPOINT,
    )
    .with_callback_path(CALLBACK_PATH)
    .with_scopes(["email"])
    .with_scope_delimiter(",")
    .with_profile_request(ProfileRequest::QueryGet {
        token_param: "access_token".to_string(),
        subject_param: Some("uid".to_string()),
    })
    .with_subject_source(SubjectSource::Profile {
        path: "id".to_string(),
    })
    .map_claim(claim_types::SUBJECT, "id")
    .map_claim(claim_types::NAME, "name")
    .map_claim(claim_types::GENDER, "gender")
    .map_claim("urn:weibo:screen_name", "screen_name")
    .map_claim("urn:weibo:profile_image_url", "profile_image_url")
    .map_claim("urn:weibo:avatar_large", "avatar_large")
    .map_claim("urn:weibo:avatar_hd", "avatar_hd")
    .map_claim("urn:weibo:cover_image_phone", "cover_image_phone")
    .map_claim("urn:weibo:location", "location")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenFormat;

    #[test]
    fn preset_threads_uid_into_the_profile_query() {
        let config = config("id", "secret");

        assert_eq!(config.token_format, TokenFormat::Json);
        assert_eq!(
            config.profile_request,
            ProfileRequest::QueryGet {
                token_param: "access_token".to_string(),
                subject_param: Some("uid".to_string()),
            }
        );
        assert_eq!(
            config.subject_source,
            SubjectSource::Profile {
                path: "id".to_string()
            }
        );
    }

    #[test]
    fn preset_maps_the_vendor_claims() {
        let config = config("id", "secret");
        let types: Vec<_> = config
            .claim_mappings
            .iter()
            .map(|m| m.claim_type.as_str())
            .collect();

        assert!(types.contains(&claim_types::SUBJECT));
        assert!(types.contains(&"urn:weibo:screen_name"));
        assert!(types.contains(&"urn:weibo:avatar_hd"));
        assert_eq!(config.claim_mappings.len(), 9);
    }
}

//! Tencent QQ login preset.
//!
//! QQ deviates from the standard flow in every step: the token response
//! is URL-query-encoded, the subject identifier comes from a separate
//! `me` endpoint whose JSON is wrapped in JSONP padding, the user-info
//! endpoint is a form POST carrying the consumer key and identifier, and
//! failures are reported through a `ret` field inside HTTP 200 bodies.

use crate::config::{ProfileRequest, ProviderConfig, SubjectSource, TokenFormat};
use loginwith_core::claim_types;

pub const AUTHORIZATION_ENDPOINT: &str = "https://graph.qq.com/oauth2.0/authorize";
pub const TOKEN_ENDPOINT: &str = "https://graph.qq.com/oauth2.0/token";
pub const IDENTIFICATION_ENDPOINT: &str = "https://graph.qq.com/oauth2.0/me";
pub const USERINFO_ENDPOINT: &str = "https://graph.qq.com/user/get_user_info";
pub const CALLBACK_PATH: &str = "/signin-qq";

pub fn config(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig::new(
        "qq",
        client_id,
        client_secret,
        AUTHORIZATION_ENDPOINT,
        TOKEN_ENDPOINT,
        USERINFO_ENDPOINT,
    )
    .with_callback_path(CALLBACK_PATH)
    .with_scopes(["get_user_info"])
    .with_scope_delimiter(",")
    .with_token_format(TokenFormat::FormEncoded)
    .with_identification_endpoint(IDENTIFICATION_ENDPOINT)
    .with_subject_source(SubjectSource::Identification {
        path: "openid".to_string(),
    })
    .with_profile_request(ProfileRequest::ConsumerForm {
        key_param: "oauth_consumer_key".to_string(),
        token_param: "access_token".to_string(),
        subject_param: "openid".to_string(),
    })
    .with_strip_padding(true)
    .with_status_field("ret")
    .map_claim(claim_types::NAME, "nickname")
    .map_claim(claim_types::GENDER, "gender")
    .map_claim("urn:qq:figureurl_qq_1", "figureurl_qq_1")
    .map_claim("urn:qq:figureurl_qq_2", "figureurl_qq_2")
}

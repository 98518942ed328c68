//! Wire types shared by the provider adapters.

use crate::error::{OAuth2Error, OAuth2Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized token endpoint response. The same shape regardless of
/// whether the provider answered with JSON or a URL-query-encoded string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    /// Fields beyond the standard set (Weibo's `uid` ends up here).
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TokenResponse {
    pub fn from_json(body: &str) -> OAuth2Result<Self> {
        let tokens: TokenResponse = serde_json::from_str(body)
            .map_err(|e| OAuth2Error::MalformedResponse(format!("token response: {e}")))?;
        if tokens.access_token.is_empty() {
            return Err(OAuth2Error::MalformedResponse(
                "token response carries no access_token".to_string(),
            ));
        }
        Ok(tokens)
    }

    /// Parse a `key=value&..` token response (QQ) into the normalized shape.
    pub fn from_form_encoded(body: &str) -> OAuth2Result<Self> {
        let mut tokens = TokenResponse {
            access_token: String::new(),
            token_type: None,
            expires_in: None,
            refresh_token: None,
            scope: None,
            id_token: None,
            extra: HashMap::new(),
        };

        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            match key.as_ref() {
                "access_token" => tokens.access_token = value.into_owned(),
                "token_type" => tokens.token_type = Some(value.into_owned()),
                "expires_in" => tokens.expires_in = value.parse().ok(),
                "refresh_token" => tokens.refresh_token = Some(value.into_owned()),
                "scope" => tokens.scope = Some(value.into_owned()),
                "id_token" => tokens.id_token = Some(value.into_owned()),
                _ => {
                    tokens.extra.insert(
                        key.into_owned(),
                        serde_json::Value::String(value.into_owned()),
                    );
                }
            }
        }

        if tokens.access_token.is_empty() {
            return Err(OAuth2Error::MalformedResponse(
                "token response carries no access_token".to_string(),
            ));
        }
        Ok(tokens)
    }

    /// Extra field as a string, stringifying scalar JSON values.
    pub fn extra_scalar(&self, key: &str) -> Option<String> {
        self.extra.get(key).and_then(scalar_to_string)
    }
}

/// Profile payload fetched from a provider's user-info endpoint. An
/// opaque JSON tree with safe path lookup instead of dynamic typing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile(serde_json::Value);

impl RawProfile {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a response body, optionally stripping JSONP-style padding
    /// around the first `{` .. last `}` (QQ wraps its payloads in
    /// `callback( ... );`).
    pub fn parse(body: &str, strip_padding: bool) -> OAuth2Result<Self> {
        let text = if strip_padding {
            extract_json_object(body)?
        } else {
            body
        };
        let value = serde_json::from_str(text)
            .map_err(|e| OAuth2Error::MalformedResponse(format!("profile payload: {e}")))?;
        Ok(Self(value))
    }

    /// Look up a dotted field path, `None` when any segment is absent.
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Field as a claim value: strings verbatim, numbers and booleans
    /// stringified, anything else absent.
    pub fn get_scalar(&self, path: &str) -> Option<String> {
        self.get(path).and_then(scalar_to_string)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

pub(crate) fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Slice out the first `{` through the last `}` of a padded body.
pub(crate) fn extract_json_object(body: &str) -> OAuth2Result<&str> {
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if end >= start => Ok(&body[start..=end]),
        _ => Err(OAuth2Error::MalformedResponse(
            "no JSON object found in response body".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_token_response_is_normalized() {
        let tokens = TokenResponse::from_json(
            r#"{"access_token":"ABC","token_type":"Bearer","expires_in":3600,"uid":"999"}"#,
        )
        .unwrap();

        assert_eq!(tokens.access_token, "ABC");
        assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
        assert_eq!(tokens.expires_in, Some(3600));
        assert_eq!(tokens.extra_scalar("uid").as_deref(), Some("999"));
    }

    #[test]
    fn form_encoded_token_response_matches_json_shape() {
        let tokens =
            TokenResponse::from_form_encoded("access_token=ABC&expires_in=3600&refresh_token=DEF")
                .unwrap();

        assert_eq!(tokens.access_token, "ABC");
        assert_eq!(tokens.expires_in, Some(3600));
        assert_eq!(tokens.refresh_token.as_deref(), Some("DEF"));
        assert!(tokens.extra.is_empty());
    }

    #[test]
    fn token_response_without_access_token_is_malformed() {
        let err = TokenResponse::from_form_encoded("expires_in=3600").unwrap_err();
        assert!(matches!(err, OAuth2Error::MalformedResponse(_)));

        let err = TokenResponse::from_json(r#"{"expires_in":3600}"#).unwrap_err();
        assert!(matches!(err, OAuth2Error::MalformedResponse(_)));
    }

    #[test]
    fn padded_profile_is_extracted_exactly() {
        let profile =
            RawProfile::parse(r#"blahblah{"ret":0,"openid":"U123"}trailing"#, true).unwrap();

        assert_eq!(
            profile.as_value(),
            &serde_json::json!({"ret": 0, "openid": "U123"})
        );
        assert_eq!(profile.get_str("openid"), Some("U123"));
    }

    #[test]
    fn body_without_json_object_is_malformed() {
        let err = RawProfile::parse("no braces here", true).unwrap_err();
        assert!(matches!(err, OAuth2Error::MalformedResponse(_)));
    }

    #[test]
    fn dotted_path_lookup_descends_objects() {
        let profile = RawProfile::new(serde_json::json!({
            "user": {"id": 42, "verified": true, "tags": ["a"]}
        }));

        assert_eq!(profile.get_scalar("user.id").as_deref(), Some("42"));
        assert_eq!(profile.get_scalar("user.verified").as_deref(), Some("true"));
        assert_eq!(profile.get_scalar("user.tags"), None);
        assert_eq!(profile.get("user.missing"), None);
        assert_eq!(profile.get("user.id.deeper"), None);
    }
}

//! Extension points around the login flow.

use crate::error::OAuth2Result;
use crate::types::{RawProfile, TokenResponse};
use async_trait::async_trait;
use loginwith_core::Identity;

/// Per-provider customization points, the counterpart of the host
/// framework's ticket-creation events. All methods default to no-ops; an
/// error from any hook is fatal to the login attempt.
#[async_trait]
pub trait AdapterHooks: Send + Sync {
    /// Inspect or extend the token request form before the exchange.
    async fn pre_exchange(&self, form: &mut Vec<(String, String)>) -> OAuth2Result<()> {
        let _ = form;
        Ok(())
    }

    /// Inspect or rewrite the profile payload before claims are mapped.
    async fn post_profile(&self, profile: &mut RawProfile) -> OAuth2Result<()> {
        let _ = profile;
        Ok(())
    }

    /// Inspect or extend the identity before it is handed to the host.
    async fn post_identity(
        &self,
        identity: &mut Identity,
        profile: &RawProfile,
        tokens: &TokenResponse,
    ) -> OAuth2Result<()> {
        let _ = (identity, profile, tokens);
        Ok(())
    }
}

/// Hooks that leave everything untouched.
pub struct NoopHooks;

#[async_trait]
impl AdapterHooks for NoopHooks {}

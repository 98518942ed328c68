//! OAuth2 "log in with" provider adapters.
//!
//! A single generic [`ProviderAdapter`] performs the authorization-code
//! exchange and the user-info fetch for a provider described by a
//! [`ProviderConfig`], normalizing vendor quirks (form-encoded token
//! responses, JSONP padding, in-body status codes, split
//! identifier/profile endpoints) into one identity shape. Preset
//! configurations for OpenID-style providers, QQ and Weibo live under
//! [`providers`].
//!
//! CSRF `state` correlation, session issuance and the surrounding request
//! pipeline stay with the hosting framework; the adapter only runs after
//! the host has validated the redirect callback.

mod adapter;
mod client;
mod config;
mod error;
mod hooks;
mod types;

pub mod providers;


pub use adapter::ProviderAdapter;
pub use client::{OAuth2Client, token_request_form};
pub use config::{ClaimMapping, ProfileRequest, ProviderConfig, SubjectSource, TokenFormat};
pub use error::{OAuth2Error, OAuth2Result};
pub use hooks::{AdapterHooks, NoopHooks};
pub use types::{RawProfile, TokenResponse};

// Re-export the host-facing contract for convenience
pub use loginwith_core::{
    Claim, Identity, IdentityError, IdentityProvider, IdentityResult, claim_types,
};

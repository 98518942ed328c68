//! Preset configurations for the supported identity providers.

pub mod openid;
pub mod qq;
pub mod weibo;

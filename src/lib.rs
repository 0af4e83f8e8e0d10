//! lovequote-rs library
//!
//! Fetches a love quote, translates it and delivers it through a selectable
//! notification channel, escalating every failure to a local fallback channel.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}

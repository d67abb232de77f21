//! # Core Module
//!
//! Settings for the framework itself, as opposed to the per-mod config
//! files handled by [`crate::config`].
//!
//! ## Organization
//!
//! - **Settings**: file-backed framework settings (log level, config
//!   directory, config file format)

pub mod settings;

pub use settings::{CoreSettings, SettingsError, SettingsFile};

// * Quarry Settings - runtime tuning configuration for the content-extraction
// * pipeline. Parses the INI-style settings file, validates it into a typed
// * model, and exposes the policy helpers the pipeline builds from it.

pub mod config;
pub mod policy;

pub use config::{ConfigError, Settings};
pub use policy::{RepetitionFilter, UrlPolicy, UserAgentPool};

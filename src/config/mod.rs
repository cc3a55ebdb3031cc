pub mod error;
pub mod ini;
pub mod settings;

// * Re-exports for convenient access
pub use error::ConfigError;
pub use ini::{unquote, IniDocument, IniEntry, IniSection, DEFAULT_SECTION};
pub use settings::{
    DedupSettings, DownloadSettings, ExtractionSettings, Settings, UrlSettings, RECOGNIZED_KEYS,
};

//! Configuration loading for VeriFuzz.
//!
//! Fuzzing runs are configured through `verifuzz.toml`: iteration caps,
//! generator bounds, and the external tool tables (synthesizers, the
//! reference simulator, and the equivalence checker). Tool defaults are a
//! configuration value passed explicitly to the drivers; there is no
//! process-wide mutable singleton.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{
    EquivConfig, FuzzConfig, FuzzSection, GenerateSection, SimToolConfig, SynthKind,
    SynthToolConfig, DEFAULT_CONFIG_TOML,
};

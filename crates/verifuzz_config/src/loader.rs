//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::FuzzConfig;
use std::path::Path;

/// Loads and validates a `verifuzz.toml` configuration file.
pub fn load_config(path: &Path) -> Result<FuzzConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FuzzConfig, ConfigError> {
    let config: FuzzConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
fn validate_config(config: &FuzzConfig) -> Result<(), ConfigError> {
    if config.generate.max_width == 0 {
        return Err(ConfigError::ValidationError(
            "generate.max_width must be at least 1".to_string(),
        ));
    }
    if config.generate.max_ports == 0 {
        return Err(ConfigError::ValidationError(
            "generate.max_ports must be at least 1".to_string(),
        ));
    }
    // The testbench applies 32-byte input blocks; the generated interface
    // has to fit inside one block.
    if config.generate.max_width * config.generate.max_ports > 256 {
        return Err(ConfigError::ValidationError(
            "generate.max_width * generate.max_ports must not exceed 256 bits".to_string(),
        ));
    }
    if config.fuzz.prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "fuzz.prefix must not be empty".to_string(),
        ));
    }
    for (name, synth) in &config.synth {
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "synth table keys must not be empty".to_string(),
            ));
        }
        if synth.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "synth.{name}.timeout_secs must be at least 1"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.fuzz.iterations, 5);
        assert_eq!(config.fuzz.size, 5);
        assert!(config.synth.is_empty());
    }

    #[test]
    fn rejects_zero_max_width() {
        let r = load_config_from_str("[generate]\nmax_width = 0\n");
        assert!(matches!(r, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_oversized_interface() {
        let r = load_config_from_str("[generate]\nmax_width = 64\nmax_ports = 16\n");
        assert!(matches!(r, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_zero_synth_timeout() {
        let r = load_config_from_str("[synth.y]\nkind = \"yosys\"\ntimeout_secs = 0\n");
        assert!(matches!(r, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_bad_toml() {
        let r = load_config_from_str("[fuzz\niterations = ");
        assert!(matches!(r, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn parses_full_config() {
        let toml = r#"
[fuzz]
iterations = 3
size = 7
output_dir = "out"
prefix = "t"
keep = true

[generate]
max_width = 8
max_ports = 4
max_items = 6

[synth.yosys]
kind = "yosys"
path = "/opt/yosys/bin/yosys"
output = "yosys_syn.v"

[synth.xst]
kind = "xst"
netgen_path = "/opt/ise/netgen"

[equiv]
path = "yosys"
timeout_secs = 30
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fuzz.iterations, 3);
        assert!(config.fuzz.keep);
        assert_eq!(config.synth.len(), 2);
        assert_eq!(
            config.synth["yosys"].path.as_deref(),
            Some("/opt/yosys/bin/yosys")
        );
        assert_eq!(
            config.synth["xst"].netgen_path.as_deref(),
            Some("/opt/ise/netgen")
        );
        assert_eq!(config.equiv.timeout_secs, 30);
    }
}

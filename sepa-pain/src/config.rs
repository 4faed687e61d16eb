//! Output configuration

use serde::{Deserialize, Serialize};

/// Rendering options for emitted documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitConfig {
    /// Indent nested elements, one per line
    pub pretty_print: bool,

    /// Spaces per nesting level when pretty printing
    pub indent_width: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            pretty_print: true,
            indent_width: 2,
        }
    }
}

impl EmitConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EmitConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = EmitConfig::default();

        if let Ok(pretty) = std::env::var("SEPA_PRETTY_PRINT") {
            config.pretty_print = pretty != "0" && !pretty.eq_ignore_ascii_case("false");
        }

        if let Ok(width) = std::env::var("SEPA_INDENT_WIDTH") {
            config.indent_width = width
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid indent width: {}", width)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pretty_print_with_two_spaces() {
        let config = EmitConfig::default();
        assert!(config.pretty_print);
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn parses_from_toml() {
        let config: EmitConfig = toml::from_str(
            r#"
            pretty_print = false
            indent_width = 4
            "#,
        )
        .unwrap();
        assert!(!config.pretty_print);
        assert_eq!(config.indent_width, 4);
    }
}

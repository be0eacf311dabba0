//! Preset file format for reverb settings.
//!
//! Presets are TOML files carrying the live parameter surface, so a
//! setting auditioned once can be replayed by name.

use std::path::Path;

use serde::Deserialize;

/// Preset file format.
#[derive(Debug, Deserialize)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    #[allow(dead_code)]
    pub description: Option<String>,
    /// Diffuser reflection coefficient.
    pub reflection: f32,
    /// Diffuser pole angle in radians.
    pub angle: f32,
}

impl Preset {
    /// Load a preset from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_preset() {
        let preset: Preset = toml::from_str(
            r#"
            name = "small plate"
            reflection = 0.45
            angle = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(preset.name, "small plate");
        assert!((preset.reflection - 0.45).abs() < 1e-7);
        assert!((preset.angle - 0.8).abs() < 1e-7);
        assert!(preset.description.is_none());
    }

    #[test]
    fn test_missing_parameters_rejected() {
        let result: Result<Preset, _> = toml::from_str(r#"name = "broken""#);
        assert!(result.is_err());
    }
}

//! Compile-time registry of analysis presets.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new municipality requires creating a TOML file in `presets/`
//! and adding a corresponding entry here.

use crate::SourceError;
use crate::config::AnalysisConfig;

/// Number of registered presets. Enforced by a test.
#[cfg(test)]
const EXPECTED_PRESET_COUNT: usize = 3;

/// Embedded TOML preset definitions.
const PRESET_TOMLS: &[(&str, &str)] = &[
    ("helsinki", include_str!("../presets/helsinki.toml")),
    ("espoo", include_str!("../presets/espoo.toml")),
    ("vantaa", include_str!("../presets/vantaa.toml")),
];

/// Returns all registered presets.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_presets() -> Vec<AnalysisConfig> {
    PRESET_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            AnalysisConfig::from_toml(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse preset '{name}': {e}"))
        })
        .collect()
}

/// Looks up a preset by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownPreset`] if no preset has this id.
pub fn preset(id: &str) -> Result<AnalysisConfig, SourceError> {
    all_presets()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SourceError::UnknownPreset { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_presets() {
        let presets = all_presets();
        assert_eq!(
            presets.len(),
            EXPECTED_PRESET_COUNT,
            "Expected {EXPECTED_PRESET_COUNT} presets, found {}. \
             Update EXPECTED_PRESET_COUNT after adding/removing presets.",
            presets.len()
        );
    }

    #[test]
    fn preset_ids_are_unique_and_match_registry_names() {
        let mut seen = BTreeSet::new();
        for ((name, _), preset) in PRESET_TOMLS.iter().zip(all_presets()) {
            assert_eq!(*name, preset.id, "Registry name and preset id differ");
            assert!(seen.insert(preset.id.clone()), "Duplicate preset ID: {}", preset.id);
        }
    }

    #[test]
    fn all_presets_have_required_fields() {
        for preset in &all_presets() {
            assert!(!preset.name.is_empty(), "Preset {} has empty name", preset.id);
            let code = preset.municipality_code.as_deref().unwrap_or_default();
            assert!(
                code.len() == 3 && code.chars().all(|c| c.is_ascii_digit()),
                "Preset {} has invalid municipality code: {code}",
                preset.id
            );
            assert!(
                !preset.postal_areas.fields.postal_code.is_empty(),
                "Preset {} has empty postal code field",
                preset.id
            );
        }
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(preset("helsinki").is_ok());
        assert!(matches!(
            preset("turku"),
            Err(SourceError::UnknownPreset { .. })
        ));
    }
}

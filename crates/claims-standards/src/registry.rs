//! Carrier registry: the ordered, immutable set of known carrier patterns.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::carrier::CarrierPattern;
use crate::embedded::CARRIERS_TOML;
use crate::error::{RegistryError, Result};

/// On-disk shape of a carrier file.
#[derive(Debug, Deserialize)]
struct CarrierFile {
    #[serde(default)]
    carriers: Vec<CarrierPattern>,
}

/// Ordered collection of carrier patterns.
///
/// Order is significant: detection breaks score ties by registry order.
#[derive(Debug, Clone, Default)]
pub struct CarrierRegistry {
    carriers: Vec<CarrierPattern>,
}

impl CarrierRegistry {
    /// The built-in registry, parsed once per process.
    pub fn builtin() -> &'static CarrierRegistry {
        static BUILTIN: OnceLock<CarrierRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::load_builtin().expect("Invalid embedded carrier registry")
        })
    }

    /// Parses the embedded seed data into a fresh registry.
    pub fn load_builtin() -> Result<Self> {
        Self::from_toml_str(CARRIERS_TOML, "embedded carriers.toml")
    }

    /// Parses carriers from TOML text. `origin` names the source in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let file: CarrierFile = toml::from_str(content).map_err(|source| RegistryError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_carriers(file.carriers, origin)
    }

    /// Loads carriers from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RegistryError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Builds a registry from carriers, checking names.
    pub fn from_carriers(carriers: Vec<CarrierPattern>, origin: &str) -> Result<Self> {
        validate_names(&carriers, origin)?;
        Ok(Self { carriers })
    }

    /// Returns a registry with `extra` appended after the existing carriers.
    pub fn with_carriers(&self, extra: Vec<CarrierPattern>, origin: &str) -> Result<Self> {
        let mut carriers = self.carriers.clone();
        carriers.extend(extra);
        Self::from_carriers(carriers, origin)
    }

    /// Returns a registry extended with the carriers of a TOML file.
    pub fn with_carriers_from_path(&self, path: &Path) -> Result<Self> {
        let extra = Self::from_path(path)?;
        self.with_carriers(extra.carriers, &path.display().to_string())
    }

    /// Finds a carrier by name or alias (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&CarrierPattern> {
        self.carriers
            .iter()
            .find(|carrier| carrier.name.eq_ignore_ascii_case(name.trim()))
            .or_else(|| self.carriers.iter().find(|carrier| carrier.matches_name(name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarrierPattern> {
        self.carriers.iter()
    }

    pub fn carriers(&self) -> &[CarrierPattern] {
        &self.carriers
    }

    pub fn names(&self) -> Vec<&str> {
        self.carriers.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }
}

fn validate_names(carriers: &[CarrierPattern], origin: &str) -> Result<()> {
    let mut seen = BTreeSet::new();
    for (index, carrier) in carriers.iter().enumerate() {
        let name = carrier.name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName {
                origin: origin.to_string(),
                index,
            });
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(RegistryError::DuplicateName {
                origin: origin.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_seed_carriers() {
        let registry = CarrierRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["Anthem", "ESI", "UnitedHealthcare", "Aetna", "Cigna"]
        );
    }

    #[test]
    fn test_find_by_alias() {
        let registry = CarrierRegistry::builtin();
        assert_eq!(registry.find("uhc").map(|c| c.name.as_str()), Some("UnitedHealthcare"));
        assert_eq!(registry.find("CIGNA").map(|c| c.name.as_str()), Some("Cigna"));
        assert!(registry.find("Humana").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let content = r#"
[[carriers]]
name = "Acme"

[[carriers]]
name = "ACME"
"#;
        let err = CarrierRegistry::from_toml_str(content, "test").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let content = "[[carriers]]\nname = \"  \"\n";
        let err = CarrierRegistry::from_toml_str(content, "test").unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName { index: 0, .. }));
    }

    #[test]
    fn test_unknown_format_token_is_parse_error() {
        let content = "[[carriers]]\nname = \"Acme\"\ndate_formats = [\"DD.MM.YYYY\"]\n";
        let err = CarrierRegistry::from_toml_str(content, "test").unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
    }
}

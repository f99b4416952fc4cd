//! Operation label normalization against a closed vocabulary.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::models::config::OperationConfig;
use crate::normalize::capitalize;

/// Compiled operation vocabulary.
#[derive(Debug, Clone)]
pub struct OperationVocabulary {
    known: HashSet<String>,
    default_label: String,
    coerce_unknown: bool,
}

impl OperationVocabulary {
    pub fn new(config: &OperationConfig) -> Result<Self, ConfigError> {
        if config.coerce_unknown && config.default_label.trim().is_empty() {
            return Err(ConfigError::Empty("default operation label"));
        }

        Ok(Self {
            known: config.known.iter().map(|l| capitalize(l.trim())).collect(),
            default_label: config.default_label.clone(),
            coerce_unknown: config.coerce_unknown,
        })
    }

    /// Capitalize a raw label and apply the coercion policy.
    pub fn normalize(&self, raw: &str) -> String {
        let label = capitalize(raw.trim());
        if self.coerce_unknown && !self.known.contains(&label) {
            self.default_label.clone()
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(coerce: bool) -> OperationVocabulary {
        OperationVocabulary::new(&OperationConfig {
            coerce_unknown: coerce,
            ..OperationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_known_label_is_capitalized() {
        assert_eq!(vocabulary(true).normalize("ПЕРЕВОД"), "Перевод");
    }

    #[test]
    fn test_unknown_label_coerced() {
        assert_eq!(vocabulary(true).normalize("кэшбэк"), "Покупка");
    }

    #[test]
    fn test_unknown_label_kept_without_coercion() {
        assert_eq!(vocabulary(false).normalize("кэшбэк"), "Кэшбэк");
    }

    #[test]
    fn test_coercion_requires_default_label() {
        let result = OperationVocabulary::new(&OperationConfig {
            default_label: String::new(),
            ..OperationConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::Empty(_))));
    }
}

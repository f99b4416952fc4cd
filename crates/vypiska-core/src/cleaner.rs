//! Description cleaning: footer truncation, noise removal, whitespace folding.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;
use crate::models::config::CleanerConfig;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Compiled description cleaner shared by both statement formats.
#[derive(Debug, Clone)]
pub struct DescriptionCleaner {
    /// Alternation of all footer markers, `None` when no markers are configured.
    footer: Option<Regex>,
    /// Noise patterns in configured order.
    noise: Vec<Regex>,
}

impl DescriptionCleaner {
    /// Compile markers and noise patterns.
    pub fn new(config: &CleanerConfig) -> Result<Self, ConfigError> {
        if config.footer_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Empty("footer marker"));
        }

        let footer = if config.footer_markers.is_empty() {
            None
        } else {
            let alternation = config
                .footer_markers
                .iter()
                .map(|m| regex::escape(m))
                .collect::<Vec<_>>()
                .join("|");
            let regex = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::pattern("footer markers", e))?;
            Some(regex)
        };

        let noise = config
            .noise_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::pattern(format!("noise pattern {:?}", p), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { footer, noise })
    }

    /// Truncate `text` at the earliest footer marker, matched case-insensitively.
    pub fn strip_footer<'a>(&self, text: &'a str) -> &'a str {
        match self.footer.as_ref().and_then(|re| re.find(text)) {
            Some(m) => &text[..m.start()],
            None => text,
        }
    }

    /// Strip footer, remove noise, fold whitespace.
    ///
    /// The pass is repeated until the text is stable, so the result is always
    /// a fixed point: cleaning it again changes nothing.
    pub fn clean(&self, text: &str) -> String {
        let mut current = self.clean_once(text);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let mut text = self.strip_footer(text).to_string();

        for pattern in &self.noise {
            text = pattern.replace_all(&text, "").into_owned();
        }

        WHITESPACE.replace_all(&text, " ").trim().to_string()
    }
}

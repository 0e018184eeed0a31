//! Section keyword registry.
//!
//! Keywords are stored lower-cased and looked up exactly. Registering a
//! keyword twice is an error rather than a silent override.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// How a recognized section is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStrategy {
    /// Labeled field list of `(name, type, description)` entries.
    Fields { label: String },
    /// Labeled single `(type, description)` pair.
    ReturnsLike { label: String, require_type: bool },
    /// `.. directive:: param` followed by an indented body.
    Admonition { directive: String },
    /// `:param:` / `:type:` pairs.
    Params,
    /// `:keyword:` / `:kwtype:` pairs.
    KeywordParams,
    /// `:returns:` / `:rtype:`.
    Returns,
    /// `:raises Type:` entries.
    Raises,
    /// `.. attribute::` blocks.
    Attributes,
    /// Note/warning style directive around free text.
    Notice { directive: String },
    /// `.. rubric::` titled with the section header as written.
    Rubric,
}

/// Options for [`SectionRegistry::register_returns_section`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnsOptions {
    /// Treat a first line without a trailing colon as a bare type.
    pub require_type: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    entries: HashMap<String, SectionStrategy>,
}

const PARAM_KEYWORDS: &[&str] = &["args", "arguments", "parameters", "params"];
const KEYWORD_PARAM_KEYWORDS: &[&str] = &["keyword args", "keyword arguments", "kwargs"];
const RETURN_KEYWORDS: &[&str] = &["return", "returns"];
const YIELD_KEYWORDS: &[&str] = &["yield", "yields"];
const RAISE_KEYWORDS: &[&str] = &["raise", "raises", "exception", "exceptions"];
const RUBRIC_KEYWORDS: &[&str] = &["example", "examples", "references"];

const NOTICES: &[(&str, &str)] = &[
    ("attention", "attention"),
    ("caution", "caution"),
    ("danger", "danger"),
    ("error", "error"),
    ("hint", "hint"),
    ("important", "important"),
    ("note", "note"),
    ("notes", "note"),
    ("see also", "seealso"),
    ("tip", "tip"),
    ("todo", "todo"),
    ("warning", "warning"),
    ("warnings", "warning"),
    ("warn", "warning"),
];

impl SectionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The base Google docstring grammar.
    pub fn google() -> Self {
        let mut registry = Self::new();
        for &keyword in PARAM_KEYWORDS {
            registry.entries.insert(keyword.into(), SectionStrategy::Params);
        }
        for &keyword in KEYWORD_PARAM_KEYWORDS {
            registry.entries.insert(keyword.into(), SectionStrategy::KeywordParams);
        }
        for &keyword in RETURN_KEYWORDS {
            registry.entries.insert(keyword.into(), SectionStrategy::Returns);
        }
        for &keyword in YIELD_KEYWORDS {
            registry.entries.insert(
                keyword.into(),
                SectionStrategy::ReturnsLike {
                    label: "Yields".into(),
                    require_type: false,
                },
            );
        }
        for &keyword in RAISE_KEYWORDS {
            registry.entries.insert(keyword.into(), SectionStrategy::Raises);
        }
        for &keyword in RUBRIC_KEYWORDS {
            registry.entries.insert(keyword.into(), SectionStrategy::Rubric);
        }
        for &(keyword, directive) in NOTICES {
            registry.entries.insert(
                keyword.into(),
                SectionStrategy::Notice {
                    directive: directive.into(),
                },
            );
        }
        registry.entries.insert("attributes".into(), SectionStrategy::Attributes);
        registry.entries.insert(
            "other parameters".into(),
            SectionStrategy::Fields {
                label: "Other Parameters".into(),
            },
        );
        registry
    }

    /// The base grammar plus the built-in custom sections.
    pub fn extended() -> Result<Self> {
        let mut registry = Self::google();
        registry.register_returns_section(&["context"], "Context", ReturnsOptions::default())?;
        registry.register_returns_section(
            &["type"],
            "Type",
            ReturnsOptions { require_type: true },
        )?;
        registry.register_fields_section(&["keys"], "Keys")?;
        registry.register_fields_section(&["model attributes"], "Model Attributes")?;
        registry.register_fields_section(&["option args"], "Option Args")?;
        registry.register_fields_section(&["tuple"], "Tuple")?;
        registry.register_admonition_section(&["deprecated"], "deprecated")?;
        registry.register_admonition_section(&["version added"], "versionadded")?;
        registry.register_admonition_section(&["version changed"], "versionchanged")?;
        Ok(registry)
    }

    /// Register a labeled single type/description section.
    pub fn register_returns_section(
        &mut self,
        keywords: &[&str],
        label: &str,
        options: ReturnsOptions,
    ) -> Result<()> {
        self.insert_all(keywords, || SectionStrategy::ReturnsLike {
            label: label.to_string(),
            require_type: options.require_type,
        })
    }

    /// Register a labeled field list section.
    pub fn register_fields_section(&mut self, keywords: &[&str], label: &str) -> Result<()> {
        self.insert_all(keywords, || SectionStrategy::Fields {
            label: label.to_string(),
        })
    }

    /// Register a versioned admonition section rendered as `directive`.
    pub fn register_admonition_section(&mut self, keywords: &[&str], directive: &str) -> Result<()> {
        self.insert_all(keywords, || SectionStrategy::Admonition {
            directive: directive.to_string(),
        })
    }

    /// Register a free-form section rendered under a rubric.
    pub fn register_rubric_section(&mut self, keywords: &[&str]) -> Result<()> {
        self.insert_all(keywords, || SectionStrategy::Rubric)
    }

    /// Look up a keyword, case-insensitively.
    pub fn get(&self, keyword: &str) -> Option<&SectionStrategy> {
        self.entries.get(&keyword.to_lowercase())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    // Validate every keyword before inserting any, so a failed call leaves
    // the registry unchanged.
    fn insert_all(
        &mut self,
        keywords: &[&str],
        strategy: impl Fn() -> SectionStrategy,
    ) -> Result<()> {
        let mut keys: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let key = keyword.trim().to_lowercase();
            if key.is_empty() {
                return Err(Error::EmptyKeyword);
            }
            if self.entries.contains_key(&key) || keys.contains(&key) {
                return Err(Error::DuplicateSection(key));
            }
            keys.push(key);
        }
        for key in keys {
            tracing::trace!(keyword = %key, "registered section");
            self.entries.insert(key, strategy());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = SectionRegistry::extended().unwrap();
        assert_eq!(
            registry.get("Model Attributes"),
            Some(&SectionStrategy::Fields {
                label: "Model Attributes".into()
            })
        );
        assert!(registry.contains("ARGS"));
        assert!(!registry.contains("model"));
    }

    #[test]
    fn builtins_absent_from_base_grammar() {
        let registry = SectionRegistry::google();
        assert!(!registry.contains("keys"));
        assert!(!registry.contains("version added"));
    }

    #[test]
    fn duplicate_keyword_is_rejected() {
        let mut registry = SectionRegistry::google();
        let err = registry.register_fields_section(&["Returns"], "Returns").unwrap_err();
        assert!(matches!(err, Error::DuplicateSection(ref k) if k == "returns"));
        assert_eq!(registry.get("returns"), Some(&SectionStrategy::Returns));
    }

    #[test]
    fn failed_registration_inserts_nothing() {
        let mut registry = SectionRegistry::new();
        let err = registry
            .register_rubric_section(&["side effects", "notes", "side effects"])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSection(_)));
        assert!(!registry.contains("side effects"));
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let mut registry = SectionRegistry::new();
        assert!(matches!(
            registry.register_fields_section(&["  "], "Blank"),
            Err(Error::EmptyKeyword)
        ));
    }
}

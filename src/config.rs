//! `docfield.toml` configuration.
//!
//! ```toml
//! [docstring]
//! custom_sections = true
//! legacy_roles = false
//! max_wrapped_type_lines = 3
//!
//! [docstring.type_aliases]
//! list = ":py:class:`list`"
//!
//! [[docstring.sections]]
//! kind = "fields"
//! keywords = ["side effects"]
//! label = "Side Effects"
//!
//! [docstring.autodoc_excludes]
//! "*" = ["__dict__", "__doc__", "__module__", "__weakref__"]
//! class = ["DoesNotExist", "MultipleObjectsReturned", "objects"]
//!
//! [github]
//! org = "myorg"
//! repo = "myrepo"
//! branch = "main"
//! source_prefix = "src/"
//! allowed_modules = ["mymodule"]
//! ```

use crate::docstring::{ReturnsOptions, SectionRegistry, DEFAULT_MAX_WRAPPED_TYPE_LINES};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Conventional config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docfield.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub docstring: DocstringConfig,
    pub github: Option<GithubConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocstringConfig {
    /// Register the built-in Context/Type/Keys/... sections.
    pub custom_sections: bool,
    /// Emit `:class:`/`:obj:` instead of `:py:class:`/`:py:obj:`.
    pub legacy_roles: bool,
    pub max_wrapped_type_lines: usize,
    /// Bare type name to pre-rendered markup.
    pub type_aliases: HashMap<String, String>,
    /// Extra sections registered after the built-ins.
    pub sections: Vec<SectionSpec>,
    /// Member names hidden from API docs, keyed by object kind or `*`.
    /// Unset means the built-in `*` defaults.
    pub autodoc_excludes: Option<HashMap<String, Vec<String>>>,
    /// Merge the built-in defaults into a configured `autodoc_excludes`.
    pub autodoc_exclude_defaults: bool,
}

impl Default for DocstringConfig {
    fn default() -> Self {
        Self {
            custom_sections: true,
            legacy_roles: false,
            max_wrapped_type_lines: DEFAULT_MAX_WRAPPED_TYPE_LINES,
            type_aliases: HashMap::new(),
            sections: Vec::new(),
            autodoc_excludes: None,
            autodoc_exclude_defaults: false,
        }
    }
}

/// A section registration from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum SectionSpec {
    Fields {
        keywords: Vec<String>,
        label: String,
    },
    Returns {
        keywords: Vec<String>,
        label: String,
        #[serde(default)]
        require_type: bool,
    },
    Admonition {
        keywords: Vec<String>,
        directive: String,
    },
    Rubric {
        keywords: Vec<String>,
    },
}

impl SectionSpec {
    pub fn register(&self, registry: &mut SectionRegistry) -> Result<()> {
        match self {
            SectionSpec::Fields { keywords, label } => {
                registry.register_fields_section(&as_strs(keywords), label)
            }
            SectionSpec::Returns {
                keywords,
                label,
                require_type,
            } => registry.register_returns_section(
                &as_strs(keywords),
                label,
                ReturnsOptions {
                    require_type: *require_type,
                },
            ),
            SectionSpec::Admonition {
                keywords,
                directive,
            } => registry.register_admonition_section(&as_strs(keywords), directive),
            SectionSpec::Rubric { keywords } => registry.register_rubric_section(&as_strs(keywords)),
        }
    }
}

fn as_strs(keywords: &[String]) -> Vec<&str> {
    keywords.iter().map(String::as_str).collect()
}

/// Where source links point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    pub org: String,
    pub repo: String,
    /// Branch, tag or commit used in blob URLs.
    pub branch: String,
    /// Prepended to the module's relative path in URLs.
    pub source_prefix: String,
    /// Top-level packages eligible for links. Empty allows all.
    pub allowed_modules: Vec<String>,
    /// Directory holding the package sources. Defaults to the working
    /// directory.
    pub source_root: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text; `origin` names it in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, else `docfield.toml` in `dir` when present,
    /// else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::from_toml_str(text, Path::new("test.toml"))
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert!(config.docstring.custom_sections);
        assert_eq!(config.docstring.max_wrapped_type_lines, 3);
        assert!(config.github.is_none());
    }

    #[test]
    fn full_config() {
        let config = parse(
            r#"
[docstring]
legacy_roles = true

[docstring.type_aliases]
list = "LIST"

[[docstring.sections]]
kind = "returns"
keywords = ["result"]
label = "Result"
require_type = true

[[docstring.sections]]
kind = "rubric"
keywords = ["side effects"]

[github]
org = "acme"
repo = "widgets"
branch = "main"
allowed_modules = ["widgets"]
"#,
        )
        .unwrap();

        assert!(config.docstring.legacy_roles);
        assert_eq!(config.docstring.type_aliases["list"], "LIST");
        assert_eq!(
            config.docstring.sections[0],
            SectionSpec::Returns {
                keywords: vec!["result".into()],
                label: "Result".into(),
                require_type: true,
            }
        );
        let github = config.github.unwrap();
        assert_eq!(github.repo, "widgets");
        assert_eq!(github.source_prefix, "");
    }

    #[test]
    fn autodoc_excludes_table() {
        let config = parse(
            r#"
[docstring]
autodoc_exclude_defaults = true

[docstring.autodoc_excludes]
"*" = ["foo"]
class = ["objects", "media"]
"#,
        )
        .unwrap();
        let excludes = config.docstring.autodoc_excludes.unwrap();
        assert_eq!(excludes["*"], vec!["foo".to_string()]);
        assert_eq!(excludes["class"].len(), 2);
        assert!(config.docstring.autodoc_exclude_defaults);

        assert!(parse("").unwrap().docstring.autodoc_excludes.is_none());
        let empty = parse("[docstring.autodoc_excludes]\n").unwrap();
        assert_eq!(empty.docstring.autodoc_excludes, Some(HashMap::new()));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = parse("[docstring]\ncustom_section = false\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn colliding_section_spec_fails_registration() {
        let spec = SectionSpec::Fields {
            keywords: vec!["Args".into()],
            label: "Args".into(),
        };
        let mut registry = SectionRegistry::google();
        assert!(matches!(
            spec.register(&mut registry),
            Err(Error::DuplicateSection(_))
        ));
    }
}

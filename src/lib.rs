//! docfield: rewrite Google-style docstring sections into reStructuredText
//! field lists, link documented Python symbols to their source on GitHub,
//! and decide which module members API docs should skip.
//!
//! ```
//! use docfield::{config::DocstringConfig, Parser};
//!
//! let parser = Parser::new(&DocstringConfig::default()).unwrap();
//! let rst = parser.render("Keys:\n    name (str):\n        The name.\n");
//! assert_eq!(rst, ":Keys: **name** (:py:class:`str`) -- The name.\n");
//! ```

pub mod config;
pub mod cursor;
pub mod docstring;
pub mod error;
pub mod linkcode;
pub mod members;
pub mod render;
pub mod typeref;

pub use config::Config;
pub use docstring::{Field, Parser};
pub use error::{Error, Result};
pub use linkcode::GithubLinker;
pub use members::{should_skip_member, ExcludeTable, ModuleMembers};
pub use typeref::{RoleStyle, TypeRewriter};

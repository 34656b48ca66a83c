//! An interpreter for a parameterised, PEG-like grammar description
//! language.
//!
//! A specification is a set of named rules, parsed from a small
//! line-oriented text format (see [`reader`] / [`Specification::parse`]).
//! Rules may take other rules as arguments, may bind sub-results by name,
//! and may run a small host-expression action on a successful match. Rules
//! whose body is `...` delegate to a callback registered on the
//! [`Parser`]'s [`Context`] — this is how a driver program supplies
//! primitive character classes, external tokenizers, or anything else the
//! grammar itself can't express.
//!
//! ```no_run
//! use peg_interpret::{Specification, Parser};
//!
//! let spec = Specification::parse("main = \"hello\"\n").unwrap();
//! let mut parser = Parser::new(&spec);
//! let value = parser.parse("hello", "main", true).unwrap();
//! assert_eq!(value.to_string(), "hello");
//! ```

pub mod action;
pub mod ast;
pub mod context;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod loader;
pub mod namespace;
pub mod reader;
pub mod specification;
pub mod stdlib;
pub mod value;

pub use action::{ActionEvaluator, ExprEvaluator};
pub use context::{Context, ExternFn, Scope};
pub use engine::Parser;
pub use error::{EngineError, LoaderError, ParseFail, StructuralError};
pub use loader::{FsLoader, SpecLoader};
pub use specification::Specification;
pub use value::Value;

//! url-paths - match URLs against rules and generate transformed target URLs.
//!
//! This library provides the core functionality for url-paths, including:
//! - Rule normalization, matching and template resolution
//! - Settings file discovery and parsing
//! - Rule persistence, import and export
//! - Application state with dispatched actions
//!
//! # Example
//!
//! ```
//! use url_paths::rules::{EvaluateOptions, MatchModePolicy, evaluate, normalize_rule};
//!
//! let raw = serde_json::json!({
//!     "name": "Gitpod",
//!     "pattern": r"^https://github\.com/([^/]+)/([^/]+)$",
//!     "type": "regex",
//!     "transformations": ["https://gitpod.io/#https://github.com/{{1}}/{{2}}"]
//! });
//! let rule = normalize_rule(&raw, MatchModePolicy::Legacy).unwrap();
//!
//! let evaluation = evaluate(&rule, "https://github.com/acme/widgets", &EvaluateOptions::default());
//! let results = evaluation.results().unwrap();
//! assert_eq!(results[0].target, "https://gitpod.io/#https://github.com/acme/widgets");
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod state;
pub mod store;

pub use error::{Result, UrlPathsError};

//! Rule persistence for url-paths.
//!
//! This module handles:
//! - Loading and atomically saving the rule list
//! - Import documents and merge policies
//! - Export documents

pub mod document;
pub mod file;
pub mod import;

pub use document::{EXPORT_VERSION, ExportDocument, export_file_name, export_rules, parse_import};
pub use file::RuleStore;
pub use import::{ImportMode, ImportOutcome, apply_import};

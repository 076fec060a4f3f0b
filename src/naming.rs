//! Duplicate-name resolution and filesystem-safe identities.
//!
//! The catalog has no uniqueness guarantee on display names, but on-disk
//! names must be unique within a run. A run-wide registry counts how
//! often each raw name has been seen; repeats get a `_vN` suffix when
//! versioning is enabled.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

/// The on-disk identity assigned to one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Directory name for the entry (when folder organization is on).
    pub directory: String,
    /// Base name for the entry's files, unique within the run when
    /// versioning is enabled.
    pub file_base: String,
}

static FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f\x7f-\x9f]"#).expect("valid regex"));

/// Replaces characters that cannot appear in path components.
/// Case and spacing are preserved; a name with nothing but
/// substitutions left becomes `"unnamed"`.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    let cleaned = FORBIDDEN_CHARS.replace_all(raw.trim(), "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.chars().all(|c| c == '_') {
        "unnamed".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Run-wide registry of raw-name occurrence counts.
///
/// The increment-and-read is a single locked step, so identities stay
/// unique even if resolution is ever invoked from concurrent tasks.
#[derive(Debug, Default)]
pub struct NameRegistry {
    counts: Mutex<HashMap<String, u32>>,
}

impl NameRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more occurrence of `raw_name` and returns the
    /// identity for it. The Nth occurrence (N > 1) is suffixed `_vN`
    /// when `version_duplicates` is enabled.
    pub fn resolve(&self, raw_name: &str, version_duplicates: bool) -> ResolvedIdentity {
        let occurrence = {
            let mut counts = self.counts.lock().expect("name registry poisoned");
            let count = counts.entry(raw_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let base = sanitize_name(raw_name);
        let file_base = if version_duplicates && occurrence > 1 {
            format!("{base}_v{occurrence}")
        } else {
            base
        };

        ResolvedIdentity {
            directory: file_base.clone(),
            file_base,
        }
    }
}

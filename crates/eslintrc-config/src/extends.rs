use crate::{load_config, ConfigError, LintConfig, Result};
use std::path::{Path, PathBuf};

/// Whether an `extends` entry points at a file rather than a named ruleset
#[must_use]
pub fn is_path_reference(entry: &str) -> bool {
    entry.starts_with("./") || entry.starts_with("../") || Path::new(entry).is_absolute()
}

/// Inline every file-relative `extends` entry of `config`.
///
/// Referenced files are loaded relative to `base_dir`, resolved recursively
/// and merged in declaration order, with `config` applied last. Named
/// rulesets (`airbnb`, `plugin:prettier/recommended`) are left in `extends`
/// for the linting engine.
pub fn resolve_extends(config: &LintConfig, base_dir: &Path) -> Result<LintConfig> {
    let mut chain = Vec::new();
    resolve_with_chain(config, base_dir, &mut chain)
}

fn resolve_with_chain(
    config: &LintConfig,
    base_dir: &Path,
    chain: &mut Vec<PathBuf>,
) -> Result<LintConfig> {
    let mut resolved = LintConfig::default();

    for entry in &config.extends {
        if !is_path_reference(entry) {
            resolved.extends.push(entry.clone());
            continue;
        }

        let path = base_dir.join(entry);
        let canonical = path.canonicalize()?;
        if chain.contains(&canonical) {
            return Err(ConfigError::ExtendsCycle(canonical));
        }

        tracing::debug!(path = %canonical.display(), "Resolving extended config");
        let base = load_config(&canonical)?;
        let parent_dir = canonical
            .parent()
            .map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);

        chain.push(canonical);
        let base = resolve_with_chain(&base, &parent_dir, chain)?;
        chain.pop();

        resolved = resolved.merge(&base);
    }

    let local = LintConfig {
        extends: Vec::new(),
        ..config.clone()
    };
    let mut merged = resolved.merge(&local);
    merged.extends.retain(|entry| !is_path_reference(entry));
    Ok(merged)
}

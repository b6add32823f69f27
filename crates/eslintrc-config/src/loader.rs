use crate::{ConfigError, LintConfig, Result};
use json_comments::StripComments;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.yaml",
    ".eslintrc.yml",
    ".eslintrc.json",
    ".eslintrc",
    "package.json",
];

const PACKAGE_JSON: &str = "package.json";
const PACKAGE_JSON_FIELD: &str = "eslintConfig";

/// Find a config file by walking up the directory tree from the given start directory.
/// A `package.json` only counts if it carries an `eslintConfig` field.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if !config_path.is_file() {
                continue;
            }
            if *file_name == PACKAGE_JSON && !package_json_has_config(&config_path)? {
                tracing::trace!(path = %config_path.display(), "package.json without eslintConfig");
                continue;
            }
            tracing::info!(path = %config_path.display(), "Found config file");
            return Ok(Some(config_path));
        }

        if !current_dir.pop() {
            break;
        }
    }

    tracing::debug!("No config file found");
    Ok(None)
}

fn package_json_has_config(path: &Path) -> Result<bool> {
    let contents = fs::read_to_string(path)?;
    let manifest: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("JSON parse error: {e}"),
        }
    })?;
    Ok(manifest.get(PACKAGE_JSON_FIELD).is_some())
}

/// Load a config from the specified path.
/// Automatically detects the format based on file name and extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<LintConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        rules = config.rules.len(),
        extends = config.extends.len(),
        plugins = config.plugins.len(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<LintConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" if file_name == PACKAGE_JSON => parse_package_json(contents, path)?,
        "json" => parse_json(contents, path)?,
        "" if file_name == ".eslintrc" => {
            // Legacy extension-less file: YAML is a superset of JSON but
            // reports worse errors for JSON input, so keep the JSON error.
            match parse_yaml(contents, path) {
                Ok(config) => config,
                Err(yaml_err) => {
                    tracing::debug!(error = %yaml_err, "Not YAML, trying JSON");
                    parse_json(contents, path)?
                }
            }
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<LintConfig> {
    serde_yaml::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

/// `.eslintrc.json` and `.eslintrc` may carry `//` and `/* */` comments
fn parse_json(contents: &str, path: &Path) -> Result<LintConfig> {
    let reader = StripComments::new(contents.as_bytes());
    serde_json::from_reader(reader).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

/// Pull the `eslintConfig` field out of a package manifest
fn parse_package_json(contents: &str, path: &Path) -> Result<LintConfig> {
    #[derive(serde::Deserialize)]
    struct Manifest {
        #[serde(rename = "eslintConfig")]
        eslint_config: Option<LintConfig>,
    }

    let manifest: Manifest = serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })?;

    manifest.eslint_config.ok_or_else(|| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("missing '{PACKAGE_JSON_FIELD}' field"),
    })
}

/// Validate the loaded configuration
pub fn validate_config(config: &LintConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Validation(format!("{}: {message}", path.display()));

    for (index, entry) in config.extends.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(invalid(format!("extends[{index}] is empty")));
        }
    }

    for (index, plugin) in config.plugins.iter().enumerate() {
        if plugin.trim().is_empty() {
            return Err(invalid(format!("plugins[{index}] is empty")));
        }
    }

    if config
        .parser
        .as_deref()
        .is_some_and(|parser| parser.trim().is_empty())
    {
        return Err(invalid("parser is empty".to_string()));
    }

    for (rule_id, _) in &config.rules {
        if rule_id.trim().is_empty() {
            return Err(invalid("rules contains an empty rule id".to_string()));
        }
    }

    if let Err(e) = config.ignore_matcher() {
        return Err(invalid(format!("ignorePatterns is invalid: {e}")));
    }

    Ok(())
}

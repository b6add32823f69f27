use crate::rule::{RuleConfiguration, RuleSetting};
use crate::severity::Severity;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A lint configuration document.
///
/// ```yaml
/// extends: [airbnb, plugin:prettier/recommended]
/// parser: babel-eslint
/// env:
///   browser: true
/// plugins: [react]
/// rules:
///   no-shadow: warn
///   max-len: [error, 80, 2, { ignoreUrls: true }]
/// settings:
///   react:
///     version: "16.8"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LintConfig {
    /// Stop looking for configuration in parent directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,

    /// Base rulesets, applied in order before this document's own rules
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extends: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,

    /// Parser-specific options, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, GlobalAccess>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    #[serde(default, skip_serializing_if = "RuleConfiguration::is_empty")]
    pub rules: RuleConfiguration,

    /// Tool-specific settings shared with every rule
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub settings: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_patterns: Vec<String>,
}

/// Access level of a declared global variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    Readonly,
    Writable,
    Off,
}

impl<'de> Deserialize<'de> for GlobalAccess {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Writable),
            Raw::Flag(false) => Ok(Self::Readonly),
            Raw::Name(name) => match name.as_str() {
                "readonly" | "readable" | "false" => Ok(Self::Readonly),
                "writable" | "writeable" | "true" => Ok(Self::Writable),
                "off" => Ok(Self::Off),
                _ => Err(serde::de::Error::custom(format!(
                    "unknown global access: {name}"
                ))),
            },
        }
    }
}

/// Accept either `extends: airbnb` or `extends: [airbnb, ...]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

impl LintConfig {
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleSetting> {
        self.rules.get(rule_id)
    }

    #[must_use]
    pub fn severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity(rule_id)
    }

    #[must_use]
    pub fn options(&self, rule_id: &str) -> Option<&[serde_json::Value]> {
        self.rules.options(rule_id)
    }

    /// Check if a rule is configured as Warn or Error
    #[must_use]
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        self.severity(rule_id).is_some_and(Severity::is_enabled)
    }

    #[must_use]
    pub fn env_enabled(&self, env: &str) -> bool {
        self.env.get(env).copied().unwrap_or(false)
    }

    /// Look up a nested setting by key path, e.g. `["react", "version"]`.
    ///
    /// Keys are matched literally, so `"import/resolver"` is one key.
    #[must_use]
    pub fn setting(&self, path: &[&str]) -> Option<&serde_json::Value> {
        let (first, rest) = path.split_first()?;
        let mut value = self.settings.get(*first)?;
        for key in rest {
            value = value.as_object()?.get(*key)?;
        }
        Some(value)
    }

    /// Plugin that owns a rule id, if the id is plugin-scoped.
    ///
    /// `react/jsx-uses-react` belongs to `react`, `@scope/plugin/rule` to
    /// `@scope/plugin`, `@scope/rule` to `@scope`. Core rules have no plugin.
    #[must_use]
    pub fn plugin_for_rule(rule_id: &str) -> Option<&str> {
        let end = rule_id.rfind('/')?;
        Some(&rule_id[..end])
    }

    /// Plugin-scoped rules whose plugin is neither listed in `plugins` nor
    /// brought in by a `plugin:<name>/<config>` entry in `extends`
    #[must_use]
    pub fn undeclared_plugin_rules(&self) -> Vec<&str> {
        let declared: Vec<&str> = self
            .plugins
            .iter()
            .map(|plugin| normalize_plugin_name(plugin))
            .chain(self.extends.iter().filter_map(|entry| {
                let preset = entry.strip_prefix("plugin:")?;
                Self::plugin_for_rule(preset).map(normalize_plugin_name)
            }))
            .collect();

        self.rules
            .iter()
            .map(|(rule_id, _)| rule_id)
            .filter(|rule_id| {
                Self::plugin_for_rule(rule_id)
                    .is_some_and(|plugin| !declared.contains(&normalize_plugin_name(plugin)))
            })
            .collect()
    }

    /// Compile `ignorePatterns` into a gitignore-style matcher rooted at the
    /// directory holding the configuration
    pub fn ignore_matcher(&self) -> Result<Gitignore, ignore::Error> {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in &self.ignore_patterns {
            builder.add_line(None, pattern)?;
        }
        builder.build()
    }

    /// Check if a file matches `ignorePatterns` with gitignore semantics.
    ///
    /// Patterns containing a slash are anchored to the configuration's
    /// directory, `*` stops at `/`, a trailing `/` only matches directories
    /// and `!` re-includes. Rooted paths are never ignored.
    #[must_use]
    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        if self.ignore_patterns.is_empty() || relative_path.has_root() {
            return false;
        }

        match self.ignore_matcher() {
            Ok(matcher) => matcher
                .matched_path_or_any_parents(relative_path, false)
                .is_ignore(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid ignorePatterns");
                false
            }
        }
    }

    /// Apply `overlay` on top of this configuration with cascade semantics
    #[must_use]
    pub fn merge(&self, overlay: &Self) -> Self {
        let mut env = self.env.clone();
        env.extend(overlay.env.clone());

        let mut globals = self.globals.clone();
        globals.extend(overlay.globals.clone());

        let mut settings = self.settings.clone();
        deep_merge(&mut settings, &overlay.settings);

        Self {
            root: overlay.root.or(self.root),
            extends: union(&self.extends, &overlay.extends),
            parser: overlay.parser.clone().or_else(|| self.parser.clone()),
            parser_options: merge_parser_options(
                self.parser_options.as_ref(),
                overlay.parser_options.as_ref(),
            ),
            env,
            globals,
            plugins: union(&self.plugins, &overlay.plugins),
            rules: self.rules.merge(&overlay.rules),
            settings,
            ignore_patterns: self
                .ignore_patterns
                .iter()
                .chain(&overlay.ignore_patterns)
                .cloned()
                .collect(),
        }
    }
}

/// `eslint-plugin-react` and `react` name the same plugin, as do
/// `@scope/eslint-plugin` and `@scope`
fn normalize_plugin_name(name: &str) -> &str {
    if name.starts_with('@') {
        return name.strip_suffix("/eslint-plugin").unwrap_or(name);
    }
    name.strip_prefix("eslint-plugin-").unwrap_or(name)
}

fn union(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    for item in overlay {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

fn merge_parser_options(
    base: Option<&serde_json::Value>,
    overlay: Option<&serde_json::Value>,
) -> Option<serde_json::Value> {
    match (base, overlay) {
        (Some(serde_json::Value::Object(base)), Some(serde_json::Value::Object(overlay))) => {
            let mut merged = base.clone();
            deep_merge(&mut merged, overlay);
            Some(serde_json::Value::Object(merged))
        }
        (base, overlay) => overlay.or(base).cloned(),
    }
}

fn deep_merge(
    base: &mut serde_json::Map<String, serde_json::Value>,
    overlay: &serde_json::Map<String, serde_json::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(serde_json::Value::Object(existing)), serde_json::Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: &str) -> LintConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_full_document() {
        let config = parse(
            r#"{
                "extends": ["airbnb", "plugin:prettier/recommended"],
                "parser": "babel-eslint",
                "env": { "browser": true, "jest": false },
                "plugins": ["react"],
                "rules": { "no-shadow": "warn", "max-len": ["error", 80] },
                "settings": { "react": { "version": "16.8" } }
            }"#,
        );

        assert_eq!(config.extends, vec!["airbnb", "plugin:prettier/recommended"]);
        assert_eq!(config.parser.as_deref(), Some("babel-eslint"));
        assert!(config.env_enabled("browser"));
        assert!(!config.env_enabled("jest"));
        assert!(!config.env_enabled("node"));
        assert!(config.is_enabled("no-shadow"));
        assert_eq!(config.options("max-len"), Some(&[json!(80)][..]));
        assert_eq!(config.setting(&["react", "version"]), Some(&json!("16.8")));
    }

    #[test]
    fn test_extends_single_string() {
        let config = parse(r#"{ "extends": "airbnb" }"#);
        assert_eq!(config.extends, vec!["airbnb"]);
    }

    #[test]
    fn test_rejects_unknown_top_level_key() {
        let err = serde_json::from_str::<LintConfig>(r#"{ "rulez": {} }"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("rulez"), "{err}");
    }

    #[test]
    fn test_setting_with_slash_keys() {
        let config = parse(
            r#"{ "settings": { "import/resolver": { "node": { "paths": ["src"] } } } }"#,
        );
        assert_eq!(
            config.setting(&["import/resolver", "node", "paths"]),
            Some(&json!(["src"]))
        );
        assert_eq!(config.setting(&["import/resolver", "webpack"]), None);
        assert_eq!(config.setting(&[]), None);
    }

    #[test]
    fn test_globals() {
        let config = parse(
            r#"{ "globals": { "a": "readonly", "b": "writeable", "c": true, "d": false, "e": "off" } }"#,
        );
        assert_eq!(config.globals["a"], GlobalAccess::Readonly);
        assert_eq!(config.globals["b"], GlobalAccess::Writable);
        assert_eq!(config.globals["c"], GlobalAccess::Writable);
        assert_eq!(config.globals["d"], GlobalAccess::Readonly);
        assert_eq!(config.globals["e"], GlobalAccess::Off);

        assert!(serde_json::from_str::<LintConfig>(r#"{ "globals": { "a": "sometimes" } }"#).is_err());
    }

    #[test]
    fn test_globals_legacy_string_flags() {
        let config = parse(r#"{ "globals": { "a": "true", "b": "false" } }"#);
        assert_eq!(config.globals["a"], GlobalAccess::Writable);
        assert_eq!(config.globals["b"], GlobalAccess::Readonly);
    }

    #[test]
    fn test_plugin_for_rule() {
        assert_eq!(LintConfig::plugin_for_rule("no-shadow"), None);
        assert_eq!(LintConfig::plugin_for_rule("react/jsx-uses-react"), Some("react"));
        assert_eq!(
            LintConfig::plugin_for_rule("@typescript-eslint/no-unused-vars"),
            Some("@typescript-eslint")
        );
    }

    #[test]
    fn test_undeclared_plugin_rules() {
        let config = parse(
            r#"{
                "extends": ["plugin:prettier/recommended"],
                "plugins": ["eslint-plugin-react", "@typescript-eslint/eslint-plugin"],
                "rules": {
                    "react/jsx-filename-extension": "off",
                    "prettier/prettier": "error",
                    "@typescript-eslint/no-unused-vars": "warn",
                    "import/extensions": "off",
                    "no-shadow": "warn"
                }
            }"#,
        );
        assert_eq!(config.undeclared_plugin_rules(), vec!["import/extensions"]);
    }

    #[test]
    fn test_is_ignored() {
        let config = parse(r#"{ "ignorePatterns": ["build/", "*.min.js", "src/generated"] }"#);
        assert!(config.is_ignored(Path::new("build/index.js")));
        assert!(config.is_ignored(Path::new("packages/app/build/index.js")));
        assert!(config.is_ignored(Path::new("vendor/jquery.min.js")));
        assert!(config.is_ignored(Path::new("src/generated/api.ts")));
        assert!(!config.is_ignored(Path::new("src/index.js")));
        assert!(!config.is_ignored(Path::new("lib/src/generated/api.ts")));
    }

    #[test]
    fn test_ignore_star_stops_at_separator() {
        let config = parse(r#"{ "ignorePatterns": ["src/*.js"] }"#);
        assert!(config.is_ignored(Path::new("src/index.js")));
        assert!(!config.is_ignored(Path::new("src/deep/nested/file.js")));
    }

    #[test]
    fn test_ignore_leading_slash_anchors() {
        let config = parse(r#"{ "ignorePatterns": ["/build"] }"#);
        assert!(config.is_ignored(Path::new("build/x.js")));
        assert!(!config.is_ignored(Path::new("packages/app/build/x.js")));
    }

    #[test]
    fn test_ignore_negation_reincludes() {
        let config = parse(r#"{ "ignorePatterns": ["dist/", "!dist/keep.js"] }"#);
        assert!(config.is_ignored(Path::new("dist/bundle.js")));
        assert!(!config.is_ignored(Path::new("dist/keep.js")));
    }

    #[test]
    fn test_ignore_rooted_path_never_ignored() {
        let config = parse(r#"{ "ignorePatterns": ["*.js"] }"#);
        assert!(!config.is_ignored(Path::new("/abs/index.js")));
        assert!(config.ignore_matcher().is_ok());
    }

    #[test]
    fn test_merge_cascade() {
        let base = parse(
            r#"{
                "extends": ["airbnb"],
                "parser": "espree",
                "env": { "browser": true, "node": false },
                "plugins": ["react"],
                "rules": { "max-len": ["error", 100], "no-shadow": "error" },
                "settings": { "react": { "pragma": "React", "version": "16.0" } }
            }"#,
        );
        let overlay = parse(
            r#"{
                "extends": ["airbnb", "prettier/react"],
                "env": { "node": true },
                "plugins": ["jsx-a11y", "react"],
                "rules": { "max-len": "warn" },
                "settings": { "react": { "version": "16.8" }, "jsx": true }
            }"#,
        );

        let merged = base.merge(&overlay);

        assert_eq!(merged.extends, vec!["airbnb", "prettier/react"]);
        assert_eq!(merged.parser.as_deref(), Some("espree"));
        assert!(merged.env_enabled("browser"));
        assert!(merged.env_enabled("node"));
        assert_eq!(merged.plugins, vec!["react", "jsx-a11y"]);
        assert_eq!(merged.severity("max-len"), Some(Severity::Warn));
        assert_eq!(merged.options("max-len"), Some(&[json!(100)][..]));
        assert_eq!(merged.severity("no-shadow"), Some(Severity::Error));
        assert_eq!(merged.setting(&["react", "pragma"]), Some(&json!("React")));
        assert_eq!(merged.setting(&["react", "version"]), Some(&json!("16.8")));
        assert_eq!(merged.setting(&["jsx"]), Some(&json!(true)));
    }

    #[test]
    fn test_merge_parser_options_deeply() {
        let base = parse(
            r#"{ "parserOptions": { "ecmaVersion": 2018, "ecmaFeatures": { "jsx": true } } }"#,
        );
        let overlay = parse(
            r#"{ "parserOptions": { "sourceType": "module", "ecmaFeatures": { "impliedStrict": true } } }"#,
        );

        let merged = base.merge(&overlay);
        assert_eq!(
            merged.parser_options,
            Some(json!({
                "ecmaVersion": 2018,
                "ecmaFeatures": { "jsx": true, "impliedStrict": true },
                "sourceType": "module"
            }))
        );

        let only_base = base.merge(&LintConfig::default());
        assert_eq!(only_base.parser_options, base.parser_options);
    }

    #[test]
    fn test_serialize_omits_empty_sections() {
        let config = parse(r#"{ "parser": "babel-eslint" }"#);
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "parser": "babel-eslint" })
        );
    }

    #[test]
    fn test_serialize_then_parse_is_equal() {
        let config = parse(
            r#"{
                "root": true,
                "extends": "airbnb",
                "parserOptions": { "ecmaVersion": 2018 },
                "globals": { "window": "readonly" },
                "rules": { "no-console": [0], "max-len": ["error", 80, 2, { "ignoreUrls": true }] },
                "ignorePatterns": ["dist/"]
            }"#,
        );
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(parse(&text), config);

        let yaml = serde_yaml::to_string(&config).unwrap();
        let from_yaml: LintConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(from_yaml, config);
    }
}

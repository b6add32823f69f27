//! Lint configuration of the web front-end.
//!
//! Rules are listed exactly as the front-end declares them, in order. The
//! front-end declares `import/prefer-default-export` twice; the second
//! declaration wins, as it would in a JavaScript object literal.

use crate::rule::{RuleConfiguration, RuleSetting};
use crate::{LintConfig, Severity};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

static FRONTEND: Lazy<LintConfig> = Lazy::new(build);

/// The front-end configuration, built on first use and shared for the rest
/// of the process
#[must_use]
pub fn frontend_config() -> &'static LintConfig {
    &FRONTEND
}

const fn bare(severity: Severity) -> RuleSetting {
    RuleSetting::Severity(severity)
}

fn with_options(severity: Severity, options: Vec<Value>) -> RuleSetting {
    RuleSetting::Detailed { severity, options }
}

fn rules() -> RuleConfiguration {
    use Severity::{Error, Off, Warn};

    RuleConfiguration::from_entries([
        (
            "max-len",
            with_options(Error, vec![json!(80), json!(2), json!({ "ignoreUrls": true })]),
        ),
        ("no-console", with_options(Off, vec![])),
        ("no-restricted-syntax", bare(Off)),
        ("no-continue", bare(Off)),
        ("no-underscore-dangle", bare(Off)),
        ("import/extensions", bare(Off)),
        ("import/no-unresolved", bare(Off)),
        ("operator-linebreak", bare(Off)),
        ("implicit-arrow-linebreak", bare(Off)),
        ("react/destructuring-assignment", bare(Off)),
        ("jsx-a11y/click-events-have-key-events", bare(Off)),
        ("jsx-a11y/no-static-element-interactions", bare(Off)),
        ("react/jsx-one-expression-per-line", bare(Off)),
        (
            "react/jsx-filename-extension",
            with_options(Error, vec![json!({ "extensions": [".ts", ".tsx"] })]),
        ),
        (
            "lines-between-class-members",
            with_options(
                Error,
                vec![json!("always"), json!({ "exceptAfterSingleLine": true })],
            ),
        ),
        (
            "prettier/prettier",
            with_options(
                Error,
                vec![json!({ "singleQuote": true, "trailingComma": "es5" })],
            ),
        ),
        ("no-unused-vars", bare(Warn)),
        ("func-names", bare(Off)),
        ("no-process-exit", bare(Off)),
        ("object-shorthand", bare(Off)),
        ("class-methods-use-this", bare(Off)),
        ("import/prefer-default-export", bare(Warn)),
        ("prefer-promise-reject-errors", bare(Warn)),
        ("import/no-extraneous-dependencies", bare(Warn)),
        ("react/jsx-props-no-spreading", bare(Warn)),
        ("no-param-reassign", bare(Warn)),
        ("import/prefer-default-export", bare(Warn)),
        ("no-shadow", bare(Warn)),
        ("jsx-a11y/anchor-is-valid", bare(Warn)),
    ])
}

fn settings() -> serde_json::Map<String, Value> {
    let settings = json!({
        "ecmascript": 6,
        "jsx": true,
        "import/resolver": {
            "node": {
                "paths": ["src"],
            },
        },
        "import/parsers": {
            "@typescript-eslint/parser": [".ts", ".tsx"],
        },
        "react": {
            "pragma": "React",
            "version": "16.8",
        },
    });

    match settings {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

fn build() -> LintConfig {
    tracing::debug!("Building front-end lint configuration");

    LintConfig {
        extends: vec![
            "airbnb".to_string(),
            "plugin:prettier/recommended".to_string(),
            "prettier/react".to_string(),
        ],
        parser: Some("babel-eslint".to_string()),
        env: [
            ("browser", true),
            ("commonjs", true),
            ("node", true),
            ("jest", true),
            ("es6", true),
        ]
        .into_iter()
        .map(|(name, enabled)| (name.to_string(), enabled))
        .collect(),
        plugins: vec![
            "react".to_string(),
            "react-hooks".to_string(),
            "jsx-a11y".to_string(),
        ],
        rules: rules(),
        settings: settings(),
        ..LintConfig::default()
    }
}

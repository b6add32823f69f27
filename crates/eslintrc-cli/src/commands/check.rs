use crate::OutputFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use eslintrc_config::{load_config, resolve_extends, LintConfig};
use std::path::PathBuf;
use std::process;

#[derive(Debug)]
struct Finding {
    rule: String,
    message: String,
}

/// Warnings about a config whose extends have already been resolved
fn collect_findings(resolved: &LintConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in resolved.rules.overwritten() {
        findings.push(Finding {
            rule: rule.clone(),
            message: format!("'{rule}' is declared more than once; the last declaration wins"),
        });
    }
    for rule in resolved.undeclared_plugin_rules() {
        let plugin = LintConfig::plugin_for_rule(rule).unwrap_or_default();
        findings.push(Finding {
            rule: rule.to_string(),
            message: format!(
                "'{rule}' belongs to plugin '{plugin}', which is not listed in plugins \
                 (fine if a named ruleset in extends provides it)"
            ),
        });
    }
    findings
}

pub fn run(config_path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let config_path = super::locate_config(config_path)?;

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            match format {
                OutputFormat::Human => eprintln!("{} {}", "✗ Config error:".red(), e),
                OutputFormat::Json => {
                    eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
                }
            }
            process::exit(1);
        }
    };

    let base_dir = config_path
        .parent()
        .context("Failed to get config directory")?;
    let resolved = match resolve_extends(&config, base_dir) {
        Ok(resolved) => resolved,
        Err(e) => {
            match format {
                OutputFormat::Human => eprintln!("{} {}", "✗ Extends error:".red(), e),
                OutputFormat::Json => {
                    eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
                }
            }
            process::exit(1);
        }
    };

    let findings = collect_findings(&resolved);

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} ({} rules, {} enabled)",
                "✓ Loaded".green(),
                config_path.display(),
                resolved.rules.len(),
                resolved.rules.enabled().count()
            );
            for finding in &findings {
                println!(
                    "\n{} {}",
                    "warning:".yellow().bold(),
                    finding.message.yellow()
                );
                println!("  {}: {}", "rule".dimmed(), finding.rule.dimmed());
            }

            println!();
            if findings.is_empty() {
                println!("{}", "✓ No configuration issues found!".green().bold());
            } else {
                println!(
                    "{}",
                    format!("✓ Config is valid with {} warning(s)", findings.len())
                        .yellow()
                        .bold()
                );
            }
        }
        OutputFormat::Json => {
            for finding in &findings {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": config_path.display().to_string(),
                        "severity": "warning",
                        "rule": finding.rule,
                        "message": finding.message,
                    })
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LintConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_repeated_rule_reported() {
        let config = parse(r#"{ "rules": { "no-shadow": "warn", "eqeqeq": 2, "no-shadow": "off" } }"#);

        let findings = collect_findings(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "no-shadow");
        assert!(findings[0].message.contains("more than once"));
    }

    #[test]
    fn test_undeclared_plugin_reported() {
        let config = parse(
            r#"{
                "plugins": ["react"],
                "rules": { "react/jsx-key": "error", "jsx-a11y/alt-text": "warn" }
            }"#,
        );

        let findings = collect_findings(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "jsx-a11y/alt-text");
        assert!(findings[0].message.contains("'jsx-a11y'"));
    }

    #[test]
    fn test_frontend_findings() {
        let findings = collect_findings(eslintrc_config::frontend_config());
        let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();

        assert_eq!(rules.first(), Some(&"import/prefer-default-export"));
        assert!(rules.contains(&"import/extensions"));
        assert!(!rules.contains(&"prettier/prettier"));
        assert!(!rules.contains(&"react/destructuring-assignment"));
    }

    #[test]
    fn test_clean_config_has_no_findings() {
        let config = parse(r#"{ "plugins": ["react"], "rules": { "react/jsx-key": "error" } }"#);
        assert!(collect_findings(&config).is_empty());
    }
}

use anyhow::{Context, Result};
use colored::Colorize;
use eslintrc_config::{frontend_config, load_config, LintConfig, Severity};
use std::path::PathBuf;
use std::process;

pub fn run(config_path: Option<PathBuf>, name: &str, builtin: bool) -> Result<()> {
    let loaded;
    let config: &LintConfig = if builtin {
        frontend_config()
    } else {
        let config_path = super::locate_config(config_path)?;
        loaded = load_config(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        &loaded
    };

    let Some(setting) = config.rule(name) else {
        eprintln!("{}", format!("Rule '{name}' is not configured").red());
        process::exit(1);
    };

    let severity = setting.severity();
    let label = match severity {
        Severity::Off => severity.to_string().dimmed(),
        Severity::Warn => severity.to_string().yellow().bold(),
        Severity::Error => severity.to_string().red().bold(),
    };
    println!("{name}: {label} ({})", severity.as_number());

    if !setting.options().is_empty() {
        println!(
            "  {}: {}",
            "options".dimmed(),
            serde_json::to_string(setting.options())?
        );
    }

    Ok(())
}

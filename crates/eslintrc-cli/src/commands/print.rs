use crate::DocumentFormat;
use anyhow::{Context, Result};
use eslintrc_config::{frontend_config, load_config, resolve_extends, LintConfig};
use std::path::PathBuf;

pub fn run(
    config_path: Option<PathBuf>,
    format: DocumentFormat,
    resolved: bool,
    builtin: bool,
) -> Result<()> {
    let config = if builtin {
        frontend_config().clone()
    } else {
        let config_path = super::locate_config(config_path)?;
        let config = load_config(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        if resolved {
            let base_dir = config_path
                .parent()
                .context("Failed to get config directory")?;
            resolve_extends(&config, base_dir).context("Failed to resolve extends")?
        } else {
            config
        }
    };

    print!("{}", render(&config, format)?);
    Ok(())
}

fn render(config: &LintConfig, format: DocumentFormat) -> Result<String> {
    Ok(match format {
        DocumentFormat::Json => {
            let mut text = serde_json::to_string_pretty(config)?;
            text.push('\n');
            text
        }
        DocumentFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_render_is_reloadable() {
        let config = frontend_config();

        let json = render(config, DocumentFormat::Json).unwrap();
        let reloaded =
            eslintrc_config::load_config_from_str(&json, Path::new(".eslintrc.json")).unwrap();
        assert_eq!(&reloaded, config);

        let yaml = render(config, DocumentFormat::Yaml).unwrap();
        let reloaded =
            eslintrc_config::load_config_from_str(&yaml, Path::new(".eslintrc.yml")).unwrap();
        assert_eq!(&reloaded, config);
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = frontend_config();
        assert_eq!(
            render(config, DocumentFormat::Json).unwrap(),
            render(config, DocumentFormat::Json).unwrap()
        );
    }
}

mod config;
mod error;
mod extends;
mod frontend;
mod loader;
mod rule;
mod severity;

pub use config::{GlobalAccess, LintConfig};
pub use error::{ConfigError, Result};
pub use extends::{is_path_reference, resolve_extends};
pub use frontend::frontend_config;
pub use loader::{find_config, load_config, load_config_from_str, validate_config, CONFIG_FILES};
pub use rule::{RuleConfiguration, RuleSetting};
pub use severity::Severity;

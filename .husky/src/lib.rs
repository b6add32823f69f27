//! Installs the git pre-commit hook via `cargo-husky` when the workspace tests are built.

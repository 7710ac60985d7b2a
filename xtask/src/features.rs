use std::process::Command;

use anyhow::{bail, Context, Result};

/// `(label, --features value)` pairs tested for smartthings-infra.
const FEATURE_SETS: [(&str, Option<&str>); 2] = [("default", None), ("keychain", Some("keychain"))];

/// Run the smartthings-infra tests once per feature set.
pub fn test_feature_matrix() -> Result<()> {
    for (label, features) in FEATURE_SETS {
        println!("\n==> cargo test -p smartthings-infra ({label})");

        let mut command = Command::new("cargo");
        command.args(["test", "-p", "smartthings-infra"]);
        if let Some(features) = features {
            command.args(["--features", features]);
        }

        let status =
            command.status().with_context(|| format!("failed to run cargo test for '{label}'"))?;
        if !status.success() {
            bail!("feature set '{label}' failed");
        }
    }

    println!("\nall {} feature sets passed", FEATURE_SETS.len());
    Ok(())
}

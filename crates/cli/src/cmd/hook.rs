//! Hook commands
//!
//! `quarry hook run` executes a single named hook through the dispatch
//! engine; `quarry hook list` shows what the hooks directory contains.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use quarry_config::Config;
use quarry_engine::{HookResolver, RunHooksOptions, run_found_hooks};
use std::fs;
use std::path::Path;

/// Run a named hook and map its aggregate outcome to an exit code
///
/// Exit code 0: the hook ran successfully, or it is not configured and
/// `--ignore-missing` was given. Exit code 1: the hook is not configured
/// (without the flag), or at least one invocation failed to start or
/// exited nonzero.
pub fn run_hook(
    repo_root: &Path,
    config: &Config,
    hook_name: &str,
    args: Vec<String>,
    ignore_missing: bool,
    to_stdin: Option<&Path>,
) -> Result<i32> {
    let resolver =
        HookResolver::new(config.hooks_dir(repo_root)).with_advice(config.advice.ignored_hook);

    let Some(hook_path) = resolver.find_hook(hook_name) else {
        if ignore_missing {
            return Ok(0);
        }
        eprintln!(
            "{} cannot find a hook named {}",
            "error:".red().bold(),
            hook_name
        );
        return Ok(1);
    };

    let mut options = RunHooksOptions::new().args(args);
    if let Some(path) = to_stdin {
        options = options.stdin_path(path);
    }

    let rc = run_found_hooks(hook_name, &hook_path, &options);
    Ok(i32::from(rc != 0))
}

/// List the hooks directory's contents, marking which entries would run
pub fn run_list(repo_root: &Path, config: &Config, format: &str) -> Result<()> {
    let hooks_dir = config.hooks_dir(repo_root);

    if !hooks_dir.exists() {
        println!("{}", "No hooks directory found.".yellow());
        return Ok(());
    }

    // Probe through the resolver with advice muted so listing never spams
    // one-shot warnings
    let resolver = HookResolver::new(&hooks_dir).with_advice(false);

    let mut names: Vec<String> = fs::read_dir(&hooks_dir)
        .with_context(|| format!("Failed to read {}", hooks_dir.display()))?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    match format {
        "json" => {
            let hooks: Vec<serde_json::Value> = names
                .iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "path": hooks_dir.join(name),
                        "executable": resolver.find_hook(name).is_some(),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "hooks_dir": hooks_dir,
                "hooks": hooks,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Hooks directory: {}", hooks_dir.display().cyan());
            println!();

            if names.is_empty() {
                println!("{}", "No hooks configured.".yellow());
                return Ok(());
            }

            for name in &names {
                if resolver.find_hook(name).is_some() {
                    println!("  • {}", name.green());
                } else {
                    println!("  • {} {}", name.dimmed(), "[not executable]".dimmed());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn repo_with_hooks_dir() -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let hooks_dir = temp.path().join(".quarry/hooks");
        fs::create_dir_all(&hooks_dir).unwrap();
        (temp, hooks_dir)
    }

    #[test]
    fn test_run_hook_missing_without_flag() {
        let (temp, _hooks_dir) = repo_with_hooks_dir();
        let config = Config::default();

        let code =
            run_hook(temp.path(), &config, "pre-commit", Vec::new(), false, None).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_hook_missing_with_ignore_missing() {
        let (temp, _hooks_dir) = repo_with_hooks_dir();
        let config = Config::default();

        let code = run_hook(temp.path(), &config, "pre-commit", Vec::new(), true, None).unwrap();
        assert_eq!(code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_hook_exit_codes_are_clamped() {
        use std::os::unix::fs::PermissionsExt;

        let (temp, hooks_dir) = repo_with_hooks_dir();
        let config = Config::default();

        let path = hooks_dir.join("pre-commit");
        fs::write(&path, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        let code =
            run_hook(temp.path(), &config, "pre-commit", Vec::new(), false, None).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_list_without_hooks_dir() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        run_list(temp.path(), &config, "simple").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_run_list_json() {
        let (temp, hooks_dir) = repo_with_hooks_dir();
        let config = Config::default();
        fs::write(hooks_dir.join("pre-commit"), "#!/bin/sh\n").unwrap();

        run_list(temp.path(), &config, "json").unwrap();
    }
}

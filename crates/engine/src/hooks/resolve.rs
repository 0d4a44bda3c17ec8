//! Hook discovery
//!
//! Maps a hook name to a verified executable path under the hooks
//! directory. A hook that is simply absent is a normal, silent outcome;
//! a hook file that exists without the execute bit triggers a one-shot
//! advisory per name per process lifetime.

use quarry_core::platform::CURRENT_PLATFORM;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Result of probing one candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Executable,
    NotExecutable,
    Missing,
}

fn probe(path: &Path) -> Access {
    let Ok(metadata) = fs::metadata(path) else {
        return Access::Missing;
    };

    if !metadata.is_file() {
        return Access::Missing;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Access::NotExecutable;
        }
    }

    Access::Executable
}

/// Tracks which hook names have already triggered the not-executable
/// advisory in this process
///
/// Lookup and insert happen as one atomic step, so a name can fire the
/// advisory at most once even if the resolver is driven from multiple
/// threads.
#[derive(Debug, Default)]
pub struct AdvisoryTracker {
    seen: Mutex<HashSet<String>>,
}

impl AdvisoryTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` and report whether this was its first occurrence
    pub fn first_time(&self, name: &str) -> bool {
        self.seen
            .lock()
            .expect("advisory tracker lock poisoned")
            .insert(name.to_string())
    }
}

/// Resolve hook names to verified executable paths
pub struct HookResolver {
    hooks_dir: PathBuf,
    advice_enabled: bool,
    advised: AdvisoryTracker,
}

impl HookResolver {
    /// Create a resolver for the given hooks directory
    #[must_use]
    pub fn new(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
            advice_enabled: true,
            advised: AdvisoryTracker::new(),
        }
    }

    /// Enable or disable the not-executable advisory
    #[must_use]
    pub fn with_advice(mut self, enabled: bool) -> Self {
        self.advice_enabled = enabled;
        self
    }

    /// The directory hooks are looked up in
    #[must_use]
    pub fn hooks_dir(&self) -> &Path {
        &self.hooks_dir
    }

    /// Find the executable for a configured hook
    ///
    /// Returns `None` when the hook is not configured: no file at
    /// `<hooks_dir>/<name>` (or, on platforms with a required executable
    /// extension, `<hooks_dir>/<name><ext>`) is executable by the current
    /// user. The first time a given name resolves to a file lacking the
    /// execute bit, a one-time advisory is emitted, unless advice is
    /// disabled.
    pub fn find_hook(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.hooks_dir.join(name);
        let mut access = probe(&candidate);
        if access == Access::Executable {
            return Some(candidate);
        }

        if let Some(ext) = CURRENT_PLATFORM.exec_extension {
            let mut extended = OsString::from(candidate.as_os_str());
            extended.push(ext);
            let extended = PathBuf::from(extended);

            match probe(&extended) {
                Access::Executable => return Some(extended),
                Access::NotExecutable => access = Access::NotExecutable,
                Access::Missing => {}
            }
        }

        if access == Access::NotExecutable
            && self.advice_enabled
            && self.advised.first_time(name)
        {
            tracing::warn!(
                "The '{}' hook was ignored because it is not set as executable.\n\
                 You can silence this warning with `quarry config advice.ignoredHook false`.",
                candidate.display()
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_hook(dir: &Path, name: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_find_hook_missing() {
        let temp = TempDir::new().unwrap();
        let resolver = HookResolver::new(temp.path());

        assert_eq!(resolver.find_hook("pre-commit"), None);
    }

    #[test]
    fn test_find_hook_missing_directory() {
        let temp = TempDir::new().unwrap();
        let resolver = HookResolver::new(temp.path().join("no-such-dir"));

        assert_eq!(resolver.find_hook("pre-commit"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_hook_executable() {
        let temp = TempDir::new().unwrap();
        let path = write_hook(temp.path(), "pre-commit", 0o755);
        let resolver = HookResolver::new(temp.path());

        assert_eq!(resolver.find_hook("pre-commit"), Some(path));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_hook_not_executable() {
        let temp = TempDir::new().unwrap();
        write_hook(temp.path(), "pre-commit", 0o644);
        let resolver = HookResolver::new(temp.path());

        assert_eq!(resolver.find_hook("pre-commit"), None);
        // Repeated lookups stay absent and do not panic on the warned set
        assert_eq!(resolver.find_hook("pre-commit"), None);
    }

    #[test]
    fn test_find_hook_directory_is_not_a_hook() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("pre-commit")).unwrap();
        let resolver = HookResolver::new(temp.path());

        assert_eq!(resolver.find_hook("pre-commit"), None);
    }

    #[test]
    fn test_advisory_tracker_fires_once_per_name() {
        let tracker = AdvisoryTracker::new();

        assert!(tracker.first_time("pre-commit"));
        assert!(!tracker.first_time("pre-commit"));
        assert!(!tracker.first_time("pre-commit"));
        assert!(tracker.first_time("post-commit"));
    }
}

//! Platform detection for cross-platform hook lookup
//!
//! Provides OS and architecture information using standard Unix conventions:
//! - macOS → `"darwin"` (kernel name)
//! - Linux → `"linux"`
//! - Windows → `"windows"`
//!
//! Platform info is cached on first access for optimal performance.

use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use quarry_core::platform::CURRENT_PLATFORM;
///
/// if let Some(ext) = CURRENT_PLATFORM.exec_extension {
///     let candidate = format!("pre-commit{ext}");
/// }
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
    /// Extension an executable file is required to carry on this platform
    /// (including the leading dot), if any. `Some(".exe")` on Windows.
    pub exec_extension: Option<&'static str>,
}

impl Platform {
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: std::env::consts::ARCH,
            exec_extension: Self::detect_exec_extension(),
        }
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }

    const fn detect_exec_extension() -> Option<&'static str> {
        #[cfg(windows)]
        {
            Some(".exe")
        }

        #[cfg(not(windows))]
        {
            None
        }
    }
}

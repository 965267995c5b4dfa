//! Build-time information
//!
//! Build metadata captured at compile time by vergen, shown by
//! `keybinds version`.

use std::fmt;

/// Crate version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu, x86_64-apple-darwin)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Returns a formatted build version string
///
/// Format: `{version}+{target_triple}-opt{opt_level}`
/// Example: `0.1.0+x86_64-unknown-linux-gnu-opt0`
pub fn version_string() -> String {
    format!("{}+{}-opt{}", PKG_VERSION, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL)
}

/// Everything captured about the running build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub opt_level: &'static str,
    pub rustc: &'static str,
    pub channel: &'static str,
}

impl BuildInfo {
    /// Metadata of this binary
    pub const CURRENT: Self = Self {
        version: PKG_VERSION,
        timestamp: BUILD_TIMESTAMP,
        target: CARGO_TARGET_TRIPLE,
        opt_level: CARGO_OPT_LEVEL,
        rustc: RUSTC_SEMVER,
        channel: RUSTC_CHANNEL,
    };

    pub fn is_optimized(&self) -> bool {
        self.opt_level != "0"
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Built: {}", self.timestamp)?;
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "Optimization: {}", self.opt_level)?;
        write!(f, "Rustc: {} ({})", self.rustc, self.channel)
    }
}

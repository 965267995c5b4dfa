//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::input::{
    AxBind, Axis, DEFAULT_GRAVITY, DEFAULT_PRIORITY, DEFAULT_SENSITIVITY, InputDispatcher,
    InputError, KBind, KCombination, KeyCode, ResolveLogging, TriggerKind, WinitCollector,
};

/// Input system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Log runs of triggered bindings that share a primary key
    pub log_conflicts: bool,
    /// Log the bindings invoked by every resolve pass
    pub log_activations: bool,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
    /// Units per second a virtual axis moves toward its target
    pub axis_sensitivity: f32,
    /// Units per second a virtual axis falls back to zero
    pub axis_gravity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            log_conflicts: false,
            log_activations: false,
            log_level: "info".to_string(),
            axis_sensitivity: DEFAULT_SENSITIVITY,
            axis_gravity: DEFAULT_GRAVITY,
        }
    }
}

impl InputConfig {
    pub fn resolve_logging(&self) -> ResolveLogging {
        ResolveLogging {
            conflicts: self.log_conflicts,
            activations: self.log_activations,
        }
    }

    /// A winit collector using the configured axis smoothing
    pub fn collector(&self) -> WinitCollector {
        WinitCollector::with_smoothing(self.axis_sensitivity, self.axis_gravity)
    }
}

/// A key binding declared in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    /// Combinations in display form, e.g. `"Ctrl+Shift+F1"`
    pub keys: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub always_triggerable: bool,
    /// Trigger kinds a front end should attach listeners for
    #[serde(default = "default_triggers")]
    pub triggers: Vec<TriggerKind>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn default_triggers() -> Vec<TriggerKind> {
    vec![TriggerKind::Press]
}

impl BindingConfig {
    /// Parses the keys into combinations
    pub fn combinations(&self) -> Result<Vec<KCombination>, InputError> {
        if self.keys.is_empty() {
            return Err(InputError::NoKeys(self.name.clone()));
        }
        self.keys.iter().map(|keys| keys.parse()).collect()
    }

    /// Builds a binding with no listeners; the caller attaches them
    pub fn to_kbind(&self) -> Result<KBind, InputError> {
        Ok(KBind::new(self.name.clone(), self.combinations()?)
            .with_priority(self.priority)
            .always_triggerable(self.always_triggerable))
    }
}

/// An axis binding declared in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisBindingConfig {
    pub name: String,
    /// Alternative axis sources, e.g. `["Horizontal", "Mouse X"]`
    pub axes: Vec<String>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f32,
    /// Read raw values instead of smoothed ones
    #[serde(default = "default_raw")]
    pub raw: bool,
    /// Key names that must be held for the axes to read
    #[serde(default)]
    pub modifiers: Vec<String>,
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_raw() -> bool {
    true
}

impl AxisBindingConfig {
    /// Builds an axis binding with no listeners
    pub fn to_axbind(&self) -> Result<AxBind, InputError> {
        if self.axes.is_empty() {
            return Err(InputError::NoKeys(self.name.clone()));
        }
        let modifiers = self
            .modifiers
            .iter()
            .map(|name| name.parse::<KeyCode>())
            .collect::<Result<Vec<_>, _>>()?;
        let axes = self.axes.iter().map(|axis| {
            Axis::new(axis.clone())
                .with_multiplier(self.multiplier)
                .with_raw_value(self.raw)
                .with_modifiers(modifiers.iter().copied())
        });
        Ok(AxBind::new(self.name.clone(), axes))
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Input system configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Key bindings
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
    /// Axis bindings
    #[serde(default)]
    pub axes: Vec<AxisBindingConfig>,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_INPUT__LOG_CONFLICTS=true)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        // Find config directory - try relative to executable first, then current directory
        let config_dir = Self::find_config_dir();

        let mut builder = Config::builder();

        // Add profile-specific configuration
        if let Some(ref dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Add environment variables with APP_ prefix
        // Use __ as separator for nested fields (e.g., APP_INPUT__LOG_LEVEL)
        builder = builder.add_source(Self::environment());

        // Set the profile
        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Loads a single config file, still overlaid by APP_ environment variables
    ///
    /// The profile defaults to the file stem when the file does not set one.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom");
        Config::builder()
            .set_default("profile", stem)?
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    fn environment() -> Environment {
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        // Try to find config dir relative to executable
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        // Fall back to current directory
        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Builds a dispatcher with every configured binding registered
    ///
    /// Configured bindings have no listeners, so they join no group until
    /// the caller attaches listeners through
    /// [`InputDispatcher::update_binding`] or uses [`Self::dispatcher_with`].
    pub fn dispatcher(&self) -> Result<InputDispatcher, InputError> {
        self.dispatcher_with(|_, bind| bind)
    }

    /// Like [`Self::dispatcher`], passing each key binding through `attach`
    /// before it is registered
    ///
    /// Fails with [`InputError::DuplicateName`] when two key bindings, or two
    /// axis bindings, share a name.
    pub fn dispatcher_with(
        &self,
        mut attach: impl FnMut(&BindingConfig, KBind) -> KBind,
    ) -> Result<InputDispatcher, InputError> {
        let mut dispatcher = InputDispatcher::new().with_logging(self.input.resolve_logging());
        for binding in &self.bindings {
            if dispatcher.add_binding(attach(binding, binding.to_kbind()?)).is_none() {
                return Err(InputError::DuplicateName(binding.name.clone()));
            }
        }
        for axis in &self.axes {
            if !dispatcher.add_axis_binding(axis.to_axbind()?) {
                return Err(InputError::DuplicateName(axis.name.clone()));
            }
        }
        Ok(dispatcher)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            input: InputConfig::default(),
            bindings: Vec::new(),
            axes: Vec::new(),
        })
    }
}

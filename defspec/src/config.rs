//! Compiler configuration.
//!
//! Values come from [`CompilerConfig::default`], the environment
//! (`DEFSPEC_DEFAULT_MODULE`, `DEFSPEC_MAX_CALL_DEPTH`) or a `defspec.toml`:
//!
//! ```toml
//! [compiler]
//! default_module = "App"
//!
//! [modules.Count]
//! kind = "integer"
//! min = 0
//!
//! [modules.Name]
//! kind = "text"
//! min_len = 1
//! ```
//!
//! `[modules.*]` tables declare bounded value modules for the registry.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use defspec_runtime::{
    AtomEnum, BoundedList, FloatRange, IntegerRange, ModuleRegistry, TextPattern,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODULE: &str = "Main";
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Module that owns top-level items outside any `module` block.
    pub default_module: String,
    pub max_call_depth: usize,
    /// Print JSON instead of declarations from the CLI.
    pub emit_json: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_module: DEFAULT_MODULE.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            emit_json: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidToml { message: String },
    InvalidValue { key: String, value: String },
    Io { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidToml { message } => write!(f, "invalid defspec.toml: {}", message),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
            ConfigError::Io { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One `[modules.Name]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleDecl {
    Integer {
        min: Option<i64>,
        max: Option<i64>,
        default: Option<i64>,
    },
    Float {
        min: Option<f64>,
        max: Option<f64>,
        default: Option<f64>,
    },
    Text {
        pattern: Option<String>,
        #[serde(default)]
        min_len: usize,
        max_len: Option<usize>,
        default: Option<String>,
    },
    Atoms {
        members: Vec<String>,
    },
    List {
        #[serde(default)]
        min_len: usize,
        max_len: Option<usize>,
    },
}

/// A whole `defspec.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub compiler: CompilerConfig,
    pub modules: BTreeMap<String, ModuleDecl>,
}

impl ProjectConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let mut project: ProjectConfig =
            toml::from_str(source).map_err(|e| ConfigError::InvalidToml {
                message: e.to_string(),
            })?;
        project.compiler = project.compiler.checked()?;
        Ok(project)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Registry holding every declared module.
    pub fn registry(&self) -> Result<ModuleRegistry, ConfigError> {
        let mut registry = ModuleRegistry::new();
        for (name, decl) in &self.modules {
            decl.register(name, &mut registry)?;
        }
        Ok(registry)
    }
}

impl ModuleDecl {
    fn register(&self, name: &str, registry: &mut ModuleRegistry) -> Result<(), ConfigError> {
        match self {
            ModuleDecl::Integer { min, max, default } => {
                let mut module = IntegerRange::new(*min, *max);
                if let Some(d) = default {
                    module = module.with_default(*d);
                }
                registry.register(name, module);
            }
            ModuleDecl::Float { min, max, default } => {
                let mut module = FloatRange::new(*min, *max);
                if let Some(d) = default {
                    module = module.with_default(*d);
                }
                registry.register(name, module);
            }
            ModuleDecl::Text {
                pattern,
                min_len,
                max_len,
                default,
            } => {
                let module = match pattern {
                    Some(p) => TextPattern::matching(p).map_err(|e| ConfigError::InvalidValue {
                        key: format!("modules.{}.pattern", name),
                        value: e.to_string(),
                    })?,
                    None => TextPattern::any(),
                };
                let module = module.with_length(*min_len, *max_len);
                let module = match default {
                    Some(d) => module.with_default(d.as_str()),
                    None if *min_len > 0 || pattern.is_some() => module.without_default(),
                    None => module,
                };
                registry.register(name, module);
            }
            ModuleDecl::Atoms { members } => {
                if members.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: format!("modules.{}.members", name),
                        value: "[]".to_string(),
                    });
                }
                registry.register(name, AtomEnum::new(members.iter().map(String::as_str)));
            }
            ModuleDecl::List { min_len, max_len } => {
                registry.register(name, BoundedList::new(*min_len, *max_len));
            }
        }
        Ok(())
    }
}

impl CompilerConfig {
    /// Defaults overridden by the environment. Unset or blank variables keep
    /// the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// `self` with every set, non-blank `DEFSPEC_*` variable applied on top.
    /// A set variable wins even when it equals the built-in default.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.overridden_by(|key| env::var(key).ok())
    }

    fn overridden_by(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        self.apply_env(lookup)?;
        self.checked()
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(module) = lookup("DEFSPEC_DEFAULT_MODULE") {
            let module = module.trim();
            if !module.is_empty() {
                self.default_module = module.to_string();
            }
        }
        if let Some(depth) = lookup("DEFSPEC_MAX_CALL_DEPTH") {
            let trimmed = depth.trim();
            if !trimmed.is_empty() {
                self.max_call_depth = trimmed.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DEFSPEC_MAX_CALL_DEPTH".to_string(),
                    value: depth.clone(),
                })?;
            }
        }
        Ok(())
    }

    /// Parse the `[compiler]` table of a `defspec.toml`. Missing keys keep
    /// their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ProjectConfig::from_toml_str(source)?.compiler)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(ProjectConfig::from_toml_file(path)?.compiler)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.default_module.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "default_module".to_string(),
                value: self.default_module,
            });
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_call_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

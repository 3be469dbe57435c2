//! Extension points for custom validators.
//!
//! A configuration entry that is not a built-in key and carries
//! `module_path` / `class_name` is resolved against a [`PluginRegistry`]
//! once, at load time. Plugins live in external crates and are registered
//! by the embedding application; the pipeline itself never changes.

use crate::config::ValidatorOptions;
use crate::judge::JudgeHandle;
use crate::validator::Validator;
use std::collections::HashMap;
use std::sync::Arc;
use textguard_core::{Error, Result};

/// Everything a custom validator may be constructed from
pub struct ValidatorContext<'a> {
    /// Configuration key of the entry
    pub key: &'a str,
    /// The entry's options record
    pub options: &'a ValidatorOptions,
    /// Shared judge, when one is configured
    pub judge: Option<JudgeHandle>,
}

/// A module of custom validator classes.
///
/// Implement this trait in external crates to ship validators that the
/// loader instantiates by `module_path` and `class_name`.
pub trait ValidatorPlugin: Send + Sync {
    /// Module path configuration entries refer to
    fn module_path(&self) -> &str;

    /// Class names this module can instantiate
    fn available_classes(&self) -> Vec<String>;

    /// Construct an instance of `class_name`
    fn instantiate(
        &self,
        class_name: &str,
        context: &ValidatorContext<'_>,
    ) -> Result<Arc<dyn Validator>>;
}

/// Constructor for a single custom validator class
pub type ValidatorFactory =
    Arc<dyn Fn(&ValidatorContext<'_>) -> Result<Arc<dyn Validator>> + Send + Sync>;

/// Plugin modules and standalone factories, keyed by module path
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn ValidatorPlugin>>,
    factories: HashMap<(String, String), ValidatorFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin module under its own module path
    pub fn register(&mut self, plugin: Arc<dyn ValidatorPlugin>) {
        let module_path = plugin.module_path().to_string();
        if self.plugins.insert(module_path.clone(), plugin).is_some() {
            tracing::warn!("Plugin module '{}' registered twice, keeping the latest", module_path);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_plugin(mut self, plugin: Arc<dyn ValidatorPlugin>) -> Self {
        self.register(plugin);
        self
    }

    /// Register a single class backed by a closure
    pub fn register_fn<F>(
        &mut self,
        module_path: impl Into<String>,
        class_name: impl Into<String>,
        factory: F,
    ) where
        F: Fn(&ValidatorContext<'_>) -> Result<Arc<dyn Validator>> + Send + Sync + 'static,
    {
        self.factories
            .insert((module_path.into(), class_name.into()), Arc::new(factory));
    }

    /// Whether anything is registered under `module_path`
    pub fn has_module(&self, module_path: &str) -> bool {
        self.plugins.contains_key(module_path)
            || self.factories.keys().any(|(module, _)| module == module_path)
    }

    /// All `module_path::class_name` references that can be resolved
    pub fn available(&self) -> Vec<String> {
        let mut references: Vec<String> = self
            .plugins
            .iter()
            .flat_map(|(module, plugin)| {
                plugin
                    .available_classes()
                    .into_iter()
                    .map(move |class| format!("{}::{}", module, class))
            })
            .chain(
                self.factories
                    .keys()
                    .map(|(module, class)| format!("{}::{}", module, class)),
            )
            .collect();
        references.sort();
        references.dedup();
        references
    }

    fn available_list(&self) -> String {
        let references = self.available();
        if references.is_empty() {
            "none".to_string()
        } else {
            references.join(", ")
        }
    }

    /// Instantiate `class_name` from `module_path`
    pub fn instantiate(
        &self,
        module_path: &str,
        class_name: &str,
        context: &ValidatorContext<'_>,
    ) -> Result<Arc<dyn Validator>> {
        let key = (module_path.to_string(), class_name.to_string());
        if let Some(factory) = self.factories.get(&key) {
            return factory(context);
        }

        if !self.has_module(module_path) {
            return Err(Error::plugin(format!(
                "Could not find module '{}' (available: {})",
                module_path,
                self.available_list()
            )));
        }

        match self.plugins.get(module_path) {
            Some(plugin) if plugin.available_classes().iter().any(|c| c == class_name) => {
                plugin.instantiate(class_name, context)
            }
            _ => Err(Error::plugin(format!(
                "Class '{}' not found in module '{}' (available: {})",
                class_name,
                module_path,
                self.available_list()
            ))),
        }
    }
}

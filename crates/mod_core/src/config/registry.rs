//! Registry of all mod configs
//!
//! The composition root registers each mod's config explicitly, then hands
//! the registry to the [`EventSystem`](crate::events::EventSystem) so config
//! notifications reach the right mod.

use super::managed::ModConfig;
use super::ConfigError;
use crate::core::settings::CoreSettings;
use crate::events::{Event, EventHandler, EventType};

/// All registered mod configs
#[derive(Default)]
pub struct ConfigRegistry {
    configs: Vec<Box<dyn ModConfig>>,
}

impl ConfigRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a config
    pub fn register(&mut self, config: Box<dyn ModConfig>) {
        log::debug!("Registered config handler for {}", config.mod_id());
        self.configs.push(config);
    }

    /// Number of registered configs
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether no config is registered
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Ids of all registered mods, in registration order
    pub fn mod_ids(&self) -> Vec<String> {
        self.configs.iter().map(|c| c.mod_id()).collect()
    }

    /// Get the config of a mod
    pub fn get(&self, mod_id: &str) -> Option<&dyn ModConfig> {
        self.configs.iter().find(|c| c.mod_id() == mod_id).map(|config| config.as_ref())
    }

    /// Initialize every config from `<config_dir>/<mod_id>.<ext>`
    pub fn initialize_all(&mut self, settings: &CoreSettings) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&settings.config_dir)?;
        for config in &mut self.configs {
            let path = settings.config_path(&config.mod_id());
            log::info!("Loading config for {} from {}", config.mod_id(), path.display());
            config.initialize(&path)?;
        }
        Ok(())
    }

    /// Run the init hook of every config
    pub fn run_init_hooks(&mut self) {
        for config in &mut self.configs {
            config.init_hook();
        }
    }

    /// Run the post-init hook of every config
    pub fn run_post_init_hooks(&mut self) {
        for config in &mut self.configs {
            config.post_init_hook();
        }
    }

    /// Reload all values of a mod; returns whether a config handled it
    pub fn handle_config_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.route(mod_id, |config| config.on_config_changed(mod_id))
    }

    /// Reload a mod after its file changed; returns whether the reload succeeded
    pub fn handle_config_file_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.route(mod_id, |config| config.on_config_file_changed(mod_id))
    }

    fn route(
        &mut self,
        mod_id: &str,
        mut reload: impl FnMut(&mut dyn ModConfig) -> Result<bool, ConfigError>,
    ) -> Result<bool, ConfigError> {
        let mut handled = false;
        for config in &mut self.configs {
            if reload(config.as_mut())? {
                handled = true;
                if config.should_hook_on_reload() {
                    config.init_hook();
                    config.post_init_hook();
                }
            }
        }

        if !handled {
            log::debug!("No config registered for {mod_id}");
        }
        Ok(handled)
    }
}

impl EventHandler for ConfigRegistry {
    fn on_event(&mut self, event: &Event) -> bool {
        let Some(mod_id) = event.get_mod_id() else {
            log::warn!("Ignoring {:?} event without a mod id", event.event_type);
            return false;
        };

        let result = match event.event_type {
            EventType::ConfigChanged => self.handle_config_changed(mod_id),
            EventType::ConfigFileChanged => self.handle_config_file_changed(mod_id),
        };

        result.unwrap_or_else(|e| {
            log::error!("Failed to reload config for {mod_id}: {e}");
            false
        })
    }
}

//! Config lifecycle for a single mod
//!
//! A mod implements [`ConfigSource`] to declare its sections and read its
//! values; [`ManagedConfig`] drives it through initialization and through
//! reloads triggered by config change events.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use super::configuration::{Category, Configuration};
use super::handler::ConfigHandler;
use super::section::Section;
use super::ConfigError;

/// Callbacks a mod implements to describe its config
pub trait ConfigSource {
    /// Called after the config is loaded, before any values are read
    ///
    /// Add sections and do other setup here.
    fn init(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError>;

    /// Refresh values that can only be loaded when not in-game
    ///
    /// [`ConfigSource::reload_ingame`] always runs after this; do not read the
    /// same values in both.
    fn reload_non_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError>;

    /// Refresh values that can be changed while in-game
    fn reload_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError>;

    /// Whether the init hooks should run again after a reload
    fn should_hook_on_reload(&self) -> bool {
        true
    }

    /// Hook run during framework initialization
    fn init_hook(&mut self) {}

    /// Hook run after framework initialization
    fn post_init_hook(&mut self) {}
}

/// Object-safe view of a managed config, as stored by the registry
pub trait ModConfig {
    /// Id of the owning mod
    fn mod_id(&self) -> String;

    /// Open the config file at `path`, set up sections and read all values
    fn initialize(&mut self, path: &Path) -> Result<(), ConfigError>;

    /// Snapshot of the registered sections
    fn sections(&self) -> Vec<Section>;

    /// Snapshot of a backing category
    fn category(&self, name: &str) -> Option<Category>;

    /// Whether the init hooks should run again after a reload
    fn should_hook_on_reload(&self) -> bool;

    /// Hook run during framework initialization
    fn init_hook(&mut self);

    /// Hook run after framework initialization
    fn post_init_hook(&mut self);

    /// Handle a "config changed" notification; returns whether it applied to this mod
    fn on_config_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError>;

    /// Handle a "config file changed" notification; returns whether the reload succeeded
    fn on_config_file_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError>;
}

/// A [`ConfigSource`] together with the handler it reads from
#[derive(Debug)]
pub struct ManagedConfig<S> {
    handler: ConfigHandler,
    source: S,
}

impl<S: ConfigSource> ManagedConfig<S> {
    /// Create an uninitialized managed config
    pub fn new(mod_id: impl Into<String>, source: S) -> Self {
        Self {
            handler: ConfigHandler::new(mod_id),
            source,
        }
    }

    /// The handler
    pub const fn handler(&self) -> &ConfigHandler {
        &self.handler
    }

    /// The mutable handler
    pub fn handler_mut(&mut self) -> &mut ConfigHandler {
        &mut self.handler
    }

    /// The source
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The mutable source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Initialize from the config file at `path`
    pub fn initialize_at(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.initialize_with(Configuration::open(path)?)
    }

    /// Initialize from an already opened configuration
    ///
    /// Any sections from a previous initialization are discarded.
    pub fn initialize_with(&mut self, config: Configuration) -> Result<(), ConfigError> {
        let mod_id = self.handler.mod_id().to_string();
        self.handler = ConfigHandler::with_configuration(mod_id, config);
        self.source.init(&mut self.handler)?;
        self.reload_all()?;
        self.handler.save_if_changed()?;
        log::debug!("Initialized config for {}", self.handler.mod_id());
        Ok(())
    }

    /// Reload all values after the settings UI changed them
    pub fn handle_config_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        if mod_id != self.handler.mod_id() {
            return Ok(false);
        }

        log::info!("Reloading all configs for modid: {mod_id}");
        self.reload_all()?;
        self.handler.save_if_changed()?;
        Ok(true)
    }

    /// Re-read the file and reload in-game values after it changed on disk
    pub fn handle_config_file_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        if mod_id != self.handler.mod_id() {
            return Ok(false);
        }

        log::info!("Reloading ingame configs for modid: {mod_id}");
        self.handler.load()?;
        self.source.reload_ingame(&mut self.handler)?;
        self.handler.save_if_changed()?;
        Ok(true)
    }

    fn reload_all(&mut self) -> Result<(), ConfigError> {
        self.source.reload_non_ingame(&mut self.handler)?;
        self.source.reload_ingame(&mut self.handler)
    }
}

impl<S: ConfigSource> ModConfig for ManagedConfig<S> {
    fn mod_id(&self) -> String {
        self.handler.mod_id().to_string()
    }

    fn initialize(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.initialize_at(path)
    }

    fn sections(&self) -> Vec<Section> {
        self.handler.sections().to_vec()
    }

    fn category(&self, name: &str) -> Option<Category> {
        self.handler.category(name).cloned()
    }

    fn should_hook_on_reload(&self) -> bool {
        self.source.should_hook_on_reload()
    }

    fn init_hook(&mut self) {
        self.source.init_hook();
    }

    fn post_init_hook(&mut self) {
        self.source.post_init_hook();
    }

    fn on_config_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.handle_config_changed(mod_id)
    }

    fn on_config_file_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.handle_config_file_changed(mod_id)
    }
}

/// Shared configs can be registered while the mod keeps a handle to read its values
impl<T: ModConfig> ModConfig for Rc<RefCell<T>> {
    fn mod_id(&self) -> String {
        self.borrow().mod_id()
    }

    fn initialize(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.borrow_mut().initialize(path)
    }

    fn sections(&self) -> Vec<Section> {
        self.borrow().sections()
    }

    fn category(&self, name: &str) -> Option<Category> {
        self.borrow().category(name)
    }

    fn should_hook_on_reload(&self) -> bool {
        self.borrow().should_hook_on_reload()
    }

    fn init_hook(&mut self) {
        self.borrow_mut().init_hook();
    }

    fn post_init_hook(&mut self) {
        self.borrow_mut().post_init_hook();
    }

    fn on_config_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.borrow_mut().on_config_changed(mod_id)
    }

    fn on_config_file_changed(&mut self, mod_id: &str) -> Result<bool, ConfigError> {
        self.borrow_mut().on_config_file_changed(mod_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValue, RestartRequirement, ValueOptions};

    #[derive(Default)]
    struct TestSource {
        max_mobs: i32,
        greeting: String,
        non_ingame_reloads: u32,
        ingame_reloads: u32,
    }

    impl ConfigSource for TestSource {
        fn init(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
            config.add_section_with("general", "general", Some("General settings"))?;
            config.add_section("client")?;
            Ok(())
        }

        fn reload_non_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
            config.activate_section("general")?;
            self.max_mobs = config.value_with(
                "maxMobs",
                20,
                ValueOptions::new().with_restart(RestartRequirement::RequiresGameRestart),
            )?;
            self.non_ingame_reloads += 1;
            Ok(())
        }

        fn reload_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
            config.activate_section("client")?;
            self.greeting = config.value("greeting", "hello".to_string())?;
            self.ingame_reloads += 1;
            Ok(())
        }
    }

    #[test]
    fn test_initialize_reads_all_values_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testmod.toml");

        let mut managed = ManagedConfig::new("testmod", TestSource::default());
        managed.initialize_at(&path).unwrap();

        assert_eq!(managed.source().max_mobs, 20);
        assert_eq!(managed.source().greeting, "hello");
        assert_eq!(managed.source().non_ingame_reloads, 1);
        assert_eq!(managed.source().ingame_reloads, 1);
        assert!(path.exists());
        assert!(!managed.handler().configuration().has_changed());
        assert_eq!(ModConfig::sections(&managed).len(), 2);
    }

    #[test]
    fn test_config_changed_reloads_everything() {
        let mut managed = ManagedConfig::new("testmod", TestSource::default());
        managed.initialize_with(Configuration::new()).unwrap();

        managed
            .handler_mut()
            .configuration_mut()
            .category_mut("general")
            .unwrap()
            .get_mut("maxMobs")
            .unwrap()
            .set(ConfigValue::Int(5))
            .unwrap();

        assert!(!managed.handle_config_changed("othermod").unwrap());
        assert_eq!(managed.source().max_mobs, 20);

        assert!(managed.handle_config_changed("testmod").unwrap());
        assert_eq!(managed.source().max_mobs, 5);
        assert_eq!(managed.source().non_ingame_reloads, 2);
        assert_eq!(managed.source().ingame_reloads, 2);
    }

    #[test]
    fn test_file_changed_reloads_ingame_values_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testmod.toml");

        let mut managed = ManagedConfig::new("testmod", TestSource::default());
        managed.initialize_at(&path).unwrap();

        std::fs::write(&path, "[general]\nmaxMobs = 99\n\n[client]\ngreeting = \"hi\"\n").unwrap();

        assert!(!managed.handle_config_file_changed("othermod").unwrap());
        assert!(managed.handle_config_file_changed("testmod").unwrap());
        assert_eq!(managed.source().greeting, "hi");
        assert_eq!(managed.source().max_mobs, 20);
        assert_eq!(managed.source().non_ingame_reloads, 1);
        assert_eq!(managed.source().ingame_reloads, 2);
    }

    #[test]
    fn test_reinitialize_discards_old_sections() {
        let mut managed = ManagedConfig::new("testmod", TestSource::default());
        managed.initialize_with(Configuration::new()).unwrap();
        managed.initialize_with(Configuration::new()).unwrap();
        assert_eq!(managed.handler().sections().len(), 2);
    }

    #[test]
    fn test_shared_handle_exposes_mod_config() {
        let shared = Rc::new(RefCell::new(ManagedConfig::new("testmod", TestSource::default())));
        let mut registered: Box<dyn ModConfig> = Box::new(Rc::clone(&shared));

        let dir = tempfile::tempdir().unwrap();
        registered.initialize(&dir.path().join("testmod.ron")).unwrap();

        assert_eq!(registered.mod_id(), "testmod");
        assert_eq!(shared.borrow().source().greeting, "hello");
        assert_eq!(registered.category("client").unwrap().get("greeting").unwrap().get_string(), Some("hello"));
    }
}

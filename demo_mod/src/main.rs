//! Example mod built on mod_core
//!
//! Loads the framework settings, registers a handful of items and a mod
//! config, then simulates a config file change and shows the reloaded
//! reward items.

use std::cell::RefCell;
use std::rc::Rc;

use mod_core::core::SettingsError;
use mod_core::foundation::logging;
use mod_core::items::RegistryError;
use mod_core::prelude::*;

const MOD_ID: &str = "demomod";
const SETTINGS_FILE: &str = "mod_core.toml";

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Item error: {0}")]
    Item(#[from] ItemParseError),
}

#[derive(Debug, Default)]
struct DemoSource {
    spawn_rate: i32,
    speed: f64,
    show_tips: bool,
    rewards: Vec<String>,
}

impl ConfigSource for DemoSource {
    fn init(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
        config.add_section_with("general", "general", Some("General settings"))?;
        config.add_section_with("client", "client", Some("Client-side settings"))?;
        Ok(())
    }

    fn reload_non_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
        config.activate_section("general")?;
        self.spawn_rate = config.value_with(
            "spawnRate",
            10,
            ValueOptions::new()
                .with_comment("Spawns per minute")
                .with_bound(Bound::of(0, 100))
                .with_restart(RestartRequirement::RequiresWorldRestart),
        )?;
        Ok(())
    }

    fn reload_ingame(&mut self, config: &mut ConfigHandler) -> Result<(), ConfigError> {
        config.activate_section("general")?;
        self.speed = config.value_with("speed", 1.5, ValueOptions::new().with_bound(Bound::of(0.1, 10.0)))?;
        self.rewards = config.value_with(
            "rewards",
            vec!["minecraft:stick;0#4".to_string(), "plankWood".to_string()],
            ValueOptions::new().with_comment("Items given on level up: name;damage#size or an alias"),
        )?;

        config.activate_section("client")?;
        self.show_tips = config.value("showTips", true)?;
        Ok(())
    }

    fn init_hook(&mut self) {
        log::info!("{MOD_ID} init hook, spawn rate {}", self.spawn_rate);
    }

    fn post_init_hook(&mut self) {
        log::info!("{MOD_ID} post-init hook, speed {:.2}, tips {}", self.speed, self.show_tips);
    }
}

fn register_items() -> Result<(ItemRegistry, AliasTable), DemoError> {
    let mut registry = ItemRegistry::new();
    registry.register_item("stick", 64)?;
    registry.register_item("ender_pearl", 16)?;
    let oak = registry.register_block("oak_planks")?;
    let spruce = registry.register_block("spruce_planks")?;
    registry.register_other("zombie", "entity")?;

    let mut aliases = AliasTable::new();
    aliases.register("plankWood", ItemStack::new(oak, 1, 0));
    aliases.register("plankWood", ItemStack::new(spruce, 1, 0));

    log::info!("Registered {} objects and {} aliases", registry.len(), aliases.names().count());
    Ok((registry, aliases))
}

fn log_rewards(codec: &ItemCodec<'_>, rewards: &[String]) -> Result<(), DemoError> {
    for stack in codec.parse_item_list(rewards)? {
        let text = codec.to_config_string(Some(&stack), !stack.is_wildcard(), true);
        log::info!("Reward: {}", text.as_deref().unwrap_or("<unregistered>"));
    }
    Ok(())
}

fn run() -> Result<(), DemoError> {
    let settings_path = std::env::args().nth(1).unwrap_or_else(|| SETTINGS_FILE.to_string());
    let settings = CoreSettings::load_or_default(&settings_path)?;
    settings.validate()?;
    logging::init_with_level(&settings.log_level);

    log::info!("Starting {MOD_ID} with settings from {settings_path}");

    let (items, aliases) = register_items()?;
    let codec = ItemCodec::new(&items, &aliases);

    let demo = Rc::new(RefCell::new(ManagedConfig::new(MOD_ID, DemoSource::default())));
    let mut configs = ConfigRegistry::new();
    configs.register(Box::new(Rc::clone(&demo)));
    configs.initialize_all(&settings)?;
    configs.run_init_hooks();
    configs.run_post_init_hooks();

    log_rewards(&codec, &demo.borrow().source().rewards)?;

    let configs = Rc::new(RefCell::new(configs));
    let mut events = EventSystem::new();
    events.register_handler(EventType::ConfigChanged, Box::new(Rc::clone(&configs)));
    events.register_handler(EventType::ConfigFileChanged, Box::new(Rc::clone(&configs)));

    events.post(0.5, Event::config_file_changed(MOD_ID));
    events.update_time(1.0);
    let consumed = events.dispatch();
    log::info!("Dispatched config events, {consumed} consumed");

    match codec.parse_recipe_item("minecraft:zombie") {
        Ok(item) => log::warn!("Unexpectedly parsed {item:?}"),
        Err(e) => log::info!("Rejected as expected: {e}"),
    }

    log_rewards(&codec, &demo.borrow().source().rewards)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("{MOD_ID} failed: {e}");
        eprintln!("{MOD_ID} failed: {e}");
        std::process::exit(1);
    }
}

//! Combat hooks — точки расширения для игрового кода (скрипты, звук, UI)
//!
//! Все методы имеют default no-op реализацию: hook переопределяет только то, что ему нужно.
//! Hooks вызываются синхронно внутри combat систем, в порядке регистрации.

use bevy::prelude::*;

use crate::equipment::{WeaponId, WeaponSetting};

pub trait CombatHooks: Send + Sync + 'static {
    fn on_reload_start(&mut self, _owner: Entity, _weapon: &WeaponId) {}

    fn on_reload_end(&mut self, _owner: Entity, _success: bool, _ammo_taken: u32) {}

    fn on_fire_start(&mut self, _owner: Entity, _weapon: &WeaponId) {}

    fn on_death(&mut self, _entity: Entity) {}

    /// Weapon-specific запрет перезарядки (например, квестовое оружие)
    fn can_reload(&self, _owner: Entity, _setting: &WeaponSetting) -> bool {
        true
    }
}

/// Набор hooks персонажа
#[derive(Component, Default)]
pub struct CombatHookSet {
    hooks: Vec<Box<dyn CombatHooks>>,
}

impl CombatHookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: impl CombatHooks) -> Self {
        self.register(hook);
        self
    }

    pub fn register(&mut self, hook: impl CombatHooks) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn reload_start(&mut self, owner: Entity, weapon: &WeaponId) {
        for hook in &mut self.hooks {
            hook.on_reload_start(owner, weapon);
        }
    }

    pub fn reload_end(&mut self, owner: Entity, success: bool, ammo_taken: u32) {
        for hook in &mut self.hooks {
            hook.on_reload_end(owner, success, ammo_taken);
        }
    }

    pub fn fire_start(&mut self, owner: Entity, weapon: &WeaponId) {
        for hook in &mut self.hooks {
            hook.on_fire_start(owner, weapon);
        }
    }

    pub fn death(&mut self, entity: Entity) {
        for hook in &mut self.hooks {
            hook.on_death(entity);
        }
    }

    /// Reload разрешён, только если ни один hook не возражает
    pub fn can_reload(&self, owner: Entity, setting: &WeaponSetting) -> bool {
        self.hooks.iter().all(|hook| hook.can_reload(owner, setting))
    }
}

impl std::fmt::Debug for CombatHookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatHookSet")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

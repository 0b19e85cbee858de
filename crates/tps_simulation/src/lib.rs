//! TPS Combat Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless, без рендера)
//!
//! Разделение ответственности:
//! - ECS = правила боя (движение, stamina, оружие, инвентарь, урон, смерть, гранаты)
//! - Движок = физика, рендер, анимации, trace (общается через events)
//!
//! Всё, что зависит от времени, крутится в FixedUpdate (60Hz) и упорядочено
//! через [`CombatSet`].

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod combat;
pub mod components;
pub mod equipment;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod movement;
pub mod scheduler;

// Re-export базовых типов для удобства
pub use combat::{
    ActiveWeapon, AdditionalWeaponInfo, CharacterDied, CombatPlugin, CombatSet, DamageCause,
    DamageDealt, DamageRequest, Grenade, GrenadeImpact, GrenadeSettings, Stamina, StaminaConfig,
    WeaponFired, WeaponInstance, WeaponReloadEnded, WeaponReloadStarted,
};
pub use components::*;
pub use equipment::{
    AttackIntent, EquipmentPlugin, InventoryLedger, ReloadIntent, SwitchDirection,
    SwitchWeaponIntent, WeaponId, WeaponSetting, WeaponSwitched, WeaponTable, WeaponType,
};
pub use error::{CombatError, ErrorKind};
pub use hooks::{CombatHookSet, CombatHooks};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use movement::{MovementModeChanged, MovementPlugin};
pub use scheduler::{TaskHandle, TaskScheduler};

/// Fixed tick частота симуляции
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог прийти из create_headless_app — не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .init_resource::<StaminaConfig>()
            .init_resource::<WeaponTable>()
            .init_resource::<TaskScheduler>()
            // Подсистемы
            .add_plugins((CombatPlugin, MovementPlugin, EquipmentPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (со всеми combat плагинами)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Прогоняет ровно один FixedUpdate tick длиной `dt`
///
/// Не зависит от wall-clock: `Time<Fixed>` продвигается вручную, поэтому
/// результаты воспроизводимы в тестах.
pub fn run_fixed_tick(app: &mut App, dt: f32) {
    let world = app.world_mut();
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(std::time::Duration::from_secs_f32(dt));
    // FixedUpdate системы читают Res<Time<Fixed>>; Time (generic) тоже выставляем
    let fixed = world.resource::<Time<Fixed>>().as_generic();
    *world.resource_mut::<Time>() = fixed;
    world.run_schedule(FixedUpdate);
}

/// Прогоняет `ticks` fixed tick'ов по 1/60 s
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    let dt = (1.0 / SIMULATION_HZ) as f32;
    for _ in 0..ticks {
        run_fixed_tick(app, dt);
    }
}

/// Все события типа `E`, ещё лежащие в буферах (для тестов и отладки)
///
/// `run_fixed_tick` не вызывает `Events::update`, так что здесь видна вся история.
pub fn collect_events<E: Event + Clone>(world: &World) -> Vec<E> {
    let Some(events) = world.get_resource::<Events<E>>() else {
        return Vec::new();
    };
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

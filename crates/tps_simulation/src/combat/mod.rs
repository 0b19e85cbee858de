//! Combat module — weapon lifecycle, stamina, grenades, damage/death
//!
//! ECS ответственность:
//! - Game state: WeaponInstance (патроны, reload, разброс), Stamina, Health/Shield
//! - Combat rules: fire loop, reload по таймеру, radial damage, death sequence
//! - Events: WeaponFired, WeaponReloadStarted/Ended, DamageDealt, CharacterDied
//!
//! Движок ответственность:
//! - hit detection (→ DamageRequest), движение гранат (→ GrenadeImpact)
//! - анимации смерти, ragdoll физика, FX/звук

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов (модули weapon/stamina/grenade есть и в components, и в systems)
pub use components::{
    radial_damage_at, shoot_height, ActiveWeapon, AdditionalWeaponInfo, Grenade, GrenadePhase,
    GrenadeSettings, Shot, Stamina, StaminaConfig, WeaponInstance, WeaponRuntimeState,
};
pub use events::{
    CharacterDied, DamageCause, DamageDealt, DamageRequest, DeathSequenceStarted,
    ExplosionEffectRequested, GrenadeDetonated, GrenadeImpact, RagdollEnabled,
    StatusEffectApplied, UseAbilityIntent, WeaponFired, WeaponReloadEnded, WeaponReloadStarted,
};
pub use systems::{
    abort_reload, apply_damage_requests, arm_grenades, complete_reloads, enable_ragdolls,
    handle_character_death, process_ability_intents, recharge_shields, spawn_fired_grenades,
    tick_grenades, tick_stamina, tick_status_effects, tick_weapon_fire, try_reload,
    ReloadNotifications,
};

use crate::scheduler::{tick_task_scheduler, RagdollTimerElapsed, ReloadTimerElapsed};

/// Фазы fixed tick (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Intents: экипировка, переключение, reload, огонь, способности
    Input,
    /// Режим движения, скорость, точка выстрела
    Movement,
    Stamina,
    /// Таймеры, reload completion, fire loop, гранаты
    Weapons,
    /// Урон, эффекты, смерть
    Damage,
}

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. Input — process_ability_intents (+ equipment intents из EquipmentPlugin)
/// 2. Movement — MovementPlugin
/// 3. Stamina — tick_stamina
/// 4. Weapons — scheduler → reload completion → fire → grenades
/// 5. Damage — effects → damage → death → ragdoll → shields
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                CombatSet::Input,
                CombatSet::Movement,
                CombatSet::Stamina,
                CombatSet::Weapons,
                CombatSet::Damage,
            )
                .chain(),
        );

        // Регистрация событий
        app.add_event::<ReloadTimerElapsed>()
            .add_event::<RagdollTimerElapsed>()
            .add_event::<WeaponReloadStarted>()
            .add_event::<WeaponReloadEnded>()
            .add_event::<WeaponFired>()
            .add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<CharacterDied>()
            .add_event::<DeathSequenceStarted>()
            .add_event::<RagdollEnabled>()
            .add_event::<StatusEffectApplied>()
            .add_event::<UseAbilityIntent>()
            .add_event::<GrenadeImpact>()
            .add_event::<GrenadeDetonated>()
            .add_event::<ExplosionEffectRequested>();

        app.add_systems(
            FixedUpdate,
            process_ability_intents.in_set(CombatSet::Input),
        )
        .add_systems(FixedUpdate, tick_stamina.in_set(CombatSet::Stamina))
        .add_systems(
            FixedUpdate,
            (
                // Фаза 1: таймеры → reload completion
                tick_task_scheduler,
                complete_reloads,
                // Фаза 2: огонь
                tick_weapon_fire,
                // Фаза 3: гранаты
                spawn_fired_grenades,
                arm_grenades,
                tick_grenades,
            )
                .chain()
                .in_set(CombatSet::Weapons),
        )
        .add_systems(
            FixedUpdate,
            (
                tick_status_effects,
                apply_damage_requests,
                handle_character_death,
                enable_ragdolls,
                recharge_shields,
            )
                .chain()
                .in_set(CombatSet::Damage),
        );
    }
}

//! Combat events (weapon lifecycle, damage, death, grenades)

use bevy::prelude::*;

use crate::components::StatusEffectSpec;
use crate::equipment::{ProjectileKind, WeaponId};

// ============================================================================
// Weapon lifecycle
// ============================================================================

#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponReloadStarted {
    pub owner: Entity,
    pub weapon_id: WeaponId,
    pub reload_time: f32,
}

/// Перезарядка закончилась (успешно или прервана)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponReloadEnded {
    pub owner: Entity,
    pub success: bool,
    /// Сколько патронов взято из резерва
    pub ammo_taken: u32,
}

/// Выстрел (fire-start для анимаций и звука)
///
/// Hitscan попадание считает движок и возвращает `DamageRequest`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponFired {
    pub owner: Entity,
    pub weapon_id: WeaponId,
    pub origin: Vec3,
    pub target: Vec3,
    pub dispersion: f32,
    pub damage: f32,
    pub projectiles: u32,
    pub projectile: ProjectileKind,
    pub rounds_left: u32,
}

// ============================================================================
// Damage
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DamageCause {
    /// Попадание (hitscan, скрипт)
    Direct { instigator: Option<Entity> },
    /// Взрыв: на цель дополнительно ложится status effect
    Radial {
        instigator: Option<Entity>,
        effect: Option<StatusEffectSpec>,
    },
    /// Тик status effect (горение)
    Effect,
}

/// Запрос урона (engine hit detection / взрывы / эффекты → ECS)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub cause: DamageCause,
}

/// Событие: урон нанесён
///
/// Генерируется после применения damage к Shield/Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub instigator: Option<Entity>,
    pub shield_damage: f32,
    pub health_damage: f32,
    pub target_died: bool,
}

/// Событие: персонаж умер (ровно один раз)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CharacterDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Death sequence начался (clip = None → ragdoll сразу)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DeathSequenceStarted {
    pub entity: Entity,
    pub clip: Option<String>,
    pub ragdoll_delay: f32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RagdollEnabled {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct StatusEffectApplied {
    pub target: Entity,
    pub effect: String,
}

/// Активировать способность персонажа
#[derive(Event, Debug, Clone, Copy)]
pub struct UseAbilityIntent {
    pub entity: Entity,
}

// ============================================================================
// Grenades
// ============================================================================

/// Граната ударилась (движок) → взвести
#[derive(Event, Debug, Clone, Copy)]
pub struct GrenadeImpact {
    pub grenade: Entity,
}

/// Взрыв (overlapping = все персонажи внутри outer radius, информационно)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GrenadeDetonated {
    pub grenade: Entity,
    pub instigator: Option<Entity>,
    pub position: Vec3,
    pub overlapping: Vec<Entity>,
}

/// Запрос на FX/звук взрыва (только если ассет задан)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ExplosionEffectRequested {
    pub position: Vec3,
    pub fx: Option<String>,
    pub sound: Option<String>,
}

//! Grenade projectile: Inert → Armed → Detonated
//!
//! Граната спавнится inert, движок двигает её и сообщает об ударе (GrenadeImpact).
//! После взведения `elapsed` накапливается каждый tick; детонация происходит ровно
//! один раз, когда `elapsed > fuse_time` (строго). Перерасход на один tick не
//! корректируется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::StatusEffectSpec;

/// Настройки взрыва (designer-tunable)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrenadeSettings {
    /// Время от взведения до взрыва (секунды)
    pub fuse_time: f32,
    /// Внутри — полный урон
    pub inner_radius: f32,
    /// Снаружи — урона нет
    pub outer_radius: f32,
    pub max_damage: f32,
    /// min_damage = max_damage × factor (на границе outer_radius)
    pub min_damage_factor: f32,
    pub falloff_exponent: f32,
    /// FX/звук взрыва (отсутствует = пропускаем)
    pub explosion_fx: Option<String>,
    pub explosion_sound: Option<String>,
    /// Логировать сферы взрыва (вместо глобального debug флага)
    pub debug_explode: bool,
    /// Status effect для задетых взрывом
    pub effect: Option<StatusEffectSpec>,
}

impl Default for GrenadeSettings {
    fn default() -> Self {
        Self {
            fuse_time: 5.0,
            inner_radius: 200.0,
            outer_radius: 500.0,
            max_damage: 40.0,
            min_damage_factor: 0.2,
            falloff_exponent: 5.0,
            explosion_fx: Some("fx/grenade_explosion".into()),
            explosion_sound: Some("sfx/grenade_explosion".into()),
            debug_explode: false,
            effect: Some(StatusEffectSpec::burning()),
        }
    }
}

impl GrenadeSettings {
    pub fn min_damage(&self) -> f32 {
        self.max_damage * self.min_damage_factor
    }
}

/// Урон взрыва на дистанции `distance` от центра
///
/// - `distance ≤ inner` → max_damage
/// - `inner < distance ≤ outer` → lerp(min, max, ((outer - d) / (outer - inner))^falloff)
/// - дальше outer → `None` (не задет)
pub fn radial_damage_at(settings: &GrenadeSettings, distance: f32) -> Option<f32> {
    if distance <= settings.inner_radius {
        return Some(settings.max_damage);
    }
    if distance > settings.outer_radius || settings.outer_radius <= settings.inner_radius {
        return None;
    }

    let span = settings.outer_radius - settings.inner_radius;
    let scale = ((settings.outer_radius - distance) / span)
        .clamp(0.0, 1.0)
        .powf(settings.falloff_exponent);
    let min = settings.min_damage();

    Some(min + (settings.max_damage - min) * scale)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrenadePhase {
    #[default]
    Inert,
    Armed,
    Detonated,
}

/// Grenade projectile component (одноразовая entity)
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Grenade {
    pub phase: GrenadePhase,
    pub elapsed: f32,
    pub settings: GrenadeSettings,
    /// Кто бросил (для DamageRequest.cause)
    pub instigator: Option<Entity>,
}

impl Grenade {
    pub fn new(settings: GrenadeSettings, instigator: Option<Entity>) -> Self {
        Self {
            phase: GrenadePhase::Inert,
            elapsed: 0.0,
            settings,
            instigator,
        }
    }

    /// Inert → Armed. Повторный удар ничего не меняет.
    pub fn arm(&mut self) -> bool {
        if self.phase != GrenadePhase::Inert {
            return false;
        }
        self.phase = GrenadePhase::Armed;
        self.elapsed = 0.0;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.phase == GrenadePhase::Armed
    }

    /// Тик таймера. `true` ровно один раз — в tick детонации.
    ///
    /// Разоружение происходит до возврата, так что повторный tick — no-op.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase != GrenadePhase::Armed {
            return false;
        }

        self.elapsed += dt;
        if self.elapsed > self.settings.fuse_time {
            self.phase = GrenadePhase::Detonated;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grenade_with_fuse(fuse_time: f32) -> Grenade {
        Grenade::new(
            GrenadeSettings {
                fuse_time,
                ..Default::default()
            },
            None,
        )
    }

    #[test]
    fn test_detonates_on_fourth_tick_exactly_once() {
        let mut grenade = grenade_with_fuse(3.0);
        assert!(grenade.arm());

        let detonations: Vec<bool> = (0..6).map(|_| grenade.tick(1.0)).collect();

        // elapsed: 1, 2, 3 (не > 3), 4 → взрыв
        assert_eq!(detonations, vec![false, false, false, true, false, false]);
        assert_eq!(grenade.phase, GrenadePhase::Detonated);
        assert!(!grenade.is_armed());
        assert_eq!(grenade.elapsed, 4.0);
    }

    #[test]
    fn test_inert_grenade_never_detonates() {
        let mut grenade = grenade_with_fuse(0.5);
        for _ in 0..10 {
            assert!(!grenade.tick(1.0));
        }
        assert_eq!(grenade.elapsed, 0.0);
    }

    #[test]
    fn test_arm_only_from_inert() {
        let mut grenade = grenade_with_fuse(1.0);
        assert!(grenade.arm());
        grenade.tick(0.5);

        // Второй удар не сбрасывает таймер
        assert!(!grenade.arm());
        assert_eq!(grenade.elapsed, 0.5);
    }

    #[test]
    fn test_radial_falloff() {
        let settings = GrenadeSettings::default(); // inner 200, outer 500, max 40, min 8, exp 5

        assert_eq!(radial_damage_at(&settings, 0.0), Some(40.0));
        assert_eq!(radial_damage_at(&settings, 200.0), Some(40.0));

        // Середина: ratio 0.5 → 0.5^5 = 0.03125 → 8 + 32 × 0.03125 = 9
        let mid = radial_damage_at(&settings, 350.0).unwrap();
        assert!((mid - 9.0).abs() < 1e-4, "mid = {}", mid);

        let edge = radial_damage_at(&settings, 500.0).unwrap();
        assert!((edge - 8.0).abs() < 1e-4, "edge = {}", edge);

        assert_eq!(radial_damage_at(&settings, 500.5), None);
    }

    #[test]
    fn test_damage_monotonic_with_distance() {
        let settings = GrenadeSettings::default();
        let mut previous = f32::MAX;
        for step in 0..=50 {
            let distance = step as f32 * 10.0;
            let damage = radial_damage_at(&settings, distance).unwrap();
            assert!(damage <= previous, "damage grew at {}", distance);
            previous = damage;
        }
    }
}

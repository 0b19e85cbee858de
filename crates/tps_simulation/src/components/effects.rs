//! Status effects: горение, неуязвимость и т.п.
//!
//! Эффект применяется только к поверхностям из `possible_surfaces`.
//! Non-stackable эффект с тем же именем повторно не добавляется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип поверхности персонажа (физ. материал)
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum SurfaceType {
    #[default]
    Flesh,
    Metal,
    Concrete,
    Energy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Урон во времени (damage over time)
    Burning { damage_per_second: f32 },
    /// Весь входящий урон игнорируется
    Invulnerable,
}

/// Описание эффекта (data-driven, хранится в GrenadeSettings / AbilityEffect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectSpec {
    pub name: String,
    pub kind: EffectKind,
    /// Длительность (секунды)
    pub duration: f32,
    /// Поверхности, на которые эффект может лечь
    pub possible_surfaces: Vec<SurfaceType>,
    pub stackable: bool,
}

impl StatusEffectSpec {
    /// Горение: 5 dps, 3 секунды, только живая плоть
    pub fn burning() -> Self {
        Self {
            name: "Burning".into(),
            kind: EffectKind::Burning {
                damage_per_second: 5.0,
            },
            duration: 3.0,
            possible_surfaces: vec![SurfaceType::Flesh],
            stackable: false,
        }
    }

    /// Неуязвимость на 5 секунд (любая поверхность)
    pub fn invulnerable() -> Self {
        Self {
            name: "Invulnerable".into(),
            kind: EffectKind::Invulnerable,
            duration: 5.0,
            possible_surfaces: vec![
                SurfaceType::Flesh,
                SurfaceType::Metal,
                SurfaceType::Concrete,
                SurfaceType::Energy,
            ],
            stackable: false,
        }
    }

    pub fn applies_to(&self, surface: SurfaceType) -> bool {
        self.possible_surfaces.contains(&surface)
    }
}

/// Активный эффект на персонаже
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub spec: StatusEffectSpec,
    pub remaining: f32,
}

/// Результат одного тика эффектов
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTick {
    pub damage: f32,
    pub expired: Vec<String>,
}

/// Список активных эффектов (UI читает напрямую)
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    /// Добавить эффект. `false` если non-stackable эффект уже висит.
    pub fn add(&mut self, spec: StatusEffectSpec) -> bool {
        if !spec.stackable && self.contains(&spec.name) {
            return false;
        }

        self.effects.push(ActiveEffect {
            remaining: spec.duration,
            spec,
        });
        true
    }

    /// Удалить все эффекты с этим именем
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.spec.name != name);
        self.effects.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.iter().any(|effect| effect.spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect.spec.kind, EffectKind::Invulnerable))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Продвинуть таймеры, собрать DOT урон, удалить истёкшие
    pub fn tick(&mut self, dt: f32) -> EffectTick {
        let mut result = EffectTick::default();

        for effect in &mut self.effects {
            let active = effect.remaining.min(dt).max(0.0);
            if let EffectKind::Burning { damage_per_second } = effect.spec.kind {
                result.damage += damage_per_second * active;
            }
            effect.remaining -= dt;
        }

        self.effects.retain(|effect| {
            if effect.remaining <= 0.0 {
                result.expired.push(effect.spec.name.clone());
                false
            } else {
                true
            }
        });

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_stackable_effect_added_once() {
        let mut effects = ActiveEffects::default();

        assert!(effects.add(StatusEffectSpec::burning()));
        assert!(!effects.add(StatusEffectSpec::burning()));
        assert_eq!(effects.len(), 1);

        let mut stackable = StatusEffectSpec::burning();
        stackable.stackable = true;
        assert!(effects.add(stackable));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_burning_deals_damage_until_expired() {
        let mut effects = ActiveEffects::default();
        effects.add(StatusEffectSpec::burning()); // 5 dps × 3s

        let mut total = 0.0;
        let mut expired = Vec::new();
        for _ in 0..4 {
            let tick = effects.tick(1.0);
            total += tick.damage;
            expired.extend(tick.expired);
        }

        assert!((total - 15.0).abs() < 1e-4, "total = {}", total);
        assert_eq!(expired, vec!["Burning".to_string()]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_remove_and_query() {
        let mut effects = ActiveEffects::default();
        effects.add(StatusEffectSpec::invulnerable());

        assert!(effects.is_invulnerable());
        assert!(effects.remove("Invulnerable"));
        assert!(!effects.is_invulnerable());
        assert!(!effects.remove("Invulnerable"));
    }

    #[test]
    fn test_surface_filter() {
        let burning = StatusEffectSpec::burning();
        assert!(burning.applies_to(SurfaceType::Flesh));
        assert!(!burning.applies_to(SurfaceType::Metal));
    }
}

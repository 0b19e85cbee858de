//! Базовые компоненты персонажа: Character, Health, Shield, ControlState

use bevy::prelude::*;

use crate::combat::{ActiveWeapon, Stamina};
use crate::components::{
    ActiveEffects, AimCursor, CharacterSpeed, MaxWalkSpeed, MoveInput, MovementIntents,
    MovementMode, SpeedTable, SurfaceType,
};
use crate::equipment::InventoryLedger;

/// Персонаж (игрок или бот) — корень композиции
///
/// Все боевые компоненты добавляются через Required Components.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Health,
    Shield,
    Stamina,
    MovementIntents,
    MoveInput,
    MovementMode,
    SpeedTable,
    MaxWalkSpeed,
    CharacterSpeed,
    AimCursor,
    ActiveWeapon,
    InventoryLedger,
    ActiveEffects,
    ControlState,
    SurfaceType,
    DeathAnimations,
    Transform
)]
pub struct Character;

/// Здоровье персонажа
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Применить урон, вернуть фактически снятое здоровье
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;
        applied
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}

/// Щит: поглощает урон первым, восстанавливается после паузы
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Shield {
    pub current: f32,
    pub max: f32,
    /// Восстановление (единиц/сек)
    pub recharge_rate: f32,
    /// Пауза после получения урона (секунды)
    pub recharge_delay: f32,
    pub recharge_timer: f32,
}

impl Default for Shield {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Shield {
    pub fn new(max: f32, recharge_rate: f32, recharge_delay: f32) -> Self {
        Self {
            current: max,
            max,
            recharge_rate,
            recharge_delay,
            recharge_timer: 0.0,
        }
    }

    /// Поглотить урон. Возвращает остаток, который проходит в Health.
    pub fn absorb(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }

        if self.max > 0.0 {
            self.recharge_timer = self.recharge_delay;
        }

        let absorbed = amount.min(self.current);
        self.current -= absorbed;
        amount - absorbed
    }

    pub fn tick(&mut self, dt: f32) {
        if self.recharge_timer > 0.0 {
            self.recharge_timer = (self.recharge_timer - dt).max(0.0);
            return;
        }

        if self.current < self.max {
            self.current = (self.current + self.recharge_rate * dt).min(self.max);
        }
    }
}

/// Управляемость персонажа (input, курсор, ragdoll)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub has_control: bool,
    pub cursor_visible: bool,
    pub ragdoll: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            has_control: true,
            cursor_visible: true,
            ragdoll: false,
        }
    }
}

/// Компонент-маркер: персонаж мёртв
///
/// Трупы не деспавнятся — ragdoll остаётся в мире.
#[derive(Component, Debug)]
pub struct Dead;

#[derive(Debug, Clone, PartialEq)]
pub struct DeathClip {
    pub name: String,
    /// Длительность анимации (секунды) = задержка перед ragdoll
    pub duration: f32,
}

impl DeathClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Набор death анимаций (выбирается случайно, равновероятно)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct DeathAnimations {
    pub clips: Vec<DeathClip>,
}

impl Default for DeathAnimations {
    fn default() -> Self {
        Self {
            clips: vec![
                DeathClip::new("Death_Forward", 1.6),
                DeathClip::new("Death_Backward", 1.9),
                DeathClip::new("Death_Spin", 2.3),
            ],
        }
    }
}

impl DeathAnimations {
    /// Без анимаций ragdoll включается сразу
    pub fn none() -> Self {
        Self { clips: Vec::new() }
    }
}

/// Способность персонажа (применяет эффект к себе)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AbilityEffect(pub crate::components::StatusEffectSpec);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamped() {
        let mut health = Health::new(100.0);

        assert_eq!(health.take_damage(30.0), 30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        assert_eq!(health.take_damage(500.0), 70.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());

        // Отрицательный урон не лечит
        assert_eq!(health.take_damage(-10.0), 0.0);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_shield_absorbs_then_overflows() {
        let mut shield = Shield::new(50.0, 10.0, 2.0);

        assert_eq!(shield.absorb(30.0), 0.0);
        assert_eq!(shield.current, 20.0);

        assert_eq!(shield.absorb(30.0), 10.0);
        assert_eq!(shield.current, 0.0);
        assert_eq!(shield.recharge_timer, 2.0);
    }

    #[test]
    fn test_shield_recharges_after_delay() {
        let mut shield = Shield::new(50.0, 10.0, 2.0);
        shield.absorb(50.0);

        shield.tick(1.0);
        shield.tick(1.0);
        assert_eq!(shield.current, 0.0); // Delay ещё идёт

        shield.tick(1.0);
        assert_eq!(shield.current, 10.0);

        for _ in 0..10 {
            shield.tick(1.0);
        }
        assert_eq!(shield.current, 50.0);
    }

    #[test]
    fn test_no_shield_passes_everything() {
        let mut shield = Shield::default();
        assert_eq!(shield.absorb(25.0), 25.0);
    }
}

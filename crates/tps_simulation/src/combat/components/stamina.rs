//! Stamina regulator: спринт тратит, всё остальное восстанавливает.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Настройки stamina (resource)
///
/// Dead band между `recover_threshold` и `drain_threshold` гасит дребезг
/// ровно на границе sprint скорости.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    /// Изменение за один tick (не масштабируется dt)
    pub rate: f32,
    /// Скорость ≥ порога → расход
    pub drain_threshold: f32,
    /// Скорость ≤ порога → восстановление
    pub recover_threshold: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            rate: 0.005,
            drain_threshold: 790.0,
            recover_threshold: 789.0,
        }
    }
}

/// Stamina спринта
///
/// Инвариант: 0.0 ≤ value ≤ 1.0
/// Hysteresis: блокировка включается при value == 0, снимается только при value == 1.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub value: f32,
    pub sprint_blocked: bool,
}

impl Default for Stamina {
    fn default() -> Self {
        Self {
            value: 1.0,
            sprint_blocked: false,
        }
    }
}

impl Stamina {
    /// Один шаг регулятора по наблюдаемой скорости персонажа
    pub fn tick(&mut self, current_speed: f32, config: &StaminaConfig) -> Stamina {
        if current_speed >= config.drain_threshold && self.value > 0.0 && !self.sprint_blocked {
            self.value -= config.rate;
        } else if current_speed <= config.recover_threshold && self.value < 1.0 {
            self.value += config.rate;
        }

        self.value = self.value.clamp(0.0, 1.0);

        if self.value <= 0.0 {
            self.sprint_blocked = true;
        } else if self.value >= 1.0 {
            self.sprint_blocked = false;
        }

        *self
    }

    pub fn is_full(&self) -> bool {
        self.value >= 1.0
    }
}

//! Movement компоненты: intents, режим движения, скорость, курсор прицела

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Три независимых intent-флага движения (выставляются input слоем)
///
/// Режим движения выводится из них каждый tick — флаги не взаимоисключающие.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntents {
    pub sprint: bool,
    pub walk: bool,
    pub aim: bool,
}

impl MovementIntents {
    pub fn new(sprint: bool, walk: bool, aim: bool) -> Self {
        Self { sprint, walk, aim }
    }
}

/// Input осей движения (X = вперёд/назад, Y = вправо/влево, каждая в [-1, 1])
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub axis: Vec2,
    /// Разрешён ли sprint в текущем направлении (пересчитывается каждый tick)
    pub sprint_allowed: bool,
}

/// Режим движения (ровно один активен в каждый момент)
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum MovementMode {
    Aim,
    AimWalk,
    Walk,
    #[default]
    Run,
    Sprint,
}

impl MovementMode {
    pub const ALL: [MovementMode; 5] = [
        MovementMode::Aim,
        MovementMode::AimWalk,
        MovementMode::Walk,
        MovementMode::Run,
        MovementMode::Sprint,
    ];

    /// Уменьшать ли разброс оружия в этом режиме
    pub fn reduces_dispersion(&self) -> bool {
        matches!(self, MovementMode::Aim | MovementMode::AimWalk)
    }
}

/// Скорости по режимам (designer-tunable)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub aim_speed_normal: f32,
    pub walk_speed_normal: f32,
    pub run_speed_normal: f32,
    pub aim_speed_walk: f32,
    pub run_speed_sprint: f32,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            aim_speed_normal: 300.0,
            walk_speed_normal: 200.0,
            run_speed_normal: 600.0,
            aim_speed_walk: 100.0,
            run_speed_sprint: 800.0,
        }
    }
}

impl SpeedTable {
    pub fn speed_for(&self, mode: MovementMode) -> f32 {
        match mode {
            MovementMode::Aim => self.aim_speed_normal,
            MovementMode::AimWalk => self.aim_speed_walk,
            MovementMode::Walk => self.walk_speed_normal,
            MovementMode::Run => self.run_speed_normal,
            MovementMode::Sprint => self.run_speed_sprint,
        }
    }
}

/// Текущая максимальная скорость (units/sec), выставляется при смене режима
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MaxWalkSpeed(pub f32);

impl Default for MaxWalkSpeed {
    fn default() -> Self {
        Self(SpeedTable::default().run_speed_normal)
    }
}

/// Наблюдаемая скорость за последний tick (для stamina и анимаций)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterSpeed(pub f32);

/// Точка под курсором (результат screen → world raycast движка)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AimCursor {
    pub hit_point: Vec3,
    /// Yaw персонажа на курсор (градусы, 0 = +X, 90 = +Z)
    pub yaw: f32,
}

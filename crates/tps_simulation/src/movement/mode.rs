//! Вывод режима движения и разрешение спринта
//!
//! Всё здесь — чистые функции без ECS, системы (movement::systems) только
//! раскладывают результат по компонентам.

use bevy::prelude::*;

use crate::components::{MovementIntents, MovementMode};

/// Режим движения из трёх intent-флагов
///
/// Приоритет: Sprint > (Walk & Aim → AimWalk) > Walk > Aim > Run.
pub fn recompute(intents: MovementIntents) -> MovementMode {
    match (intents.sprint, intents.walk, intents.aim) {
        (true, _, _) => MovementMode::Sprint,
        (false, true, true) => MovementMode::AimWalk,
        (false, true, false) => MovementMode::Walk,
        (false, false, true) => MovementMode::Aim,
        (false, false, false) => MovementMode::Run,
    }
}

/// Yaw (градусы) из точки `from` на точку `to` в горизонтальной плоскости XZ
pub fn look_at_yaw(from: Vec3, to: Vec3) -> f32 {
    let delta = to - from;
    delta.z.atan2(delta.x).to_degrees()
}

/// Октант взгляда: yaw → направление осей (x, y) с шагом 45°
///
/// Границы: ±22.5 / 67.5 / 112.5 / 157.5. Yaw ожидается в [-180, 180].
pub fn facing_octant(yaw: f32) -> IVec2 {
    if (-22.5..=22.5).contains(&yaw) {
        IVec2::new(1, 0)
    } else if yaw > 22.5 && yaw <= 67.5 {
        IVec2::new(1, 1)
    } else if yaw > 67.5 && yaw <= 112.5 {
        IVec2::new(0, 1)
    } else if yaw > 112.5 && yaw <= 157.5 {
        IVec2::new(-1, 1)
    } else if yaw > 157.5 || yaw <= -157.5 {
        IVec2::new(-1, 0)
    } else if yaw > -157.5 && yaw <= -112.5 {
        IVec2::new(-1, -1)
    } else if yaw > -112.5 && yaw <= -67.5 {
        IVec2::new(0, -1)
    } else {
        IVec2::new(1, -1)
    }
}

/// Sprint разрешён только "лицом вперёд": оси input (усечённые к нулю) совпадают с октантом
pub fn sprint_allowed(axis: Vec2, yaw: f32) -> bool {
    let input = IVec2::new(axis.x as i32, axis.y as i32);
    input == facing_octant(yaw)
}

//! Movement events

use bevy::prelude::*;

use crate::components::MovementMode;

/// Event: режим движения сменился
///
/// Генерируется `update_movement_state` только при реальной смене режима.
/// Используется анимациями (blend space) и UI.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MovementModeChanged {
    pub entity: Entity,
    pub previous: MovementMode,
    pub mode: MovementMode,
    pub max_speed: f32,
}

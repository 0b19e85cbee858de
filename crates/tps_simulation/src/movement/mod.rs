//! Movement domain — режим движения, sprint gating, кинематика
//!
//! Содержит:
//! - `recompute` (intents → MovementMode, чистая функция)
//! - facing octant / sprint allowance
//! - системы movement фазы
//! - MovementModeChanged (event для анимаций/UI)

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod events;
pub mod mode;
pub mod systems;

pub use events::*;
pub use mode::*;
pub use systems::*;

/// Movement plugin
///
/// Все системы в `CombatSet::Movement` — до stamina и оружия, так что смена режима
/// и её эффекты на оружие атомарны в пределах одного tick.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MovementModeChanged>().add_systems(
            FixedUpdate,
            (
                face_cursor,
                update_movement_state,
                apply_movement_input,
                update_shoot_targets,
            )
                .chain()
                .in_set(CombatSet::Movement),
        );
    }
}

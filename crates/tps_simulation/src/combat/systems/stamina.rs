//! Stamina systems.

use bevy::prelude::*;

use crate::combat::{Stamina, StaminaConfig};
use crate::components::{CharacterSpeed, Dead};
use crate::log;

/// Система: регулятор stamina по наблюдаемой скорости
///
/// Работает в FixedUpdate после movement фазы: шаг фиксированный на tick,
/// скорость берётся из `CharacterSpeed` текущего tick.
pub fn tick_stamina(
    config: Res<StaminaConfig>,
    mut query: Query<(Entity, &mut Stamina, &CharacterSpeed), Without<Dead>>,
) {
    for (entity, mut stamina, speed) in query.iter_mut() {
        let was_blocked = stamina.sprint_blocked;
        let next = stamina.tick(speed.0, &config);

        if next.sprint_blocked != was_blocked {
            log(&format!(
                "{:?}: sprint {} (stamina {:.3})",
                entity,
                if next.sprint_blocked { "blocked" } else { "unblocked" },
                next.value
            ));
        }
    }
}

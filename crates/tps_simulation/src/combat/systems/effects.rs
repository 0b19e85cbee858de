//! Status effect systems: DOT тики, истечение, способности.

use bevy::prelude::*;

use crate::combat::{DamageCause, DamageRequest, StatusEffectApplied, UseAbilityIntent};
use crate::components::{AbilityEffect, ActiveEffects, ControlState, Dead, SurfaceType};
use crate::log;

/// Система: тик эффектов
///
/// Горение превращается в DamageRequest (cause = Effect), поэтому проходит через
/// те же правила (щит, неуязвимость, смерть).
pub fn tick_status_effects(
    time: Res<Time<Fixed>>,
    mut characters: Query<(Entity, &mut ActiveEffects), Without<Dead>>,
    mut damage_events: EventWriter<DamageRequest>,
) {
    let dt = time.delta_secs();

    for (entity, mut effects) in characters.iter_mut() {
        if effects.is_empty() {
            continue;
        }

        let tick = effects.tick(dt);

        if tick.damage > 0.0 {
            damage_events.write(DamageRequest {
                target: entity,
                amount: tick.damage,
                cause: DamageCause::Effect,
            });
        }

        for name in tick.expired {
            log(&format!("{:?}: effect {} expired", entity, name));
        }
    }
}

/// Система: активация способности (эффект на себя)
pub fn process_ability_intents(
    mut intents: EventReader<UseAbilityIntent>,
    mut characters: Query<
        (
            Option<&AbilityEffect>,
            &mut ActiveEffects,
            &SurfaceType,
            &ControlState,
        ),
        Without<Dead>,
    >,
    mut applied_events: EventWriter<StatusEffectApplied>,
) {
    for intent in intents.read() {
        let Ok((ability, mut effects, surface, control)) = characters.get_mut(intent.entity)
        else {
            continue;
        };

        let Some(AbilityEffect(spec)) = ability else {
            log(&format!("{:?}: no ability equipped", intent.entity));
            continue;
        };

        if !control.has_control || !spec.applies_to(*surface) {
            continue;
        }

        if effects.add(spec.clone()) {
            applied_events.write(StatusEffectApplied {
                target: intent.entity,
                effect: spec.name.clone(),
            });
            log(&format!("✨ {:?}: ability {} activated", intent.entity, spec.name));
        }
    }
}

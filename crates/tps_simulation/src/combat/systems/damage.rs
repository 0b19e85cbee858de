//! Damage & death systems
//!
//! Урон: Shield → Health. Мёртвые не получают урон и не умирают повторно.
//! Radial урон дополнительно вешает status effect (если поверхность подходит).
//!
//! Смерть:
//! - случайная death анимация (равновероятно, DeterministicRng)
//! - ragdoll по таймеру после анимации (или сразу, если анимаций нет)
//! - управление и курсор отключаются, оружие перестаёт стрелять/перезаряжаться

use bevy::prelude::*;
use rand::Rng;

use crate::combat::systems::weapon::{abort_reload, ReloadNotifications};
use crate::combat::{
    ActiveWeapon, CharacterDied, DamageCause, DamageDealt, DamageRequest, DeathSequenceStarted,
    RagdollEnabled, StatusEffectApplied,
};
use crate::components::{
    ActiveEffects, ControlState, Dead, DeathAnimations, Health, Shield, SurfaceType,
};
use crate::hooks::CombatHookSet;
use crate::scheduler::{RagdollTimerElapsed, ScheduledTask, TaskScheduler};
use crate::{log, log_info, DeterministicRng};

/// Система: применение DamageRequest
///
/// 1. Мёртвая цель / Invulnerable → запрос игнорируется
/// 2. Shield поглощает, остаток → Health
/// 3. Radial: status effect по SurfaceType
/// 4. DamageDealt + CharacterDied (только на переходе alive → dead)
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(
        &mut Health,
        &mut Shield,
        &mut ActiveEffects,
        &SurfaceType,
        Has<Dead>,
    )>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<CharacterDied>,
    mut effect_events: EventWriter<StatusEffectApplied>,
) {
    for request in requests.read() {
        let Ok((mut health, mut shield, mut effects, surface, is_dead)) =
            targets.get_mut(request.target)
        else {
            log(&format!(
                "DamageRequest: target {:?} has no Health",
                request.target
            ));
            continue;
        };

        if is_dead || !health.is_alive() {
            continue;
        }

        if effects.is_invulnerable() {
            log(&format!("🛡️ {:?} is invulnerable, damage ignored", request.target));
            continue;
        }

        let instigator = match &request.cause {
            DamageCause::Direct { instigator } | DamageCause::Radial { instigator, .. } => {
                *instigator
            }
            DamageCause::Effect => None,
        };

        let before_shield = shield.current;
        let overflow = shield.absorb(request.amount);
        let health_damage = health.take_damage(overflow);
        let target_died = !health.is_alive();

        if let DamageCause::Radial {
            effect: Some(spec), ..
        } = &request.cause
        {
            if !target_died && spec.applies_to(*surface) && effects.add(spec.clone()) {
                effect_events.write(StatusEffectApplied {
                    target: request.target,
                    effect: spec.name.clone(),
                });
            }
        }

        dealt_events.write(DamageDealt {
            target: request.target,
            instigator,
            shield_damage: before_shield - shield.current,
            health_damage,
            target_died,
        });

        if target_died {
            died_events.write(CharacterDied {
                entity: request.target,
                killer: instigator,
            });
            log_info(&format!(
                "⚰️ {:?} killed by {:?}",
                request.target, instigator
            ));
        }
    }
}

/// Система: death sequence
pub fn handle_character_death(
    mut commands: Commands,
    mut deaths: EventReader<CharacterDied>,
    mut rng: ResMut<DeterministicRng>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<(
        &mut ControlState,
        &mut ActiveWeapon,
        &DeathAnimations,
        Option<&mut CombatHookSet>,
    )>,
    mut sequence_events: EventWriter<DeathSequenceStarted>,
    mut ragdoll_events: EventWriter<RagdollEnabled>,
    mut notifications: ReloadNotifications,
) {
    for death in deaths.read() {
        let Ok((mut control, mut active, animations, mut hooks)) =
            characters.get_mut(death.entity)
        else {
            continue;
        };

        // Оружие замолкает: fire intent сброшен, reload прерван
        if let Some(weapon) = active.weapon_mut() {
            weapon.set_firing(false);
            abort_reload(
                death.entity,
                weapon,
                hooks.as_deref_mut(),
                &mut scheduler,
                &mut notifications,
            );
        }

        control.has_control = false;
        control.cursor_visible = false;

        let clip = if animations.clips.is_empty() {
            None
        } else {
            let index = rng.rng.gen_range(0..animations.clips.len());
            animations.clips.get(index)
        };

        let ragdoll_delay = match clip {
            Some(clip) => {
                scheduler.schedule(
                    clip.duration,
                    ScheduledTask::EnableRagdoll {
                        entity: death.entity,
                    },
                );
                clip.duration
            }
            None => {
                control.ragdoll = true;
                ragdoll_events.write(RagdollEnabled {
                    entity: death.entity,
                });
                0.0
            }
        };

        sequence_events.write(DeathSequenceStarted {
            entity: death.entity,
            clip: clip.map(|clip| clip.name.clone()),
            ragdoll_delay,
        });

        if let Some(hooks) = hooks.as_deref_mut() {
            hooks.death(death.entity);
        }

        if let Ok(mut entity_commands) = commands.get_entity(death.entity) {
            entity_commands.insert(Dead);
        }

        log_info(&format!(
            "💀 {:?} death sequence: {:?}, ragdoll in {}s",
            death.entity,
            clip.map(|clip| clip.name.as_str()),
            ragdoll_delay
        ));
    }
}

/// Система: включение ragdoll по таймеру
pub fn enable_ragdolls(
    mut timers: EventReader<RagdollTimerElapsed>,
    mut characters: Query<&mut ControlState>,
    mut ragdoll_events: EventWriter<RagdollEnabled>,
) {
    for timer in timers.read() {
        let Ok(mut control) = characters.get_mut(timer.entity) else {
            continue;
        };

        if !control.ragdoll {
            control.ragdoll = true;
            ragdoll_events.write(RagdollEnabled {
                entity: timer.entity,
            });
            log(&format!("🪆 {:?} ragdoll enabled", timer.entity));
        }
    }
}

/// Система: восстановление щитов
pub fn recharge_shields(time: Res<Time<Fixed>>, mut shields: Query<&mut Shield, Without<Dead>>) {
    let dt = time.delta_secs();

    for mut shield in shields.iter_mut() {
        if shield.current < shield.max || shield.recharge_timer > 0.0 {
            shield.tick(dt);
        }
    }
}

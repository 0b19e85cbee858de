//! Movement systems (FixedUpdate, CombatSet::Movement)
//!
//! Порядок (chain):
//! 1. `face_cursor` — поворот на курсор + разрешение sprint по октанту
//! 2. `update_movement_state` — режим движения → max speed + уведомление оружия
//! 3. `apply_movement_input` — кинематическое перемещение, наблюдаемая скорость
//! 4. `update_shoot_targets` — точка выстрела (после смены режима в этом же tick)

use bevy::prelude::*;

use crate::combat::{ActiveWeapon, Stamina};
use crate::components::{
    AimCursor, CharacterSpeed, ControlState, Dead, MaxWalkSpeed, MoveInput, MovementIntents,
    MovementMode, SpeedTable,
};
use crate::logger;
use crate::movement::{look_at_yaw, recompute, sprint_allowed, MovementModeChanged};

/// Система: поворот персонажа на точку курсора
pub fn face_cursor(
    mut characters: Query<
        (&mut Transform, &mut AimCursor, &mut MoveInput, &ControlState),
        Without<Dead>,
    >,
) {
    for (mut transform, mut cursor, mut input, control) in characters.iter_mut() {
        if !control.has_control {
            input.sprint_allowed = false;
            continue;
        }

        let yaw = look_at_yaw(transform.translation, cursor.hit_point);
        cursor.yaw = yaw;
        transform.rotation = Quat::from_rotation_y(-yaw.to_radians());
        input.sprint_allowed = sprint_allowed(input.axis, yaw);
    }
}

/// Система: пересчёт режима движения
///
/// Effective sprint = запрошен ∧ разрешён направлением ∧ stamina не заблокирована.
/// Выбранный Sprint сбрасывает удерживаемые Walk/Aim.
pub fn update_movement_state(
    mut characters: Query<
        (
            Entity,
            &mut MovementIntents,
            &MoveInput,
            &Stamina,
            &SpeedTable,
            &mut MovementMode,
            &mut MaxWalkSpeed,
            &mut ActiveWeapon,
        ),
        Without<Dead>,
    >,
    mut mode_events: EventWriter<MovementModeChanged>,
) {
    for (entity, mut intents, input, stamina, speeds, mut mode, mut max_speed, mut active) in
        characters.iter_mut()
    {
        let effective = MovementIntents {
            sprint: intents.sprint && input.sprint_allowed && !stamina.sprint_blocked,
            ..*intents
        };
        let next = recompute(effective);

        if next == MovementMode::Sprint && (intents.walk || intents.aim) {
            intents.walk = false;
            intents.aim = false;
        }

        let speed = speeds.speed_for(next);
        max_speed.set_if_neq(MaxWalkSpeed(speed));

        let previous = *mode;
        let weapon_stale = active
            .weapon()
            .is_some_and(|weapon| weapon.state.mode != next);
        if previous != next || weapon_stale {
            if let Some(weapon) = active.weapon_mut() {
                weapon.set_dispersion_reduction(next.reduces_dispersion());
                weapon.update_state(next);
            }
        }

        if previous != next {
            *mode = next;
            mode_events.write(MovementModeChanged {
                entity,
                previous,
                mode: next,
                max_speed: speed,
            });
            logger::log(&format!(
                "🏃 {:?}: movement {:?} → {:?} (max speed {})",
                entity, previous, next, speed
            ));
        }
    }
}

/// Система: кинематическое перемещение по input осям
///
/// Заменяет movement component движка: скорость = оси × MaxWalkSpeed.
/// Мёртвые и лишённые управления стоят на месте.
pub fn apply_movement_input(
    time: Res<Time<Fixed>>,
    mut characters: Query<(
        &mut Transform,
        &MoveInput,
        &MaxWalkSpeed,
        &mut CharacterSpeed,
        &ControlState,
        Has<Dead>,
    )>,
) {
    let dt = time.delta_secs();

    for (mut transform, input, max_speed, mut speed, control, is_dead) in characters.iter_mut() {
        if is_dead || !control.has_control {
            speed.set_if_neq(CharacterSpeed(0.0));
            continue;
        }

        let direction = Vec3::new(input.axis.x, 0.0, input.axis.y).clamp_length_max(1.0);
        let velocity = direction * max_speed.0;

        transform.translation += velocity * dt;
        speed.set_if_neq(CharacterSpeed(velocity.length()));
    }
}

/// Система: точка выстрела активного оружия
pub fn update_shoot_targets(mut characters: Query<(&AimCursor, &mut ActiveWeapon), Without<Dead>>) {
    for (cursor, mut active) in characters.iter_mut() {
        if let Some(weapon) = active.weapon_mut() {
            weapon.update_shoot_target(cursor.hit_point);
        }
    }
}

//! Grenade systems: spawn из гранатомёта, взведение, таймер, взрыв.
//!
//! Детонация (строго по порядку):
//! 1. debug сферы (если `debug_explode`)
//! 2. FX/звук (пропускается без ассета)
//! 3. radial damage с falloff → DamageRequest на каждого в outer radius
//! 4. overlap query (информационно, в GrenadeDetonated)
//! 5. despawn

use bevy::prelude::*;

use crate::combat::{
    radial_damage_at, DamageCause, DamageRequest, ExplosionEffectRequested, Grenade,
    GrenadeDetonated, GrenadeImpact, WeaponFired,
};
use crate::components::Character;
use crate::equipment::ProjectileKind;
use crate::{log, log_info};

/// Система: выстрел гранатомёта → inert граната у стрелка
pub fn spawn_fired_grenades(mut commands: Commands, mut fired: EventReader<WeaponFired>) {
    for shot in fired.read() {
        let ProjectileKind::Grenade(settings) = &shot.projectile else {
            continue;
        };

        let grenade = commands
            .spawn((
                Grenade::new(settings.clone(), Some(shot.owner)),
                Transform::from_translation(shot.origin),
            ))
            .id();

        log(&format!(
            "💣 {:?} launched grenade {:?} towards {:?}",
            shot.owner, grenade, shot.target
        ));
    }
}

/// Система: удар о поверхность → взвести
pub fn arm_grenades(mut impacts: EventReader<GrenadeImpact>, mut grenades: Query<&mut Grenade>) {
    for impact in impacts.read() {
        let Ok(mut grenade) = grenades.get_mut(impact.grenade) else {
            continue;
        };

        if grenade.arm() {
            log(&format!(
                "⏱️ Grenade {:?} armed (fuse {}s)",
                impact.grenade, grenade.settings.fuse_time
            ));
        }
    }
}

/// Система: таймер гранат и взрыв
pub fn tick_grenades(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut grenades: Query<(Entity, &mut Grenade, &Transform)>,
    characters: Query<(Entity, &Transform), With<Character>>,
    mut damage_events: EventWriter<DamageRequest>,
    mut effect_events: EventWriter<ExplosionEffectRequested>,
    mut detonated_events: EventWriter<GrenadeDetonated>,
) {
    let dt = time.delta_secs();

    for (entity, mut grenade, transform) in grenades.iter_mut() {
        // tick() разоружает гранату до возврата true
        if !grenade.tick(dt) {
            continue;
        }

        let position = transform.translation;
        let settings = &grenade.settings;

        if settings.debug_explode {
            log(&format!(
                "🔴 Grenade {:?} debug: inner sphere r={} / outer sphere r={} at {:?}",
                entity, settings.inner_radius, settings.outer_radius, position
            ));
        }

        if settings.explosion_fx.is_some() || settings.explosion_sound.is_some() {
            effect_events.write(ExplosionEffectRequested {
                position,
                fx: settings.explosion_fx.clone(),
                sound: settings.explosion_sound.clone(),
            });
        }

        for (target, target_transform) in characters.iter() {
            let distance = target_transform.translation.distance(position);
            if let Some(amount) = radial_damage_at(settings, distance) {
                damage_events.write(DamageRequest {
                    target,
                    amount,
                    cause: DamageCause::Radial {
                        instigator: grenade.instigator,
                        effect: settings.effect.clone(),
                    },
                });
            }
        }

        let overlapping: Vec<Entity> = characters
            .iter()
            .filter(|(_, target_transform)| {
                target_transform.translation.distance(position) <= settings.outer_radius
            })
            .map(|(target, _)| target)
            .collect();

        log_info(&format!(
            "💥 Grenade {:?} exploded at {:?}, {} actors in radius",
            entity,
            position,
            overlapping.len()
        ));

        detonated_events.write(GrenadeDetonated {
            grenade: entity,
            instigator: grenade.instigator,
            position,
            overlapping,
        });

        if let Ok(mut grenade_commands) = commands.get_entity(entity) {
            grenade_commands.despawn();
        }
    }
}

//! Weapon systems: reload lifecycle, fire loop.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::{
    ActiveWeapon, WeaponFired, WeaponInstance, WeaponReloadEnded, WeaponReloadStarted,
};
use crate::components::{ControlState, Dead};
use crate::equipment::{AmmoReserveChanged, InventoryLedger};
use crate::error::CombatError;
use crate::hooks::CombatHookSet;
use crate::scheduler::{ReloadTimerElapsed, TaskScheduler};
use crate::log;

/// Writers reload событий (общие для director и combat систем)
#[derive(SystemParam)]
pub struct ReloadNotifications<'w> {
    pub started: EventWriter<'w, WeaponReloadStarted>,
    pub ended: EventWriter<'w, WeaponReloadEnded>,
}

// ============================================================================
// Reload helpers
// ============================================================================

/// Попытка перезарядки
///
/// Проверки по порядку:
/// 1. Сам weapon (`can_reload`: магазин не полон, не в reload, не заблокирован)
/// 2. Hooks (weapon-specific запрет)
/// 3. Резерв ledger'а (ResourceExhausted)
pub fn try_reload(
    owner: Entity,
    weapon: &mut WeaponInstance,
    ledger: &InventoryLedger,
    hooks: Option<&mut CombatHookSet>,
    scheduler: &mut TaskScheduler,
    notifications: &mut ReloadNotifications,
) -> Result<(), CombatError> {
    weapon.check_reload()?;

    if let Some(hooks) = hooks.as_deref() {
        if !hooks.can_reload(owner, &weapon.setting) {
            return Err(CombatError::ReloadLocked);
        }
    }

    ledger.check_reserve(weapon.weapon_type())?;
    weapon.init_reload(owner, scheduler)?;

    notifications.started.write(WeaponReloadStarted {
        owner,
        weapon_id: weapon.id().clone(),
        reload_time: weapon.setting.reload_time,
    });
    if let Some(hooks) = hooks {
        hooks.reload_start(owner, weapon.id());
    }

    log(&format!(
        "🔄 {:?}: reload {} started ({}s)",
        owner,
        weapon.id(),
        weapon.setting.reload_time
    ));
    Ok(())
}

/// Прервать перезарядку (прогресс теряется, резерв не тратится)
pub fn abort_reload(
    owner: Entity,
    weapon: &mut WeaponInstance,
    hooks: Option<&mut CombatHookSet>,
    scheduler: &mut TaskScheduler,
    notifications: &mut ReloadNotifications,
) -> bool {
    if !weapon.cancel_reload(scheduler) {
        return false;
    }

    notifications.ended.write(WeaponReloadEnded {
        owner,
        success: false,
        ammo_taken: 0,
    });
    if let Some(hooks) = hooks {
        hooks.reload_end(owner, false, 0);
    }

    log(&format!("⛔ {:?}: reload {} cancelled", owner, weapon.id()));
    true
}

// ============================================================================
// Systems
// ============================================================================

/// Система: завершение перезарядки по таймеру
///
/// Generation token отсекает таймеры уничтоженного/заменённого instance.
pub fn complete_reloads(
    mut timers: EventReader<ReloadTimerElapsed>,
    mut characters: Query<(
        &mut ActiveWeapon,
        &mut InventoryLedger,
        Option<&mut CombatHookSet>,
    )>,
    mut notifications: ReloadNotifications,
    mut reserve_events: EventWriter<AmmoReserveChanged>,
) {
    for timer in timers.read() {
        let Ok((mut active, mut ledger, mut hooks)) = characters.get_mut(timer.owner) else {
            continue;
        };

        let Some(weapon) = active.weapon_mut() else {
            log(&format!("Stale reload timer for {:?}: no weapon", timer.owner));
            continue;
        };

        if weapon.generation != timer.generation || !weapon.is_reloading() {
            log(&format!(
                "Stale reload timer for {:?} (generation {} vs {})",
                timer.owner, timer.generation, weapon.generation
            ));
            continue;
        }

        let weapon_type = weapon.weapon_type();
        let ammo_taken = ledger.take_ammo(weapon_type, weapon.rounds_missing());
        // Резерв мог опустеть за время перезарядки → reload провален
        let success = ammo_taken > 0;
        weapon.on_reload_complete(success, ammo_taken);

        if success {
            reserve_events.write(AmmoReserveChanged {
                entity: timer.owner,
                weapon_type,
                count: ledger.ammo_count(weapon_type),
            });
        }
        notifications.ended.write(WeaponReloadEnded {
            owner: timer.owner,
            success,
            ammo_taken,
        });
        if let Some(hooks) = hooks.as_deref_mut() {
            hooks.reload_end(timer.owner, success, ammo_taken);
        }

        if let Err(err) = ledger.set_additional_info(weapon.slot_index, weapon.additional_info()) {
            err.report("complete_reloads");
        }

        log(&format!(
            "✅ {:?}: reload {} done (+{} rounds, {}/{})",
            timer.owner,
            weapon.id(),
            ammo_taken,
            weapon.rounds(),
            weapon.setting.max_rounds
        ));
    }
}

/// Система: fire loop активного оружия
///
/// Каждый выстрел пишет snapshot в ledger (ledger всегда актуален).
/// Пустой магазин после выстрела → автоматическая перезарядка.
pub fn tick_weapon_fire(
    time: Res<Time<Fixed>>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<
        (
            Entity,
            &Transform,
            &mut ActiveWeapon,
            &mut InventoryLedger,
            &ControlState,
            Option<&mut CombatHookSet>,
        ),
        Without<Dead>,
    >,
    mut fired_events: EventWriter<WeaponFired>,
    mut notifications: ReloadNotifications,
) {
    let dt = time.delta_secs();

    for (entity, transform, mut active, mut ledger, control, mut hooks) in characters.iter_mut() {
        let Some(weapon) = active.weapon_mut() else {
            continue;
        };

        weapon.tick_dispersion(dt);

        if !control.has_control {
            weapon.set_firing(false);
            continue;
        }

        let Some(shot) = weapon.tick_fire(dt) else {
            continue;
        };

        fired_events.write(WeaponFired {
            owner: entity,
            weapon_id: weapon.id().clone(),
            origin: transform.translation,
            target: shot.target,
            dispersion: shot.dispersion,
            damage: shot.damage,
            projectiles: shot.projectiles,
            projectile: shot.projectile,
            rounds_left: weapon.rounds(),
        });
        if let Some(hooks) = hooks.as_deref_mut() {
            hooks.fire_start(entity, weapon.id());
        }

        if let Err(err) = ledger.set_additional_info(weapon.slot_index, weapon.additional_info()) {
            err.report("tick_weapon_fire");
        }

        if weapon.rounds() == 0 {
            if let Err(err) = try_reload(
                entity,
                weapon,
                &ledger,
                hooks.as_deref_mut(),
                &mut scheduler,
                &mut notifications,
            ) {
                err.report("auto reload");
            }
        }
    }
}

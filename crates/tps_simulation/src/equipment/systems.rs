//! Equipment (director) systems
//!
//! # Systems
//!
//! **Weapon lifecycle:**
//! - `equip_initial_weapons` — новый Character экипирует слот 0
//! - `process_weapon_pickups` / `process_ammo_pickups` — подбор предметов
//! - `process_switch_intents` — next/previous через InventoryLedger
//! - `process_init_requests` — WeaponSwitched / InitWeaponRequest → `init_weapon`
//!
//! **Combat intents:**
//! - `process_reload_intents` — ручная перезарядка
//! - `process_attack_intents` — fire intent активного оружия

use bevy::prelude::*;

use crate::combat::systems::weapon::{abort_reload, try_reload, ReloadNotifications};
use crate::combat::{ActiveWeapon, AdditionalWeaponInfo};
use crate::components::{Attachment, Character, ControlState, Dead, MovementMode};
use crate::equipment::events::*;
use crate::equipment::{InventoryLedger, WeaponId, WeaponTable};
use crate::error::CombatError;
use crate::hooks::CombatHookSet;
use crate::scheduler::TaskScheduler;
use crate::{log, log_info};

// ============================================================================
// Init weapon
// ============================================================================

/// Что экипировать
pub struct InitWeapon<'a> {
    pub entity: Entity,
    pub weapon_id: &'a WeaponId,
    pub info: &'a AdditionalWeaponInfo,
    pub index: usize,
}

/// Экипировать оружие (Unequipped/Equipped → Equipped(weapon_id))
///
/// # Flow
/// 1. Уничтожить текущий instance (reload прерывается, Attachment снимается)
/// 2. Найти WeaponSetting; нет в таблице → остаёмся Unequipped (`WeaponNotFound`)
/// 3. Создать instance, прикрепить к сокету, применить setting + saved info
/// 4. Магазин пуст и reload возможен → автоматический reload
/// 5. Есть резерв → WeaponAmmoAvailable
#[allow(clippy::too_many_arguments)]
pub fn init_weapon(
    request: InitWeapon,
    commands: &mut Commands,
    table: &WeaponTable,
    active: &mut ActiveWeapon,
    ledger: &InventoryLedger,
    mode: MovementMode,
    mut hooks: Option<&mut CombatHookSet>,
    scheduler: &mut TaskScheduler,
    notifications: &mut ReloadNotifications,
    ammo_events: &mut EventWriter<WeaponAmmoAvailable>,
) -> Result<(), CombatError> {
    let entity = request.entity;

    // 1. Старое оружие уничтожается
    if let Some(mut old) = active.take() {
        abort_reload(
            entity,
            &mut old,
            hooks.as_deref_mut(),
            scheduler,
            notifications,
        );
        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.remove::<Attachment>();
        }
        log(&format!("🗑️ {:?}: weapon {} removed", entity, old.id()));
    }

    // Слот активен даже если lookup провалится: навигация продолжается от него
    active.current_index = request.index;

    // 2. Lookup
    let setting = table
        .get(request.weapon_id)
        .ok_or_else(|| CombatError::WeaponNotFound(request.weapon_id.clone()))?;

    // 3. Spawn + attach + settings + saved info
    let weapon = active.equip(setting.clone(), request.index);
    weapon.apply_additional_info(request.info);
    weapon.set_dispersion_reduction(mode.reduces_dispersion());
    weapon.update_state(mode);

    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.insert(Attachment::weapon(setting.prefab_path.clone()));
    }

    log_info(&format!(
        "✅ {:?}: equipped {} (slot {}, {}/{} rounds)",
        entity,
        setting.id,
        request.index,
        weapon.rounds(),
        setting.max_rounds
    ));

    // 4. Пустой магазин → reload без явного запроса
    if weapon.rounds() == 0 && weapon.can_reload() {
        if let Err(err) = try_reload(
            entity,
            weapon,
            ledger,
            hooks.as_deref_mut(),
            scheduler,
            notifications,
        ) {
            err.report("init_weapon auto reload");
        }
    }

    // 5. Сигнал: патроны для этого типа есть
    if ledger.has_ammo(setting.weapon_type) {
        ammo_events.write(WeaponAmmoAvailable {
            entity,
            weapon_type: setting.weapon_type,
        });
    }

    Ok(())
}

/// Система: стартовая экипировка (слот 0) для новых персонажей
pub fn equip_initial_weapons(
    characters: Query<(Entity, &InventoryLedger, &ActiveWeapon), Added<Character>>,
    mut requests: EventWriter<InitWeaponRequest>,
) {
    for (entity, ledger, active) in characters.iter() {
        if active.is_equipped() {
            continue;
        }

        if let Some(slot) = ledger.slot(0) {
            requests.write(InitWeaponRequest {
                entity,
                weapon_id: slot.weapon_id.clone(),
                info: slot.info.clone(),
                index: slot.index,
            });
        }
    }
}

/// Система: WeaponSwitched / InitWeaponRequest → init_weapon
#[allow(clippy::too_many_arguments)]
pub fn process_init_requests(
    mut commands: Commands,
    mut switched: EventReader<WeaponSwitched>,
    mut requests: EventReader<InitWeaponRequest>,
    table: Res<WeaponTable>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<
        (
            &mut ActiveWeapon,
            &InventoryLedger,
            &MovementMode,
            Option<&mut CombatHookSet>,
        ),
        Without<Dead>,
    >,
    mut notifications: ReloadNotifications,
    mut ammo_events: EventWriter<WeaponAmmoAvailable>,
) {
    let pending = switched
        .read()
        .map(|event| (event.entity, event.weapon_id.clone(), event.info.clone(), event.index))
        .chain(
            requests
                .read()
                .map(|event| (event.entity, event.weapon_id.clone(), event.info.clone(), event.index)),
        )
        .collect::<Vec<_>>();

    // Несколько запросов на одного персонажа за tick → применяется только последний
    let mut latest: Vec<(Entity, WeaponId, AdditionalWeaponInfo, usize)> = Vec::new();
    for request in pending {
        latest.retain(|(entity, ..)| *entity != request.0);
        latest.push(request);
    }

    for (entity, weapon_id, info, index) in latest {
        let Ok((mut active, ledger, mode, mut hooks)) = characters.get_mut(entity) else {
            continue;
        };

        let result = init_weapon(
            InitWeapon {
                entity,
                weapon_id: &weapon_id,
                info: &info,
                index,
            },
            &mut commands,
            &table,
            &mut active,
            ledger,
            *mode,
            hooks.as_deref_mut(),
            &mut scheduler,
            &mut notifications,
            &mut ammo_events,
        );

        if let Err(err) = result {
            err.report(&format!("init_weapon({:?})", entity));
        }
    }
}

// ============================================================================
// Switch
// ============================================================================

/// Система: листание оружия
///
/// Reload уходящего оружия прерывается (резерв не тратится), его состояние
/// сохраняется в ledger. Само пересоздание оружия — в `process_init_requests`.
pub fn process_switch_intents(
    mut intents: EventReader<SwitchWeaponIntent>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<
        (
            &mut ActiveWeapon,
            &mut InventoryLedger,
            &ControlState,
            Option<&mut CombatHookSet>,
        ),
        Without<Dead>,
    >,
    mut notifications: ReloadNotifications,
    mut switched: EventWriter<WeaponSwitched>,
) {
    for intent in intents.read() {
        let Ok((mut active, mut ledger, control, mut hooks)) = characters.get_mut(intent.entity)
        else {
            continue;
        };

        if !control.has_control {
            CombatError::NoControl.report("switch weapon");
            continue;
        }

        // < 2 слотов: отказ без побочных эффектов (reload не прерывается)
        if ledger.slot_count() < 2 {
            CombatError::NotEnoughSlots(ledger.slot_count()).report("switch weapon");
            continue;
        }

        // current_index сдвигается сразу, instance пересоздаётся позже (process_init_requests):
        // второй switch за tick сохраняет snapshot из ledger, а не от уходящего instance
        let saving_index = active.current_index;
        let saving_info = match active
            .weapon_mut()
            .filter(|weapon| weapon.slot_index == saving_index)
        {
            Some(weapon) => {
                abort_reload(
                    intent.entity,
                    weapon,
                    hooks.as_deref_mut(),
                    &mut scheduler,
                    &mut notifications,
                );
                weapon.additional_info()
            }
            None => ledger
                .additional_info(saving_index)
                .cloned()
                .unwrap_or_default(),
        };

        let target = saving_index as isize + intent.direction.offset();
        match ledger.switch_to_index(
            target,
            saving_index,
            saving_info,
            intent.direction.is_forward(),
        ) {
            Ok(switch) => {
                active.current_index = switch.index;
                log(&format!(
                    "🔁 {:?}: switch {} → slot {} ({})",
                    intent.entity,
                    saving_index,
                    switch.index,
                    switch.weapon_id
                ));
                switched.write(WeaponSwitched {
                    entity: intent.entity,
                    index: switch.index,
                    weapon_id: switch.weapon_id,
                    info: switch.info,
                    forward: switch.forward,
                });
            }
            Err(err) => err.report("switch weapon"),
        }
    }
}

// ============================================================================
// Reload / Attack
// ============================================================================

/// Система: ручная перезарядка
pub fn process_reload_intents(
    mut intents: EventReader<ReloadIntent>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<
        (
            &mut ActiveWeapon,
            &InventoryLedger,
            &ControlState,
            Option<&mut CombatHookSet>,
        ),
        Without<Dead>,
    >,
    mut notifications: ReloadNotifications,
) {
    for intent in intents.read() {
        let Ok((mut active, ledger, control, mut hooks)) = characters.get_mut(intent.entity) else {
            continue;
        };

        if !control.has_control {
            continue;
        }

        let result = match active.weapon_mut() {
            Some(weapon) => try_reload(
                intent.entity,
                weapon,
                ledger,
                hooks.as_deref_mut(),
                &mut scheduler,
                &mut notifications,
            ),
            None => Err(CombatError::NoWeaponEquipped),
        };

        if let Err(err) = result {
            err.report("reload");
        }
    }
}

/// Система: fire intent → активное оружие
///
/// Без оружия (или без управления) попытка логируется и отбрасывается — intent не копится.
pub fn process_attack_intents(
    mut intents: EventReader<AttackIntent>,
    mut characters: Query<(&mut ActiveWeapon, &ControlState, Has<Dead>)>,
) {
    for intent in intents.read() {
        let Ok((mut active, control, is_dead)) = characters.get_mut(intent.entity) else {
            continue;
        };

        if is_dead || !control.has_control {
            CombatError::NoControl.report(&format!("attack({:?})", intent.entity));
            continue;
        }

        match active.weapon_mut() {
            Some(weapon) => weapon.set_firing(intent.firing),
            None => {
                CombatError::NoWeaponEquipped.report(&format!("attack({:?})", intent.entity))
            }
        }
    }
}

// ============================================================================
// Pickups
// ============================================================================

/// Система: подбор оружия
///
/// Новый слот добавляется в конец. Если персонаж без оружия — сразу экипируем.
pub fn process_weapon_pickups(
    mut intents: EventReader<WeaponPickupIntent>,
    table: Res<WeaponTable>,
    mut characters: Query<(&mut InventoryLedger, &ActiveWeapon), Without<Dead>>,
    mut requests: EventWriter<InitWeaponRequest>,
) {
    for intent in intents.read() {
        let Ok((mut ledger, active)) = characters.get_mut(intent.entity) else {
            continue;
        };

        if table.get(&intent.weapon_id).is_none() {
            CombatError::WeaponNotFound(intent.weapon_id.clone()).report("weapon pickup");
            continue;
        }

        match ledger.add_weapon(intent.weapon_id.clone(), intent.info.clone()) {
            Ok(index) => {
                log(&format!(
                    "📦 {:?}: picked up {} into slot {}",
                    intent.entity, intent.weapon_id, index
                ));
                if !active.is_equipped() {
                    requests.write(InitWeaponRequest {
                        entity: intent.entity,
                        weapon_id: intent.weapon_id.clone(),
                        info: intent.info.clone(),
                        index,
                    });
                }
            }
            Err(err) => err.report("weapon pickup"),
        }
    }
}

/// Система: подбор патронов
///
/// Резерв clamp'ится по cap. Если тип совпадает с экипированным оружием —
/// WeaponAmmoAvailable, а пустой магазин сразу уходит в reload.
pub fn process_ammo_pickups(
    mut intents: EventReader<AmmoPickupIntent>,
    mut scheduler: ResMut<TaskScheduler>,
    mut characters: Query<
        (
            &mut InventoryLedger,
            &mut ActiveWeapon,
            Option<&mut CombatHookSet>,
        ),
        Without<Dead>,
    >,
    mut reserve_events: EventWriter<AmmoReserveChanged>,
    mut ammo_events: EventWriter<WeaponAmmoAvailable>,
    mut notifications: ReloadNotifications,
) {
    for intent in intents.read() {
        let Ok((mut ledger, mut active, mut hooks)) = characters.get_mut(intent.entity) else {
            continue;
        };

        let count = ledger.change_ammo_reserve(intent.weapon_type, intent.count as i64);
        reserve_events.write(AmmoReserveChanged {
            entity: intent.entity,
            weapon_type: intent.weapon_type,
            count,
        });

        let Some(weapon) = active.weapon_mut() else {
            continue;
        };
        if weapon.weapon_type() != intent.weapon_type || count == 0 {
            continue;
        }

        ammo_events.write(WeaponAmmoAvailable {
            entity: intent.entity,
            weapon_type: intent.weapon_type,
        });

        if weapon.rounds() == 0 {
            if let Err(err) = try_reload(
                intent.entity,
                weapon,
                &ledger,
                hooks.as_deref_mut(),
                &mut scheduler,
                &mut notifications,
            ) {
                err.report("ammo pickup reload");
            }
        }
    }
}

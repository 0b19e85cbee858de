//! Equipment module — weapon table, inventory ledger, director flows
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Input/engine emits intent events
//! - Systems process intents (ActiveWeapon + InventoryLedger)
//! - Notifications уходят движку/UI (WeaponSwitched, AmmoReserveChanged, ...)
//!
//! **Weapon lifecycle:**
//! - Init → WeaponInstance из WeaponTable + Attachment на сокет
//! - Switch → ledger сохраняет snapshot уходящего, WeaponSwitched → init нового
//! - Pickup → новый слот / пополнение резерва

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod events;
pub mod inventory;
pub mod systems;
pub mod weapon_table;

// Re-exports
pub use events::*;
pub use inventory::*;
pub use systems::*;
pub use weapon_table::*;

/// Equipment plugin (weapon lifecycle + intents)
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponTable>()
            // Events
            .add_event::<AttackIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<SwitchWeaponIntent>()
            .add_event::<InitWeaponRequest>()
            .add_event::<AmmoPickupIntent>()
            .add_event::<WeaponPickupIntent>()
            .add_event::<WeaponSwitched>()
            .add_event::<AmmoReserveChanged>()
            .add_event::<WeaponAmmoAvailable>()
            // Systems (до movement: новое оружие сразу получает актуальный режим)
            .add_systems(
                FixedUpdate,
                (
                    equip_initial_weapons,
                    process_weapon_pickups,
                    process_ammo_pickups,
                    process_switch_intents,
                    process_init_requests,
                    process_reload_intents,
                    process_attack_intents,
                )
                    .chain()
                    .in_set(CombatSet::Input),
            );
    }
}

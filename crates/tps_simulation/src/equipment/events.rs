//! Equipment events
//!
//! # Architecture
//!
//! **Intents (input/engine → ECS):**
//! - `AttackIntent` → fire intent активного оружия
//! - `ReloadIntent` → ручная перезарядка
//! - `SwitchWeaponIntent` → next/previous слот
//! - `InitWeaponRequest` → экипировать оружие по id напрямую
//! - `AmmoPickupIntent` / `WeaponPickupIntent` → подобранные предметы
//!
//! **Notifications (ECS → engine/UI):**
//! - `WeaponSwitched` → ledger выбрал новый слот (триггерит init weapon)
//! - `AmmoReserveChanged` → новое значение резерва
//! - `WeaponAmmoAvailable` → у экипированного оружия есть патроны в резерве

use bevy::prelude::*;

use crate::combat::AdditionalWeaponInfo;
use crate::equipment::{WeaponId, WeaponType};

// ============================================================================
// Intents
// ============================================================================

/// Зажать/отпустить огонь
#[derive(Event, Clone, Copy, Debug)]
pub struct AttackIntent {
    pub entity: Entity,
    pub firing: bool,
}

/// Ручная перезарядка (кнопка R)
#[derive(Event, Clone, Copy, Debug)]
pub struct ReloadIntent {
    pub entity: Entity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchDirection {
    Next,
    Previous,
}

impl SwitchDirection {
    pub fn offset(&self) -> isize {
        match self {
            SwitchDirection::Next => 1,
            SwitchDirection::Previous => -1,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, SwitchDirection::Next)
    }
}

/// Листание оружия (колесо мыши)
///
/// # Flow
/// 1. Нужно ≥ 2 слота
/// 2. Отменить reload уходящего оружия (прогресс теряется)
/// 3. Сохранить его AdditionalWeaponInfo в ledger
/// 4. Ledger → `WeaponSwitched` → init weapon
#[derive(Event, Clone, Copy, Debug)]
pub struct SwitchWeaponIntent {
    pub entity: Entity,
    pub direction: SwitchDirection,
}

/// Экипировать оружие по id (стартовая экипировка, скрипты)
#[derive(Event, Clone, Debug)]
pub struct InitWeaponRequest {
    pub entity: Entity,
    pub weapon_id: WeaponId,
    pub info: AdditionalWeaponInfo,
    pub index: usize,
}

/// Подобрали патроны
#[derive(Event, Clone, Copy, Debug)]
pub struct AmmoPickupIntent {
    pub entity: Entity,
    pub weapon_type: WeaponType,
    pub count: u32,
}

/// Подобрали оружие
#[derive(Event, Clone, Debug)]
pub struct WeaponPickupIntent {
    pub entity: Entity,
    pub weapon_id: WeaponId,
    pub info: AdditionalWeaponInfo,
}

// ============================================================================
// Notifications
// ============================================================================

/// Ledger переключил слот
///
/// `forward` не влияет на логику — для UI/анимации листания.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct WeaponSwitched {
    pub entity: Entity,
    pub index: usize,
    pub weapon_id: WeaponId,
    pub info: AdditionalWeaponInfo,
    pub forward: bool,
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct AmmoReserveChanged {
    pub entity: Entity,
    pub weapon_type: WeaponType,
    pub count: u32,
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct WeaponAmmoAvailable {
    pub entity: Entity,
    pub weapon_type: WeaponType,
}

//! InventoryLedger — слоты оружия и резерв патронов
//!
//! # Slots
//! - Упорядоченный список, порядок вставки = порядок экипировки
//! - Навигация next/previous оборачивается по модулю количества слотов
//! - Ledger не владеет WeaponInstance — только snapshot'ами `AdditionalWeaponInfo`
//!
//! # Ammo reserve
//! - Отдельный счётчик на каждый `WeaponType` (не на слот)
//! - Clamp в [0, cap], cap настраивается на тип

use bevy::prelude::*;

use crate::combat::AdditionalWeaponInfo;
use crate::equipment::{WeaponId, WeaponType};
use crate::error::CombatError;

/// Слот оружия
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySlot {
    pub index: usize,
    pub weapon_id: WeaponId,
    pub info: AdditionalWeaponInfo,
}

/// Резерв патронов одного типа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoSlot {
    pub weapon_type: WeaponType,
    pub count: u32,
    pub max: u32,
}

/// Результат успешного переключения (payload для WeaponSwitched)
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSwitch {
    pub index: usize,
    pub weapon_id: WeaponId,
    pub info: AdditionalWeaponInfo,
    /// Направление листания (только для UI/анимации)
    pub forward: bool,
}

#[derive(Component, Debug, Clone)]
pub struct InventoryLedger {
    slots: Vec<InventorySlot>,
    ammo: Vec<AmmoSlot>,
    /// Максимум слотов оружия
    pub max_slots: usize,
    /// Cap резерва для типов без явной настройки
    pub default_ammo_cap: u32,
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            ammo: Vec::new(),
            max_slots: 4,
            default_ammo_cap: 300,
        }
    }
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: добавить оружие (для спавна персонажа)
    pub fn with_weapon(mut self, weapon_id: impl Into<WeaponId>, rounds: u32) -> Self {
        if let Err(err) = self.add_weapon(weapon_id.into(), AdditionalWeaponInfo::with_rounds(rounds)) {
            err.report("InventoryLedger::with_weapon");
        }
        self
    }

    /// Builder: стартовый резерв патронов
    pub fn with_ammo(mut self, weapon_type: WeaponType, count: u32) -> Self {
        self.change_ammo_reserve(weapon_type, count as i64);
        self
    }

    /// Builder: cap резерва для типа
    pub fn with_ammo_cap(mut self, weapon_type: WeaponType, max: u32) -> Self {
        let slot = self.ammo_slot_mut(weapon_type);
        slot.max = max;
        slot.count = slot.count.min(max);
        self
    }

    // ========================================================================
    // Weapon slots
    // ========================================================================

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Добавить оружие в конец списка, вернуть индекс слота
    pub fn add_weapon(
        &mut self,
        weapon_id: WeaponId,
        info: AdditionalWeaponInfo,
    ) -> Result<usize, CombatError> {
        if self.slots.len() >= self.max_slots {
            return Err(CombatError::InventoryFull(self.max_slots));
        }

        let index = self.slots.len();
        self.slots.push(InventorySlot {
            index,
            weapon_id,
            info,
        });
        Ok(index)
    }

    /// Переключение на слот `target_index` (оборачивается по модулю)
    ///
    /// Сначала сохраняет `saving_info` в `saving_index`, затем возвращает данные целевого слота.
    /// Меньше двух слотов → `NotEnoughSlots`, состояние не меняется.
    pub fn switch_to_index(
        &mut self,
        target_index: isize,
        saving_index: usize,
        saving_info: AdditionalWeaponInfo,
        forward: bool,
    ) -> Result<WeaponSwitch, CombatError> {
        let len = self.slots.len();
        if len < 2 {
            return Err(CombatError::NotEnoughSlots(len));
        }
        if saving_index >= len {
            return Err(CombatError::SlotOutOfRange {
                index: saving_index,
                len,
            });
        }

        self.slots[saving_index].info = saving_info;

        let index = target_index.rem_euclid(len as isize) as usize;
        let target = &self.slots[index];

        Ok(WeaponSwitch {
            index,
            weapon_id: target.weapon_id.clone(),
            info: target.info.clone(),
            forward,
        })
    }

    pub fn set_additional_info(
        &mut self,
        index: usize,
        info: AdditionalWeaponInfo,
    ) -> Result<(), CombatError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CombatError::SlotOutOfRange { index, len })?;
        slot.info = info;
        Ok(())
    }

    pub fn additional_info(&self, index: usize) -> Option<&AdditionalWeaponInfo> {
        self.slots.get(index).map(|slot| &slot.info)
    }

    // ========================================================================
    // Ammo reserve
    // ========================================================================

    fn ammo_slot_mut(&mut self, weapon_type: WeaponType) -> &mut AmmoSlot {
        let position = match self
            .ammo
            .iter()
            .position(|slot| slot.weapon_type == weapon_type)
        {
            Some(position) => position,
            None => {
                self.ammo.push(AmmoSlot {
                    weapon_type,
                    count: 0,
                    max: self.default_ammo_cap,
                });
                self.ammo.len() - 1
            }
        };
        &mut self.ammo[position]
    }

    /// Изменить резерв на `delta` (clamp в [0, cap]), вернуть новое значение
    pub fn change_ammo_reserve(&mut self, weapon_type: WeaponType, delta: i64) -> u32 {
        let slot = self.ammo_slot_mut(weapon_type);
        let next = (slot.count as i64 + delta).clamp(0, slot.max as i64);
        slot.count = next as u32;
        slot.count
    }

    pub fn ammo_count(&self, weapon_type: WeaponType) -> u32 {
        self.ammo
            .iter()
            .find(|slot| slot.weapon_type == weapon_type)
            .map_or(0, |slot| slot.count)
    }

    pub fn ammo_slots(&self) -> &[AmmoSlot] {
        &self.ammo
    }

    pub fn has_ammo(&self, weapon_type: WeaponType) -> bool {
        self.ammo_count(weapon_type) > 0
    }

    /// Проверка резерва перед reload (граница ResourceExhausted)
    pub fn check_reserve(&self, weapon_type: WeaponType) -> Result<u32, CombatError> {
        match self.ammo_count(weapon_type) {
            0 => Err(CombatError::NoReserveAmmo(weapon_type)),
            count => Ok(count),
        }
    }

    /// Забрать до `wanted` патронов из резерва, вернуть сколько реально взято
    pub fn take_ammo(&mut self, weapon_type: WeaponType, wanted: u32) -> u32 {
        let available = self.ammo_count(weapon_type);
        let taken = wanted.min(available);
        if taken > 0 {
            self.change_ammo_reserve(weapon_type, -(taken as i64));
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_weapon_ledger() -> InventoryLedger {
        InventoryLedger::new()
            .with_weapon("Rifle", 30)
            .with_weapon("Pistol", 12)
    }

    #[test]
    fn test_single_slot_switch_rejected() {
        let mut ledger = InventoryLedger::new().with_weapon("Rifle", 30);

        let result = ledger.switch_to_index(1, 0, AdditionalWeaponInfo::with_rounds(5), true);
        assert_eq!(result, Err(CombatError::NotEnoughSlots(1)));

        // Saving info не записан
        assert_eq!(ledger.additional_info(0).unwrap().rounds, 30);
    }

    #[test]
    fn test_switch_wraps_index() {
        let mut ledger = two_weapon_ledger().with_weapon("Shotgun", 6);

        let next = ledger
            .switch_to_index(3, 2, AdditionalWeaponInfo::with_rounds(6), true)
            .unwrap();
        assert_eq!(next.index, 0);
        assert_eq!(next.weapon_id, "Rifle".into());

        let previous = ledger
            .switch_to_index(-1, 0, AdditionalWeaponInfo::with_rounds(30), false)
            .unwrap();
        assert_eq!(previous.index, 2);
        assert_eq!(previous.weapon_id, "Shotgun".into());
        assert!(!previous.forward);
    }

    #[test]
    fn test_switch_roundtrip_preserves_info() {
        let mut ledger = two_weapon_ledger();

        let mut saved = AdditionalWeaponInfo::with_rounds(7);
        saved.extras.insert("heat".into(), 0.25);

        // Rifle (0) → Pistol (1) с сохранением 7 патронов
        let to_pistol = ledger.switch_to_index(1, 0, saved.clone(), true).unwrap();
        assert_eq!(to_pistol.info.rounds, 12);

        // Pistol (1) → Rifle (0): получаем ровно то, что сохранили
        let back = ledger
            .switch_to_index(0, 1, to_pistol.info.clone(), false)
            .unwrap();
        assert_eq!(back.index, 0);
        assert_eq!(back.info, saved);
    }

    #[test]
    fn test_add_weapon_respects_max_slots() {
        let mut ledger = InventoryLedger::new();
        ledger.max_slots = 2;

        assert_eq!(ledger.add_weapon("Rifle".into(), Default::default()), Ok(0));
        assert_eq!(ledger.add_weapon("Pistol".into(), Default::default()), Ok(1));
        assert_eq!(
            ledger.add_weapon("Shotgun".into(), Default::default()),
            Err(CombatError::InventoryFull(2))
        );
    }

    #[test]
    fn test_ammo_reserve_clamped() {
        let mut ledger = InventoryLedger::new().with_ammo_cap(WeaponType::Pistol, 50);

        assert_eq!(ledger.change_ammo_reserve(WeaponType::Pistol, 40), 40);
        assert_eq!(ledger.change_ammo_reserve(WeaponType::Pistol, 40), 50);
        assert_eq!(ledger.change_ammo_reserve(WeaponType::Pistol, -80), 0);

        // Типы независимы
        assert_eq!(ledger.change_ammo_reserve(WeaponType::Rifle, 90), 90);
        assert_eq!(ledger.ammo_count(WeaponType::Pistol), 0);
    }

    #[test]
    fn test_take_ammo_partial() {
        let mut ledger = InventoryLedger::new().with_ammo(WeaponType::Rifle, 12);

        assert_eq!(ledger.take_ammo(WeaponType::Rifle, 30), 12);
        assert_eq!(ledger.ammo_count(WeaponType::Rifle), 0);
        assert_eq!(ledger.take_ammo(WeaponType::Rifle, 30), 0);
        assert_eq!(
            ledger.check_reserve(WeaponType::Rifle),
            Err(CombatError::NoReserveAmmo(WeaponType::Rifle))
        );
    }

    #[test]
    fn test_set_additional_info_out_of_range() {
        let mut ledger = two_weapon_ledger();
        assert!(ledger
            .set_additional_info(1, AdditionalWeaponInfo::with_rounds(3))
            .is_ok());
        assert_eq!(ledger.additional_info(1).unwrap().rounds, 3);

        assert_eq!(
            ledger.set_additional_info(5, AdditionalWeaponInfo::default()),
            Err(CombatError::SlotOutOfRange { index: 5, len: 2 })
        );
    }
}

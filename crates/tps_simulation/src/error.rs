//! Combat error taxonomy.
//!
//! Ни одна ошибка ядра не фатальна: pure-операции компонентов возвращают
//! `Result<_, CombatError>`, системы логируют и оставляют state без изменений.

use crate::equipment::{WeaponId, WeaponType};

/// Категория ошибки (определяет, как система реагирует на неё)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Weapon id не найден в таблице. Логируется как warning, персонаж остаётся без оружия.
    LookupFailure,
    /// Операция невалидна в текущем состоянии. Молча отклоняется.
    InvalidOperation,
    /// Нет резервных патронов. Отклоняется на границе inventory ledger.
    ResourceExhausted,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LookupFailure => "lookup-failure",
            Self::InvalidOperation => "invalid-operation",
            Self::ResourceExhausted => "resource-exhausted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("weapon `{0}` not found in weapon table")]
    WeaponNotFound(WeaponId),

    #[error("no weapon equipped")]
    NoWeaponEquipped,

    #[error("weapon is already reloading")]
    AlreadyReloading,

    #[error("magazine is full ({rounds}/{max})")]
    MagazineFull { rounds: u32, max: u32 },

    #[error("reload is locked for this weapon")]
    ReloadLocked,

    #[error("weapon switch needs at least two slots, inventory has {0}")]
    NotEnoughSlots(usize),

    #[error("slot index {index} is out of range (slots: {len})")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("inventory is full ({0} slots)")]
    InventoryFull(usize),

    #[error("no reserve ammo for {0:?}")]
    NoReserveAmmo(WeaponType),

    #[error("character is dead or has no control")]
    NoControl,
}

impl CombatError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WeaponNotFound(_) => ErrorKind::LookupFailure,
            Self::NoReserveAmmo(_) => ErrorKind::ResourceExhausted,
            Self::NoWeaponEquipped
            | Self::AlreadyReloading
            | Self::MagazineFull { .. }
            | Self::ReloadLocked
            | Self::NotEnoughSlots(_)
            | Self::SlotOutOfRange { .. }
            | Self::InventoryFull(_)
            | Self::NoControl => ErrorKind::InvalidOperation,
        }
    }

    /// Единая точка диагностики для систем: lookup failures видны всегда,
    /// остальное уходит в debug.
    pub fn report(&self, context: &str) {
        let message = format!("{}: {} [{}]", context, self, self.kind().as_str());
        match self.kind() {
            ErrorKind::LookupFailure => crate::logger::log_warning(&message),
            ErrorKind::InvalidOperation | ErrorKind::ResourceExhausted => {
                crate::logger::log(&message)
            }
        }
    }
}

//! Attachment компонент: визуальная модель оружия на сокете персонажа

use bevy::prelude::*;

/// Сокет правой руки — сюда крепится активное оружие
pub const WEAPON_MOUNT_POINT: &str = "WeaponSocketRightHand";

/// Attachment — привязка prefab оружия к mount point персонажа
///
/// Движок читает `Changed<Attachment>` и спавнит/удаляет визуал.
/// Удаление компонента = detach.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Attachment {
    /// Путь к prefab оружия (например "weapons/rifle")
    pub prefab_path: String,

    /// Сокет на skeletal mesh персонажа
    pub mount_point: String,
}

impl Attachment {
    pub fn weapon(prefab_path: impl Into<String>) -> Self {
        Self {
            prefab_path: prefab_path.into(),
            mount_point: WEAPON_MOUNT_POINT.into(),
        }
    }
}

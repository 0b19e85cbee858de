//! Weapon table — статические настройки оружия
//!
//! # Архитектура
//!
//! **WeaponSetting** — immutable blueprint оружия (lookup по `WeaponId`):
//! - Хранится в `WeaponTable` resource (HashMap lookup)
//! - Создаётся hardcoded в `WeaponTable::default()` или загружается через serde
//!   (дизайнеры пишут список настроек, ключ = `id`)
//!
//! **WeaponInstance** (combat::components::weapon) — runtime состояние,
//! создаётся из WeaponSetting при экипировке.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::combat::GrenadeSettings;
use crate::components::MovementMode;

// ============================================================================
// WeaponId
// ============================================================================

/// Weapon identifier (ключ в weapon table)
///
/// # Examples
/// - "Rifle"
/// - "Pistol"
/// - "GrenadeLauncher"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(pub String);

impl From<&str> for WeaponId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for WeaponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WeaponType
// ============================================================================

/// Тип оружия — ключ резерва патронов (одна пачка на тип, не на слот)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponType {
    Rifle,
    Pistol,
    Shotgun,
    GrenadeLauncher,
}

// ============================================================================
// Dispersion
// ============================================================================

/// Параметры разброса для одного режима движения (градусы)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispersionParams {
    pub max: f32,
    pub min: f32,
    /// Прибавка к разбросу за выстрел
    pub recoil: f32,
    /// Скорость сведения (градусы/сек)
    pub reduction: f32,
}

impl DispersionParams {
    pub const fn new(max: f32, min: f32, recoil: f32, reduction: f32) -> Self {
        Self {
            max,
            min,
            recoil,
            reduction,
        }
    }
}

/// Разброс по режимам движения
///
/// Sprint не стреляет — для него берутся параметры Run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispersionTable {
    pub aim: DispersionParams,
    pub aim_walk: DispersionParams,
    pub walk: DispersionParams,
    pub run: DispersionParams,
}

impl DispersionTable {
    pub fn for_mode(&self, mode: MovementMode) -> DispersionParams {
        match mode {
            MovementMode::Aim => self.aim,
            MovementMode::AimWalk => self.aim_walk,
            MovementMode::Walk => self.walk,
            MovementMode::Run | MovementMode::Sprint => self.run,
        }
    }
}

impl Default for DispersionTable {
    fn default() -> Self {
        Self {
            aim: DispersionParams::new(2.0, 0.3, 0.2, 0.3),
            aim_walk: DispersionParams::new(2.5, 0.5, 0.3, 0.4),
            walk: DispersionParams::new(5.0, 1.0, 0.5, 0.5),
            run: DispersionParams::new(10.0, 4.0, 1.0, 0.1),
        }
    }
}

// ============================================================================
// WeaponSetting
// ============================================================================

/// Что вылетает из ствола
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Мгновенный trace (попадание считает движок)
    Hitscan,
    /// Граната с таймером (спавнится inert, взводится при ударе)
    Grenade(GrenadeSettings),
}

/// Static weapon setting (blueprint)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSetting {
    pub id: WeaponId,
    pub display_name: String,
    pub weapon_type: WeaponType,
    pub max_rounds: u32,
    /// Длительность перезарядки (секунды)
    pub reload_time: f32,
    /// Пауза между выстрелами (секунды)
    pub rate_of_fire: f32,
    /// Урон одного projectile
    pub damage: f32,
    #[serde(default = "default_projectiles_per_shot")]
    pub projectiles_per_shot: u32,
    #[serde(default)]
    pub dispersion: DispersionTable,
    pub projectile: ProjectileKind,
    /// Prefab для Attachment
    pub prefab_path: String,
}

fn default_projectiles_per_shot() -> u32 {
    1
}

impl WeaponSetting {
    /// Штурмовая винтовка
    pub fn rifle() -> Self {
        Self {
            id: "Rifle".into(),
            display_name: "Assault Rifle".into(),
            weapon_type: WeaponType::Rifle,
            max_rounds: 30,
            reload_time: 2.0,
            rate_of_fire: 0.1,
            damage: 20.0,
            projectiles_per_shot: 1,
            dispersion: DispersionTable::default(),
            projectile: ProjectileKind::Hitscan,
            prefab_path: "weapons/rifle".into(),
        }
    }

    /// Пистолет (быстрая перезарядка, низкий урон)
    pub fn pistol() -> Self {
        Self {
            id: "Pistol".into(),
            display_name: "Pistol".into(),
            weapon_type: WeaponType::Pistol,
            max_rounds: 12,
            reload_time: 1.2,
            rate_of_fire: 0.3,
            damage: 15.0,
            projectiles_per_shot: 1,
            dispersion: DispersionTable {
                aim: DispersionParams::new(1.5, 0.2, 0.5, 0.5),
                aim_walk: DispersionParams::new(2.0, 0.4, 0.6, 0.5),
                walk: DispersionParams::new(4.0, 0.8, 0.8, 0.6),
                run: DispersionParams::new(8.0, 3.0, 1.2, 0.2),
            },
            projectile: ProjectileKind::Hitscan,
            prefab_path: "weapons/pistol".into(),
        }
    }

    /// Дробовик (6 дробин на выстрел)
    pub fn shotgun() -> Self {
        Self {
            id: "Shotgun".into(),
            display_name: "Shotgun".into(),
            weapon_type: WeaponType::Shotgun,
            max_rounds: 6,
            reload_time: 2.5,
            rate_of_fire: 0.8,
            damage: 10.0,
            projectiles_per_shot: 6,
            dispersion: DispersionTable {
                aim: DispersionParams::new(6.0, 4.0, 2.0, 1.0),
                aim_walk: DispersionParams::new(7.0, 4.5, 2.0, 1.0),
                walk: DispersionParams::new(9.0, 5.0, 2.5, 1.0),
                run: DispersionParams::new(12.0, 7.0, 3.0, 0.5),
            },
            projectile: ProjectileKind::Hitscan,
            prefab_path: "weapons/shotgun".into(),
        }
    }

    /// Гранатомёт (урон наносит взрыв гранаты, не попадание)
    pub fn grenade_launcher() -> Self {
        Self {
            id: "GrenadeLauncher".into(),
            display_name: "Grenade Launcher".into(),
            weapon_type: WeaponType::GrenadeLauncher,
            max_rounds: 4,
            reload_time: 3.0,
            rate_of_fire: 1.0,
            damage: 0.0,
            projectiles_per_shot: 1,
            dispersion: DispersionTable::default(),
            projectile: ProjectileKind::Grenade(GrenadeSettings::default()),
            prefab_path: "weapons/grenade_launcher".into(),
        }
    }
}

// ============================================================================
// WeaponTable (resource)
// ============================================================================

/// Weapon table resource (lookup по имени)
///
/// Сериализуется как список настроек — ключом служит `WeaponSetting::id`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<WeaponSetting>", into = "Vec<WeaponSetting>")]
pub struct WeaponTable {
    weapons: HashMap<WeaponId, WeaponSetting>,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self::from(vec![
            WeaponSetting::rifle(),
            WeaponSetting::pistol(),
            WeaponSetting::shotgun(),
            WeaponSetting::grenade_launcher(),
        ])
    }
}

impl From<Vec<WeaponSetting>> for WeaponTable {
    fn from(settings: Vec<WeaponSetting>) -> Self {
        let mut table = Self::empty();
        for setting in settings {
            table.insert(setting);
        }
        table
    }
}

impl From<WeaponTable> for Vec<WeaponSetting> {
    fn from(table: WeaponTable) -> Self {
        let mut settings: Vec<_> = table.weapons.into_values().collect();
        settings.sort_by(|a, b| a.id.cmp(&b.id));
        settings
    }
}

impl WeaponTable {
    pub fn empty() -> Self {
        Self {
            weapons: HashMap::new(),
        }
    }

    pub fn get(&self, id: &WeaponId) -> Option<&WeaponSetting> {
        self.weapons.get(id)
    }

    /// Добавить/заменить настройку (ключ = setting.id)
    pub fn insert(&mut self, setting: WeaponSetting) {
        self.weapons.insert(setting.id.clone(), setting);
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_contents() {
        let table = WeaponTable::default();
        assert_eq!(table.len(), 4);

        let rifle = table.get(&"Rifle".into()).unwrap();
        assert_eq!(rifle.weapon_type, WeaponType::Rifle);
        assert_eq!(rifle.max_rounds, 30);

        assert!(table.get(&"Railgun".into()).is_none());
    }

    #[test]
    fn test_dispersion_for_sprint_uses_run() {
        let table = DispersionTable::default();
        assert_eq!(table.for_mode(MovementMode::Sprint), table.run);
        assert_eq!(table.for_mode(MovementMode::AimWalk), table.aim_walk);
    }

    #[test]
    fn test_designer_table_from_json() {
        let json = r#"[
            {
                "id": "Marksman",
                "display_name": "Marksman Rifle",
                "weapon_type": "Rifle",
                "max_rounds": 10,
                "reload_time": 2.5,
                "rate_of_fire": 0.6,
                "damage": 45.0,
                "projectile": "Hitscan",
                "prefab_path": "weapons/marksman"
            },
            {
                "id": "Thumper",
                "display_name": "Thumper",
                "weapon_type": "GrenadeLauncher",
                "max_rounds": 1,
                "reload_time": 1.5,
                "rate_of_fire": 1.0,
                "damage": 0.0,
                "projectile": { "Grenade": { "fuse_time": 2.0, "max_damage": 80.0 } },
                "prefab_path": "weapons/thumper"
            }
        ]"#;

        let table: WeaponTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 2);

        let marksman = table.get(&"Marksman".into()).unwrap();
        assert_eq!(marksman.projectiles_per_shot, 1);
        assert_eq!(marksman.dispersion, DispersionTable::default());

        let thumper = table.get(&"Thumper".into()).unwrap();
        match &thumper.projectile {
            ProjectileKind::Grenade(settings) => {
                assert_eq!(settings.fuse_time, 2.0);
                assert_eq!(settings.max_damage, 80.0);
                // Остальное — defaults
                assert_eq!(settings.inner_radius, 200.0);
                assert_eq!(settings.outer_radius, 500.0);
            }
            other => panic!("expected grenade projectile, got {:?}", other),
        }
    }
}

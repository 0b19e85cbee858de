//! WeaponInstance — runtime состояние активного оружия
//!
//! Архитектура:
//! - `WeaponSetting` (equipment::weapon_table) — immutable данные из таблицы
//! - `WeaponRuntimeState` — патроны, reload/fire флаги, разброс, точка выстрела
//! - `ActiveWeapon` компонент персонажа владеет максимум одним WeaponInstance
//!
//! Таймер перезарядки живёт в `TaskScheduler`. Каждый instance получает уникальный
//! generation: завершение reload от старого/отменённого instance игнорируется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::components::MovementMode;
use crate::equipment::{ProjectileKind, WeaponId, WeaponSetting, WeaponType};
use crate::error::CombatError;
use crate::scheduler::{ScheduledTask, TaskHandle, TaskScheduler};

/// Высота точки выстрела над точкой курсора по режиму движения
///
/// Прицеливание стоя — выше (голова), остальное — уровень корпуса, sprint — не стреляет.
pub fn shoot_height(mode: MovementMode) -> f32 {
    match mode {
        MovementMode::Aim | MovementMode::AimWalk => 160.0,
        MovementMode::Walk | MovementMode::Run => 120.0,
        MovementMode::Sprint => 0.0,
    }
}

/// Сохраняемое состояние оружия (переживает смену оружия)
///
/// `extras` — расширяемые поля (например, заряд, перегрев).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalWeaponInfo {
    pub rounds: u32,
    #[serde(default)]
    pub extras: BTreeMap<String, f32>,
}

impl AdditionalWeaponInfo {
    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds,
            extras: BTreeMap::new(),
        }
    }
}

/// Mutable состояние оружия
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponRuntimeState {
    pub rounds: u32,
    pub reloading: bool,
    /// Fire intent (кнопка зажата)
    pub firing: bool,
    /// Стрельба запрещена текущим режимом (sprint)
    pub fire_blocked: bool,
    /// Внешняя блокировка перезарядки
    pub reload_locked: bool,
    pub reduce_dispersion: bool,
    pub mode: MovementMode,
    /// Текущий разброс (градусы)
    pub dispersion: f32,
    pub shoot_target: Vec3,
    /// Таймер до следующего выстрела (секунды)
    pub fire_cooldown: f32,
}

/// Один выстрел (результат `tick_fire`)
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub target: Vec3,
    pub dispersion: f32,
    pub damage: f32,
    pub projectiles: u32,
    pub projectile: ProjectileKind,
}

#[derive(Debug, Clone)]
pub struct WeaponInstance {
    pub setting: WeaponSetting,
    pub state: WeaponRuntimeState,
    /// Слот inventory, из которого экипировано оружие
    pub slot_index: usize,
    pub generation: u64,
    reload_task: Option<TaskHandle>,
    extras: BTreeMap<String, f32>,
}

impl WeaponInstance {
    pub fn new(setting: WeaponSetting, slot_index: usize, generation: u64) -> Self {
        let mode = MovementMode::default();
        let dispersion = setting.dispersion.for_mode(mode).max;
        let state = WeaponRuntimeState {
            rounds: setting.max_rounds,
            reloading: false,
            firing: false,
            fire_blocked: false,
            reload_locked: false,
            reduce_dispersion: mode.reduces_dispersion(),
            mode,
            dispersion,
            shoot_target: Vec3::ZERO,
            fire_cooldown: 0.0,
        };

        Self {
            setting,
            state,
            slot_index,
            generation,
            reload_task: None,
            extras: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &WeaponId {
        &self.setting.id
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.setting.weapon_type
    }

    pub fn rounds(&self) -> u32 {
        self.state.rounds
    }

    pub fn is_reloading(&self) -> bool {
        self.state.reloading
    }

    pub fn reload_task(&self) -> Option<TaskHandle> {
        self.reload_task
    }

    // ========================================================================
    // Fire
    // ========================================================================

    pub fn set_firing(&mut self, firing: bool) {
        self.state.firing = firing && !self.state.fire_blocked;
    }

    /// Тик fire-rate таймера. Возвращает выстрел, если он произошёл в этом tick.
    pub fn tick_fire(&mut self, dt: f32) -> Option<Shot> {
        self.state.fire_cooldown = (self.state.fire_cooldown - dt).max(0.0);

        if !self.state.firing
            || self.state.reloading
            || self.state.fire_blocked
            || self.state.rounds == 0
            || self.state.fire_cooldown > 0.0
        {
            return None;
        }

        let shot = Shot {
            target: self.state.shoot_target,
            dispersion: self.state.dispersion,
            damage: self.setting.damage,
            projectiles: self.setting.projectiles_per_shot,
            projectile: self.setting.projectile.clone(),
        };

        self.state.rounds -= 1;
        self.state.fire_cooldown = self.setting.rate_of_fire;

        let params = self.setting.dispersion.for_mode(self.state.mode);
        self.state.dispersion = (self.state.dispersion + params.recoil).min(params.max);

        Some(shot)
    }

    /// Сведение разброса: к min при reduce флаге, иначе к max
    pub fn tick_dispersion(&mut self, dt: f32) {
        let params = self.setting.dispersion.for_mode(self.state.mode);
        let step = params.reduction * dt;

        self.state.dispersion = if self.state.reduce_dispersion {
            self.state.dispersion - step
        } else {
            self.state.dispersion + step
        }
        .clamp(params.min, params.max);
    }

    // ========================================================================
    // Reload
    // ========================================================================

    pub fn check_reload(&self) -> Result<(), CombatError> {
        if self.state.reloading {
            return Err(CombatError::AlreadyReloading);
        }
        if self.state.reload_locked {
            return Err(CombatError::ReloadLocked);
        }
        if self.state.rounds >= self.setting.max_rounds {
            return Err(CombatError::MagazineFull {
                rounds: self.state.rounds,
                max: self.setting.max_rounds,
            });
        }
        Ok(())
    }

    /// Не полный магазин, не в процессе перезарядки, не заблокирован
    pub fn can_reload(&self) -> bool {
        self.check_reload().is_ok()
    }

    /// Начать перезарядку: reloading = true + таймер на `reload_time`
    pub fn init_reload(
        &mut self,
        owner: Entity,
        scheduler: &mut TaskScheduler,
    ) -> Result<TaskHandle, CombatError> {
        self.check_reload()?;

        let handle = scheduler.schedule(
            self.setting.reload_time,
            ScheduledTask::ReloadComplete {
                owner,
                generation: self.generation,
            },
        );
        self.state.reloading = true;
        self.reload_task = Some(handle);

        Ok(handle)
    }

    /// Прервать перезарядку (прогресс теряется). `true` если reload шёл.
    pub fn cancel_reload(&mut self, scheduler: &mut TaskScheduler) -> bool {
        if let Some(handle) = self.reload_task.take() {
            scheduler.cancel(handle);
        }

        let was_reloading = self.state.reloading;
        self.state.reloading = false;
        was_reloading
    }

    /// Завершение перезарядки: `ammo_taken` патронов из резерва идут в магазин
    pub fn on_reload_complete(&mut self, success: bool, ammo_taken: u32) {
        if success {
            self.state.rounds = (self.state.rounds + ammo_taken).min(self.setting.max_rounds);
        }
        self.state.reloading = false;
        self.reload_task = None;
    }

    /// Сколько патронов нужно до полного магазина
    pub fn rounds_missing(&self) -> u32 {
        self.setting.max_rounds.saturating_sub(self.state.rounds)
    }

    // ========================================================================
    // Aim / movement mode
    // ========================================================================

    /// Точка выстрела = точка курсора + вертикальное смещение по режиму
    pub fn compute_shoot_target(base_hit_point: Vec3, mode: MovementMode) -> Vec3 {
        base_hit_point + Vec3::Y * shoot_height(mode)
    }

    pub fn update_shoot_target(&mut self, base_hit_point: Vec3) {
        self.state.shoot_target = Self::compute_shoot_target(base_hit_point, self.state.mode);
    }

    pub fn set_dispersion_reduction(&mut self, reduce: bool) {
        self.state.reduce_dispersion = reduce;
    }

    /// Уведомление о смене режима движения
    ///
    /// Sprint блокирует стрельбу и сбрасывает fire intent.
    pub fn update_state(&mut self, mode: MovementMode) {
        self.state.mode = mode;
        self.state.fire_blocked = mode == MovementMode::Sprint;
        if self.state.fire_blocked {
            self.state.firing = false;
        }

        let params = self.setting.dispersion.for_mode(mode);
        self.state.dispersion = self.state.dispersion.clamp(params.min, params.max);
    }

    // ========================================================================
    // Additional info
    // ========================================================================

    pub fn additional_info(&self) -> AdditionalWeaponInfo {
        AdditionalWeaponInfo {
            rounds: self.state.rounds,
            extras: self.extras.clone(),
        }
    }

    pub fn apply_additional_info(&mut self, info: &AdditionalWeaponInfo) {
        self.state.rounds = info.rounds.min(self.setting.max_rounds);
        self.extras = info.extras.clone();
    }
}

// ============================================================================
// ActiveWeapon (component)
// ============================================================================

/// Активное оружие персонажа (Unequipped = `instance: None`)
#[derive(Component, Debug, Default)]
pub struct ActiveWeapon {
    pub instance: Option<WeaponInstance>,
    /// Индекс слота inventory активного оружия
    pub current_index: usize,
    next_generation: u64,
}

impl ActiveWeapon {
    pub fn is_equipped(&self) -> bool {
        self.instance.is_some()
    }

    pub fn weapon(&self) -> Option<&WeaponInstance> {
        self.instance.as_ref()
    }

    pub fn weapon_mut(&mut self) -> Option<&mut WeaponInstance> {
        self.instance.as_mut()
    }

    pub fn id(&self) -> Option<&WeaponId> {
        self.instance.as_ref().map(WeaponInstance::id)
    }

    /// Забрать текущий instance (персонаж становится Unequipped)
    pub fn take(&mut self) -> Option<WeaponInstance> {
        self.instance.take()
    }

    /// Создать новый instance (старый уничтожается), выдать новый generation
    pub fn equip(&mut self, setting: WeaponSetting, index: usize) -> &mut WeaponInstance {
        self.next_generation += 1;
        self.current_index = index;
        self.instance
            .insert(WeaponInstance::new(setting, index, self.next_generation))
    }
}

//! Tests for weapon systems (reload lifecycle, fire loop).

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::combat::{ActiveWeapon, WeaponFired, WeaponReloadEnded, WeaponReloadStarted};
    use crate::components::{Character, ControlState};
    use crate::equipment::{
        AttackIntent, InventoryLedger, ReloadIntent, WeaponId, WeaponSetting, WeaponType,
    };
    use crate::hooks::{CombatHookSet, CombatHooks};
    use crate::{collect_events, create_headless_app, run_fixed_ticks};
    use bevy::prelude::*;

    /// Запрещает перезарядку любого оружия
    struct NoReload;

    impl CombatHooks for NoReload {
        fn can_reload(&self, _owner: Entity, _setting: &WeaponSetting) -> bool {
            false
        }
    }

    /// Пишет вызовы в общий журнал
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl CombatHooks for Recorder {
        fn on_reload_start(&mut self, _owner: Entity, weapon: &WeaponId) {
            self.0.lock().unwrap().push(format!("reload_start {}", weapon));
        }

        fn on_reload_end(&mut self, _owner: Entity, success: bool, ammo_taken: u32) {
            self.0
                .lock()
                .unwrap()
                .push(format!("reload_end {} {}", success, ammo_taken));
        }

        fn on_fire_start(&mut self, _owner: Entity, weapon: &WeaponId) {
            self.0.lock().unwrap().push(format!("fire {}", weapon));
        }
    }

    fn rounds(app: &App, entity: Entity) -> u32 {
        app.world()
            .get::<ActiveWeapon>(entity)
            .and_then(ActiveWeapon::weapon)
            .map(|weapon| weapon.rounds())
            .unwrap_or_default()
    }

    fn is_reloading(app: &App, entity: Entity) -> bool {
        app.world()
            .get::<ActiveWeapon>(entity)
            .and_then(ActiveWeapon::weapon)
            .is_some_and(|weapon| weapon.is_reloading())
    }

    #[test]
    fn test_manual_reload_takes_only_missing_rounds() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new()
                    .with_weapon("Pistol", 4)
                    .with_ammo(WeaponType::Pistol, 20),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        assert_eq!(rounds(&app, entity), 4);

        app.world_mut().send_event(ReloadIntent { entity });
        run_fixed_ticks(&mut app, 1);
        assert!(is_reloading(&app, entity));

        // Pistol reload 1.2s
        run_fixed_ticks(&mut app, 80);

        assert!(!is_reloading(&app, entity));
        assert_eq!(rounds(&app, entity), 12);

        let ledger = app.world().get::<InventoryLedger>(entity).unwrap();
        assert_eq!(ledger.ammo_count(WeaponType::Pistol), 12);
        assert_eq!(ledger.additional_info(0).unwrap().rounds, 12);

        let ended = collect_events::<WeaponReloadEnded>(app.world());
        assert_eq!(ended.len(), 1);
        assert!(ended[0].success);
        assert_eq!(ended[0].ammo_taken, 8);
    }

    #[test]
    fn test_partial_reserve_partially_fills_magazine() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new()
                    .with_weapon("Pistol", 0)
                    .with_ammo(WeaponType::Pistol, 5),
            ))
            .id();

        // Пустой магазин → reload при экипировке
        run_fixed_ticks(&mut app, 1);
        assert!(is_reloading(&app, entity));

        run_fixed_ticks(&mut app, 80);

        assert_eq!(rounds(&app, entity), 5);
        let ledger = app.world().get::<InventoryLedger>(entity).unwrap();
        assert_eq!(ledger.ammo_count(WeaponType::Pistol), 0);
    }

    #[test]
    fn test_reload_fails_when_reserve_drained_mid_reload() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new()
                    .with_weapon("Pistol", 4)
                    .with_ammo(WeaponType::Pistol, 20),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(ReloadIntent { entity });
        run_fixed_ticks(&mut app, 1);
        assert!(is_reloading(&app, entity));

        // Резерв ушёл во время перезарядки
        app.world_mut()
            .get_mut::<InventoryLedger>(entity)
            .unwrap()
            .change_ammo_reserve(WeaponType::Pistol, -20);
        run_fixed_ticks(&mut app, 80);

        assert!(!is_reloading(&app, entity));
        assert_eq!(rounds(&app, entity), 4);

        let ended = collect_events::<WeaponReloadEnded>(app.world());
        assert_eq!(ended.len(), 1);
        assert!(!ended[0].success);
        assert_eq!(ended[0].ammo_taken, 0);
    }

    #[test]
    fn test_reload_refused_without_reserve() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((Character, InventoryLedger::new().with_weapon("Pistol", 3)))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(ReloadIntent { entity });
        run_fixed_ticks(&mut app, 1);

        assert!(!is_reloading(&app, entity));
        assert!(collect_events::<WeaponReloadStarted>(app.world()).is_empty());
    }

    #[test]
    fn test_hook_can_veto_reload() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new()
                    .with_weapon("Rifle", 10)
                    .with_ammo(WeaponType::Rifle, 60),
                CombatHookSet::new().with(NoReload),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(ReloadIntent { entity });
        run_fixed_ticks(&mut app, 1);

        assert!(!is_reloading(&app, entity));
        assert_eq!(rounds(&app, entity), 10);
    }

    #[test]
    fn test_hooks_observe_fire_and_reload() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new()
                    .with_weapon("Pistol", 1)
                    .with_ammo(WeaponType::Pistol, 30),
                CombatHookSet::new().with(Recorder(journal.clone())),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(AttackIntent {
            entity,
            firing: true,
        });
        // Последний патрон → auto reload → 1.2s
        run_fixed_ticks(&mut app, 90);

        let journal = journal.lock().unwrap().clone();
        assert_eq!(
            journal[..3],
            [
                "fire Pistol".to_string(),
                "reload_start Pistol".to_string(),
                "reload_end true 12".to_string(),
            ]
        );
    }

    #[test]
    fn test_fire_loop_respects_rate_of_fire() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new().with_weapon("Pistol", 12),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(AttackIntent {
            entity,
            firing: true,
        });
        // 1 секунда при rate_of_fire 0.3 → 4 выстрела (0, 0.3, 0.6, 0.9)
        run_fixed_ticks(&mut app, 60);

        let fired = collect_events::<WeaponFired>(app.world());
        assert!((3..=4).contains(&fired.len()), "fired {}", fired.len());
        assert_eq!(rounds(&app, entity), 12 - fired.len() as u32);
        assert_eq!(fired.last().unwrap().rounds_left, rounds(&app, entity));
    }

    #[test]
    fn test_losing_control_stops_fire() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((
                Character,
                InventoryLedger::new().with_weapon("Rifle", 30),
            ))
            .id();

        run_fixed_ticks(&mut app, 1);
        app.world_mut().send_event(AttackIntent {
            entity,
            firing: true,
        });
        run_fixed_ticks(&mut app, 1);
        assert_eq!(collect_events::<WeaponFired>(app.world()).len(), 1);

        app.world_mut()
            .get_mut::<ControlState>(entity)
            .unwrap()
            .has_control = false;
        run_fixed_ticks(&mut app, 60);

        assert_eq!(collect_events::<WeaponFired>(app.world()).len(), 1);
        let active = app.world().get::<ActiveWeapon>(entity).unwrap();
        assert!(!active.weapon().unwrap().state.firing);
    }
}

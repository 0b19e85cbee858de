//! Tests for stamina systems.

#[cfg(test)]
mod tests {
    use crate::combat::{Stamina, StaminaConfig};
    use crate::components::{AimCursor, Character, MoveInput, MovementIntents, MovementMode};
    use crate::{create_headless_app, run_fixed_ticks};
    use bevy::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn sprinter(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Character,
                MovementIntents::new(true, false, false),
                MoveInput {
                    axis: Vec2::new(1.0, 0.0),
                    sprint_allowed: false,
                },
                // Курсор далеко по +X: octant (1, 0) весь тест
                AimCursor {
                    hit_point: Vec3::new(1.0e7, 0.0, 0.0),
                    yaw: 0.0,
                },
            ))
            .id()
    }

    #[test]
    fn test_stamina_stays_in_bounds_for_random_speeds() {
        let config = StaminaConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut stamina = Stamina::default();

        for _ in 0..5_000 {
            let speed = rng.gen_range(0.0..1_000.0);
            let next = stamina.tick(speed, &config);
            assert!((0.0..=1.0).contains(&next.value), "value {}", next.value);

            // Блокировка на нуле, разблокировка только на единице
            if next.value <= 0.0 {
                assert!(next.sprint_blocked);
            }
            if next.value >= 1.0 {
                assert!(!next.sprint_blocked);
            }
        }
    }

    #[test]
    fn test_sprint_block_hysteresis() {
        let config = StaminaConfig::default();
        let mut stamina = Stamina {
            value: 0.003,
            sprint_blocked: false,
        };

        stamina.tick(800.0, &config);
        assert_eq!(stamina.value, 0.0);
        assert!(stamina.sprint_blocked);

        // Восстановление наполовину — всё ещё заблокировано
        for _ in 0..100 {
            stamina.tick(300.0, &config);
        }
        assert!(stamina.value > 0.4 && stamina.value < 0.6);
        assert!(stamina.sprint_blocked);

        // Спринт-скорость при блокировке не тратит stamina
        let before = stamina.value;
        stamina.tick(800.0, &config);
        assert_eq!(stamina.value, before);

        for _ in 0..200 {
            stamina.tick(0.0, &config);
        }
        assert!(stamina.is_full());
        assert!(!stamina.sprint_blocked);
    }

    #[test]
    fn test_dead_band_keeps_value() {
        let config = StaminaConfig::default();
        let mut stamina = Stamina {
            value: 0.5,
            sprint_blocked: false,
        };

        stamina.tick(789.5, &config);
        assert_eq!(stamina.value, 0.5);
    }

    #[test]
    fn test_sprinting_character_exhausts_and_falls_back_to_run() {
        let mut app = create_headless_app(1);
        let entity = sprinter(&mut app);

        run_fixed_ticks(&mut app, 1);
        assert_eq!(
            *app.world().get::<MovementMode>(entity).unwrap(),
            MovementMode::Sprint
        );

        // 1.0 / 0.005 = 200 tick'ов спринта + запас на float
        run_fixed_ticks(&mut app, 210);

        let stamina = *app.world().get::<Stamina>(entity).unwrap();
        assert!(stamina.sprint_blocked);
        assert!(stamina.value < 0.1);
        assert_eq!(
            *app.world().get::<MovementMode>(entity).unwrap(),
            MovementMode::Run
        );
    }

    #[test]
    fn test_sprint_unblocks_after_full_recovery() {
        let mut app = create_headless_app(1);
        let entity = sprinter(&mut app);

        run_fixed_ticks(&mut app, 211);
        assert!(app.world().get::<Stamina>(entity).unwrap().sprint_blocked);

        // Бег (600) восстанавливает: ~200 tick'ов до 1.0, затем спринт снова доступен
        run_fixed_ticks(&mut app, 205);

        let stamina = *app.world().get::<Stamina>(entity).unwrap();
        assert!(!stamina.sprint_blocked);
        assert_eq!(
            *app.world().get::<MovementMode>(entity).unwrap(),
            MovementMode::Sprint
        );
    }
}

//! Tests for damage & death systems.

#[cfg(test)]
mod tests {
    use crate::combat::{
        CharacterDied, DamageCause, DamageDealt, DamageRequest, DeathSequenceStarted,
        RagdollEnabled, StatusEffectApplied,
    };
    use crate::components::{
        ActiveEffects, Character, ControlState, Dead, DeathAnimations, Health, Shield,
        StatusEffectSpec, SurfaceType,
    };
    use crate::{collect_events, create_headless_app, run_fixed_ticks};
    use bevy::prelude::*;

    fn hit(app: &mut App, target: Entity, amount: f32) {
        app.world_mut().send_event(DamageRequest {
            target,
            amount,
            cause: DamageCause::Direct { instigator: None },
        });
    }

    #[test]
    fn test_shield_absorbs_before_health() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((Character, Shield::new(30.0, 0.0, 1.0)))
            .id();

        hit(&mut app, entity, 50.0);
        run_fixed_ticks(&mut app, 1);

        assert_eq!(app.world().get::<Shield>(entity).unwrap().current, 0.0);
        assert_eq!(app.world().get::<Health>(entity).unwrap().current, 80.0);

        let dealt = collect_events::<DamageDealt>(app.world());
        assert_eq!(dealt.len(), 1);
        assert_eq!(dealt[0].shield_damage, 30.0);
        assert_eq!(dealt[0].health_damage, 20.0);
        assert!(!dealt[0].target_died);
    }

    #[test]
    fn test_character_dies_exactly_once() {
        let mut app = create_headless_app(42);
        let entity = app.world_mut().spawn(Character).id();

        // Два смертельных запроса в одном tick + добивание потом
        hit(&mut app, entity, 150.0);
        hit(&mut app, entity, 150.0);
        run_fixed_ticks(&mut app, 1);
        hit(&mut app, entity, 10.0);
        run_fixed_ticks(&mut app, 1);

        assert_eq!(collect_events::<CharacterDied>(app.world()).len(), 1);
        assert_eq!(collect_events::<DeathSequenceStarted>(app.world()).len(), 1);
        assert_eq!(collect_events::<DamageDealt>(app.world()).len(), 1);
        assert!(app.world().get::<Dead>(entity).is_some());

        let health = app.world().get::<Health>(entity).unwrap();
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_death_disables_control_and_schedules_ragdoll() {
        let mut app = create_headless_app(42);
        let entity = app.world_mut().spawn(Character).id();

        hit(&mut app, entity, 100.0);
        run_fixed_ticks(&mut app, 1);

        let control = *app.world().get::<ControlState>(entity).unwrap();
        assert!(!control.has_control);
        assert!(!control.cursor_visible);
        assert!(!control.ragdoll);

        let sequence = collect_events::<DeathSequenceStarted>(app.world());
        let clip_name = sequence[0].clip.clone().expect("death clip picked");
        let clip = DeathAnimations::default()
            .clips
            .into_iter()
            .find(|clip| clip.name == clip_name)
            .expect("clip from the default set");
        assert_eq!(sequence[0].ragdoll_delay, clip.duration);

        // Самая длинная анимация 2.3s
        run_fixed_ticks(&mut app, 150);

        assert!(app.world().get::<ControlState>(entity).unwrap().ragdoll);
        assert_eq!(collect_events::<RagdollEnabled>(app.world()).len(), 1);
    }

    #[test]
    fn test_death_without_animations_ragdolls_immediately() {
        let mut app = create_headless_app(42);
        let entity = app
            .world_mut()
            .spawn((Character, DeathAnimations::none()))
            .id();

        hit(&mut app, entity, 100.0);
        run_fixed_ticks(&mut app, 1);

        assert!(app.world().get::<ControlState>(entity).unwrap().ragdoll);
        let sequence = collect_events::<DeathSequenceStarted>(app.world());
        assert_eq!(sequence[0].clip, None);
        assert_eq!(sequence[0].ragdoll_delay, 0.0);
    }

    #[test]
    fn test_same_seed_picks_same_death_clip() {
        let pick = |seed: u64| {
            let mut app = create_headless_app(seed);
            let entity = app.world_mut().spawn(Character).id();
            hit(&mut app, entity, 100.0);
            run_fixed_ticks(&mut app, 1);
            collect_events::<DeathSequenceStarted>(app.world())[0].clip.clone()
        };

        assert_eq!(pick(1234), pick(1234));
    }

    #[test]
    fn test_invulnerable_ignores_damage() {
        let mut app = create_headless_app(42);
        let mut effects = ActiveEffects::default();
        effects.add(StatusEffectSpec::invulnerable());
        let entity = app.world_mut().spawn((Character, effects)).id();

        hit(&mut app, entity, 500.0);
        run_fixed_ticks(&mut app, 1);

        assert_eq!(app.world().get::<Health>(entity).unwrap().current, 100.0);
        assert!(collect_events::<DamageDealt>(app.world()).is_empty());
    }

    #[test]
    fn test_radial_effect_respects_surface() {
        let mut app = create_headless_app(42);
        let flesh = app.world_mut().spawn(Character).id();
        let metal = app
            .world_mut()
            .spawn((Character, SurfaceType::Metal))
            .id();

        for target in [flesh, metal] {
            app.world_mut().send_event(DamageRequest {
                target,
                amount: 10.0,
                cause: DamageCause::Radial {
                    instigator: None,
                    effect: Some(StatusEffectSpec::burning()),
                },
            });
        }
        run_fixed_ticks(&mut app, 1);

        let burning = StatusEffectSpec::burning().name;
        assert!(app
            .world()
            .get::<ActiveEffects>(flesh)
            .unwrap()
            .contains(&burning));
        assert!(!app
            .world()
            .get::<ActiveEffects>(metal)
            .unwrap()
            .contains(&burning));

        let applied = collect_events::<StatusEffectApplied>(app.world());
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].target, flesh);
    }

    #[test]
    fn test_burning_ticks_damage_over_time() {
        let mut app = create_headless_app(42);
        let mut effects = ActiveEffects::default();
        effects.add(StatusEffectSpec::burning());
        let entity = app.world_mut().spawn((Character, effects)).id();

        // 1 секунда горения (5 dps)
        run_fixed_ticks(&mut app, 60);

        let health = app.world().get::<Health>(entity).unwrap().current;
        assert!((health - 95.0).abs() < 0.1, "health {}", health);
    }
}

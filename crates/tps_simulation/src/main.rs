//! Headless симуляция TPS combat core
//!
//! Запускает Bevy App без рендера: персонаж с винтовкой и гранатомётом
//! стреляет, перезаряжается, переключает оружие и взрывает гранату рядом с ботом.

use bevy::prelude::*;
use tps_simulation::combat::{GrenadeDetonated, GrenadeImpact, Grenade};
use tps_simulation::equipment::{AttackIntent, SwitchDirection, SwitchWeaponIntent};
use tps_simulation::{
    create_headless_app, run_fixed_ticks, ActiveWeapon, Character, Health, InventoryLedger,
    WeaponType,
};

fn main() {
    let seed = 42;
    println!("Starting TPS headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let player = app
        .world_mut()
        .spawn((
            Character,
            InventoryLedger::new()
                .with_weapon("Rifle", 30)
                .with_weapon("GrenadeLauncher", 4)
                .with_ammo(WeaponType::Rifle, 90)
                .with_ammo(WeaponType::GrenadeLauncher, 8),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ))
        .id();

    let bot = app
        .world_mut()
        .spawn((Character, Transform::from_xyz(300.0, 0.0, 0.0)))
        .id();

    // Стартовая экипировка
    run_fixed_ticks(&mut app, 1);
    print_weapon(&app, player, "equipped");

    // Очередь из винтовки (3 секунды: магазин кончится, начнётся reload)
    app.world_mut().send_event(AttackIntent {
        entity: player,
        firing: true,
    });
    run_fixed_ticks(&mut app, 180);
    print_weapon(&app, player, "after burst");

    app.world_mut().send_event(AttackIntent {
        entity: player,
        firing: false,
    });
    run_fixed_ticks(&mut app, 150);
    print_weapon(&app, player, "after reload");

    // Гранатомёт
    app.world_mut().send_event(SwitchWeaponIntent {
        entity: player,
        direction: SwitchDirection::Next,
    });
    run_fixed_ticks(&mut app, 1);
    print_weapon(&app, player, "switched");

    app.world_mut().send_event(AttackIntent {
        entity: player,
        firing: true,
    });
    run_fixed_ticks(&mut app, 1);
    app.world_mut().send_event(AttackIntent {
        entity: player,
        firing: false,
    });
    run_fixed_ticks(&mut app, 1);

    // Движок сообщает об ударе гранаты о поверхность рядом с ботом
    let grenades: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<Grenade>>()
        .iter(app.world())
        .collect();
    for grenade in grenades {
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(grenade) {
            transform.translation = Vec3::new(250.0, 0.0, 0.0);
        }
        app.world_mut().send_event(GrenadeImpact { grenade });
    }

    // Fuse 5s
    run_fixed_ticks(&mut app, 320);

    let detonations = app.world().resource::<Events<GrenadeDetonated>>().len();
    let bot_health = app
        .world()
        .get::<Health>(bot)
        .map(|health| health.current)
        .unwrap_or_default();
    println!(
        "Detonations: {}, bot health: {:.1}, entities: {}",
        detonations,
        bot_health,
        app.world().entities().len()
    );

    println!("Simulation complete!");
}

fn print_weapon(app: &App, entity: Entity, label: &str) {
    let world = app.world();
    let Some(active) = world.get::<ActiveWeapon>(entity) else {
        return;
    };
    let Some(ledger) = world.get::<InventoryLedger>(entity) else {
        return;
    };

    match active.weapon() {
        Some(weapon) => println!(
            "[{}] {} slot {}: {}/{} rounds, reloading: {}, reserve: {}",
            label,
            weapon.id(),
            active.current_index,
            weapon.rounds(),
            weapon.setting.max_rounds,
            weapon.is_reloading(),
            ledger.ammo_count(weapon.weapon_type())
        ),
        None => println!("[{}] unequipped", label),
    }
}

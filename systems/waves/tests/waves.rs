use std::time::Duration;

use glam::Vec3;
use zombie_survival_core::{Camera, Command, Event, NavigationConfig, SurvivalConfig};
use zombie_survival_system_waves::Waves;
use zombie_survival_world::{self as world, query, World};

fn flat(_: f32, _: f32) -> f32 {
    0.0
}

fn setup() -> (World, Waves) {
    let config = SurvivalConfig {
        navigation: NavigationConfig {
            world_size: 1_000.0,
            cell_size: 10.0,
            ..NavigationConfig::default()
        },
        ..SurvivalConfig::default()
    };
    let waves = Waves::new(config.waves.clone());
    let mut world = World::new(config, Box::new(flat), Vec::new()).expect("world builds");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::UpdateCamera {
            camera: Camera::new(Vec3::new(0.0, 20.0, 0.0), Vec3::NEG_Z),
        },
        &mut events,
    );
    (world, waves)
}

fn submit(world: &mut World, waves: &mut Waves, command: Command) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    loop {
        if events.is_empty() {
            break;
        }
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        waves.handle(
            &events,
            query::navigation(world),
            query::camera(world).position,
            &mut commands,
        );
        if commands.is_empty() {
            break;
        }
        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
    log
}

fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ZombieSpawned { .. }))
        .count()
}

fn run_ticks(world: &mut World, waves: &mut Waves, count: usize) {
    for _ in 0..count {
        let _ = tick(world, waves, 100);
    }
}

fn tick(world: &mut World, waves: &mut Waves, millis: u64) -> Vec<Event> {
    submit(
        world,
        waves,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
    )
}

fn kill_everything(world: &mut World, waves: &mut Waves) -> Vec<Event> {
    let mut log = Vec::new();
    for zombie in query::tracked_zombies(world) {
        log.extend(submit(
            world,
            waves,
            Command::DamageZombie {
                zombie,
                amount: 100,
            },
        ));
    }
    log
}

#[test]
fn started_wave_trickles_in_one_zombie_per_stagger() {
    let (mut world, mut waves) = setup();
    let started = submit(&mut world, &mut waves, Command::StartWave);
    assert!(started.contains(&Event::WaveStarted {
        wave: 1,
        zombies: 10,
    }));

    let mut spawned_per_tick = Vec::new();
    for _ in 0..12 {
        let events = tick(&mut world, &mut waves, 100);
        spawned_per_tick.push(spawned(&events));
    }

    assert_eq!(spawned_per_tick, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
    assert_eq!(query::tracked_zombies(&world).len(), 10);
    assert_eq!(query::game_state(&world).zombies_remaining(), 10);
    for zombie in query::zombie_view(&world).iter() {
        let distance = Vec3::new(zombie.position.x, 0.0, zombie.position.z).length();
        assert!((299.9..=450.1).contains(&distance), "spawned at {distance}");
    }
}

#[test]
fn cleared_wave_advances_after_the_intermission() {
    let (mut world, mut waves) = setup();
    let _ = submit(&mut world, &mut waves, Command::StartWave);
    run_ticks(&mut world, &mut waves, 20);

    let events = kill_everything(&mut world, &mut waves);
    let completions = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCompleted { wave: 1 }))
        .count();
    assert_eq!(completions, 1);

    let early = tick(&mut world, &mut waves, 4_000);
    assert!(!early
        .iter()
        .any(|event| matches!(event, Event::WaveStarted { .. })));

    let next = tick(&mut world, &mut waves, 1_000);
    assert!(next.contains(&Event::WaveStarted {
        wave: 2,
        zombies: 15,
    }));
    assert_eq!(query::game_state(&world).current_wave(), 2);
}

#[test]
fn restart_begins_again_from_the_first_wave() {
    let (mut world, mut waves) = setup();
    let _ = submit(&mut world, &mut waves, Command::StartWave);
    let _ = tick(&mut world, &mut waves, 300);

    let events = submit(&mut world, &mut waves, Command::RestartGame);

    assert!(events.contains(&Event::GameReset));
    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        zombies: 10,
    }));
    run_ticks(&mut world, &mut waves, 20);
    assert_eq!(query::tracked_zombies(&world).len(), 10);
}

#[test]
fn frame_hitch_releases_one_zombie_at_a_time() {
    let (mut world, mut waves) = setup();
    let _ = submit(&mut world, &mut waves, Command::StartWave);

    let hitch = tick(&mut world, &mut waves, 5_000);
    assert_eq!(spawned(&hitch), 1);

    let mut total = 1;
    for _ in 0..9 {
        let events = tick(&mut world, &mut waves, 16);
        assert!(spawned(&events) <= 1);
        total += spawned(&events);
    }
    assert!(total < 10, "hitch released the whole wave");
    assert_eq!(query::tracked_zombies(&world).len(), total);
}

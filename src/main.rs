//! Headless demo driver
//!
//! Runs a scripted session at a fixed 16ms frame time and prints the HUD
//! line whenever it changes. Useful for eyeballing spawn pacing and scoring
//! without a renderer attached.
//!
//! Usage: `coindash [seed] [tuning.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use coindash::assets::SpriteStore;
use coindash::scene::build_frame;
use coindash::sim::{tick, GameEvent, GameState, TickInput};
use coindash::Tuning;

const FRAME_MS: f64 = 16.0;
const DEMO_FRAMES: u32 = 3_600; // roughly a minute of play

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x5eed)
        });

    let tuning = match args.next() {
        Some(path) => {
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("cannot read tuning file {path}: {e}");
                    std::process::exit(1);
                }
            };
            match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    eprintln!("invalid tuning file {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };

    let mut state = match GameState::with_tuning(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("invalid tuning: {e}");
            std::process::exit(1);
        }
    };
    let sprites = SpriteStore::new();
    for kind in sprites.missing_kinds() {
        log::warn!("no sprite registered for {kind:?}, using placeholder");
    }

    log::info!("demo run, seed {seed}");
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        FRAME_MS,
    );

    let mut last_hud = None;
    for frame in 0..DEMO_FRAMES {
        // Scripted input: jog right, hop every second, sprint in bursts
        let input = TickInput {
            right: frame % 240 < 180,
            left: frame % 240 >= 200,
            run: frame % 480 < 120,
            jump_pressed: frame % 60 == 0,
            jump_released: frame % 60 == 25,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);

        for event in state.take_events() {
            match event {
                GameEvent::SessionStarted => log::info!("session started"),
                GameEvent::SessionEnded => log::info!("session ended"),
            }
        }

        let scene = build_frame(&state, &sprites);
        if scene.hud != last_hud {
            if let Some(hud) = scene.hud {
                println!(
                    "[{:>6.0}ms] lives {} coins {} points {}",
                    state.clock_ms, hud.lives, hud.coins, hud.points
                );
            }
            last_hud = scene.hud;
        }

        if state.is_game_over() {
            println!("game over at {:.0}ms", state.clock_ms);
            break;
        }
    }

    if let Some(player) = &state.player {
        println!(
            "final: {} points, {} lives, {} enemies faced",
            player.points, player.lives, state.enemies_spawned_total
        );
    }
}

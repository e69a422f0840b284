//! Maze Gunner entry point
//!
//! Runs a headless demo: the autopilot plays the campaign at a fixed timestep
//! while events are logged and sound effects are dispatched to a silent
//! backend. Usage: `maze-gunner [CONFIG.json] [--seed N] [--seconds N]`.

use anyhow::{Context, Result, bail};

use maze_gunner::audio::AudioManager;
use maze_gunner::consts::SIM_DT;
use maze_gunner::renderer::{Framebuffer, render_frame};
use maze_gunner::sim::{GameEvent, GameState, SessionPhase, autopilot_input, tick};
use maze_gunner::{GameConfig, Hud};

struct Options {
    config: Option<String>,
    seed: u64,
    seconds: f32,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        config: None,
        seed: 1,
        seconds: 300.0,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                options.seed = value.parse().with_context(|| format!("bad seed {value:?}"))?;
            }
            "--seconds" => {
                let value = args.next().context("--seconds needs a value")?;
                options.seconds = value
                    .parse()
                    .with_context(|| format!("bad duration {value:?}"))?;
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => options.config = Some(path.to_string()),
        }
    }
    Ok(options)
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Maze Gunner (headless demo) starting...");

    let options = parse_args()?;
    let config = match &options.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };

    let mut state = GameState::new(options.seed, config);
    let mut audio: AudioManager = AudioManager::default();
    let steps = (options.seconds / SIM_DT).ceil() as u64;
    let mut games_won = 0;

    for _ in 0..steps {
        let input = autopilot_input(&state);
        tick(&mut state, &input, SIM_DT);

        let events = state.drain_events();
        audio.handle_events(&events);
        for event in &events {
            match event {
                GameEvent::LevelComplete { .. } | GameEvent::TimedOut => {
                    log::info!("{}", Hud::from_state(&state).status_line());
                }
                GameEvent::GameComplete { final_score } => {
                    games_won += 1;
                    log::info!("Campaign won with {final_score} kills");
                }
                _ => {}
            }
        }

        if matches!(state.phase, SessionPhase::GameComplete { .. }) {
            break;
        }
    }

    let frame = render_frame(&state, state.viewport);
    let mut framebuffer = Framebuffer::new(frame.width, frame.height);
    framebuffer.draw_frame(&frame);
    log::debug!(
        "Final frame: {} wall stripes, {} sprites, {} bytes",
        frame.walls.len(),
        frame.sprites.len(),
        framebuffer.as_bytes().len()
    );

    let hud = Hud::from_state(&state);
    println!("{}", hud.status_line());
    if let Some(overlay) = hud.overlay() {
        println!("{}", overlay.title);
        for line in &overlay.lines {
            println!("  {line}");
        }
    }
    println!("Simulated {} ticks, campaigns won: {}", state.time_ticks, games_won);
    Ok(())
}

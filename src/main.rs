use anyhow::{Context, Result};
use glam::Vec2;
use log::info;

use vortex_runner::engine::game_loop::FIXED_TIMESTEP;
use vortex_runner::engine::input::{Action, PlayerInput};
use vortex_runner::game::characters::CharacterKind;
use vortex_runner::game::scene::Scene;

/// Scripted input: (frame, action, pressed)
const SCRIPT: &[(u32, Action, bool)] = &[
    // Jump and drift right into the wall
    (30, Action::MoveRight, true),
    (30, Action::Jump, true),
    (75, Action::Jump, false),
    (80, Action::MoveRight, false),
    // Hang on until the cling runs out, then become fire
    (300, Action::SwitchFire, true),
    (301, Action::SwitchFire, false),
    // Back off, then leap at the wall again
    (320, Action::MoveLeft, true),
    (360, Action::MoveLeft, false),
    (380, Action::MoveRight, true),
    (380, Action::Jump, true),
    (400, Action::Jump, false),
    // Wall-jump away
    (480, Action::Jump, true),
    (481, Action::Jump, false),
    (481, Action::MoveRight, false),
    // Throw a vortex toward the wall and rise through it
    (520, Action::SpawnVortex, true),
    (521, Action::SpawnVortex, false),
    (540, Action::Ascend, true),
    (600, Action::Ascend, false),
];

const TOTAL_FRAMES: u32 = 900;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Vortex Runner (headless)...");

    let mut scene = Scene::new(CharacterKind::Air, Vec2::new(0.0, 1.5))
        .context("failed to build the demo scene")?;
    scene.add_ground(Vec2::new(0.0, 0.0), Vec2::new(40.0, 1.0));
    scene.add_wall(Vec2::new(6.0, 5.0), Vec2::new(1.0, 10.0));

    let mut input = PlayerInput::new(0);
    let mut last_state = None;

    for frame in 0..TOTAL_FRAMES {
        for &(at, action, pressed) in SCRIPT.iter().filter(|(at, ..)| *at == frame) {
            info!("frame {}: {:?} {}", at, action, if pressed { "down" } else { "up" });
            if pressed {
                input.press(action);
            } else {
                input.release(action);
            }
        }

        scene.frame(&input, FIXED_TIMESTEP);
        input.update();

        let character = scene
            .active_character()
            .context("the followed character disappeared")?;
        let state = character.state();
        if last_state != Some(state) {
            let position = character.position(scene.physics()).unwrap_or_default();
            info!(
                "frame {}: {} character {} is {:?} at ({:.2}, {:.2})",
                frame,
                character.kind.name(),
                character.id,
                state,
                position.x,
                position.y
            );
            last_state = Some(state);
        }
    }

    let stepper = scene.stepper();
    info!(
        "Done: {} frames, {} fixed steps, {:.2}s simulated, render alpha {:.2}",
        stepper.frame_count(),
        stepper.update_count(),
        stepper.simulated_secs(),
        stepper.alpha()
    );

    Ok(())
}

use bevy::prelude::*;
use bevy::window::WindowResolution;
use scrubdown::config::{self, CleaningConfig};
use scrubdown::engine::Simulation;
use scrubdown::rendering;
use scrubdown::simulation::{self, CleaningPlugin, CleaningSim};

/// Build the simulation from the loaded config.  The window was sized from
/// the same config, so cursor and world coordinates agree.
fn spawn_simulation(mut commands: Commands, config: Res<CleaningConfig>) {
    let sim = match Simulation::new(config.clone()) {
        Ok(sim) => sim,
        Err(e) => {
            error!("cannot start simulation: {e}");
            return;
        }
    };
    let stats = sim.stats();
    info!(
        "✓ Simulation ready: {} particles on a {:.0}×{:.0} object",
        stats.live_particles,
        sim.bounds().width,
        sim.bounds().height
    );
    commands.insert_resource(CleaningSim(sim));
}

fn main() {
    // Loaded before the app is built: the window and the simulation must agree
    // on the world size.
    let config = config::load_cleaning_config(config::CONFIG_PATH);
    let (width, height) = config.window_resolution();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Scrubdown".into(),
                resolution: WindowResolution::new(width, height),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.12, 0.12, 0.16)))
        .insert_resource(config)
        .add_plugins(CleaningPlugin)
        .add_systems(
            Startup,
            (
                rendering::setup_camera,
                rendering::setup_progress_hud,
                spawn_simulation,
            ),
        )
        .add_systems(
            PreUpdate,
            (
                simulation::pointer_input_system,
                simulation::tool_hotkey_system,
            )
                .after(bevy::input::InputSystems),
        )
        .add_systems(
            Update,
            (
                rendering::particle_gizmo_system,
                rendering::hose_gizmo_system,
                rendering::progress_display_system,
                rendering::completion_log_system,
            )
                .after(simulation::simulation_tick_system),
        )
        .add_systems(Last, simulation::destroy_on_exit_system)
        .run();
}

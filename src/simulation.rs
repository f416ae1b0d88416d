//! Bevy glue: the cleaning plugin, its resources, messages and systems.
//!
//! The simulation itself is plain data ([`Simulation`]); this module wraps it
//! in a [`Resource`], feeds it pointer input once per frame and turns its tick
//! reports into messages other systems can react to.

use crate::engine::{ActiveTool, Simulation, TickInput};
use bevy::input::ButtonInput;
use bevy::prelude::*;

/// The running simulation.  Insert it before the first `Update`; the plugin
/// idles while it is absent.
#[derive(Resource)]
pub struct CleaningSim(pub Simulation);

/// Pointer state in world coordinates (top-left origin, y down).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub pressed: bool,
}

/// Per-frame counters for the HUD.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CleaningStats {
    pub live_particles: usize,
    pub progress: f32,
    pub using_hose: bool,
    pub completed: bool,
    pub last_tool: ActiveTool,
    pub released_total: usize,
}

/// Fired once per session when progress first reaches the completion threshold.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CleaningComplete {
    pub progress: f32,
}

/// Fired when progress moved noticeably since the last notification.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdated {
    pub progress: f32,
}

/// Commands from the UI to the simulation.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRequest {
    SetHose(bool),
    ToggleHose,
    ResetDirt,
}

pub struct CleaningPlugin;

impl Plugin for CleaningPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .init_resource::<CleaningStats>()
            .add_message::<CleaningComplete>()
            .add_message::<ProgressUpdated>()
            .add_message::<ToolRequest>()
            .add_systems(
                Update,
                (tool_request_system, simulation_tick_system).chain(),
            );
    }
}

/// Apply hose toggles and resets before the frame's tick.
pub fn tool_request_system(
    mut requests: MessageReader<ToolRequest>,
    sim: Option<ResMut<CleaningSim>>,
    mut stats: ResMut<CleaningStats>,
) {
    let Some(mut sim) = sim else {
        requests.clear();
        return;
    };
    for request in requests.read() {
        match *request {
            ToolRequest::SetHose(on) => sim.0.toggle_hose(on),
            ToolRequest::ToggleHose => {
                let on = !sim.0.using_hose();
                sim.0.toggle_hose(on);
            }
            ToolRequest::ResetDirt => {
                sim.0.reset_dirt();
                stats.completed = false;
                stats.released_total = 0;
            }
        }
    }
}

/// Advance the simulation by the frame delta and publish its outcome.
pub fn simulation_tick_system(
    time: Res<Time>,
    pointer: Res<PointerInput>,
    sim: Option<ResMut<CleaningSim>>,
    mut stats: ResMut<CleaningStats>,
    mut completed: MessageWriter<CleaningComplete>,
    mut progressed: MessageWriter<ProgressUpdated>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    let input = TickInput {
        pointer: pointer.position,
        pointer_pressed: pointer.pressed,
        time: time.elapsed_secs_f64(),
    };
    let report = sim.0.tick(time.delta_secs(), &input);

    if report.progress_changed {
        progressed.write(ProgressUpdated {
            progress: report.progress,
        });
    }
    if report.completed_now {
        completed.write(CleaningComplete {
            progress: report.progress,
        });
    }

    let snapshot = sim.0.stats();
    stats.live_particles = snapshot.live_particles;
    stats.progress = snapshot.progress;
    stats.using_hose = snapshot.using_hose;
    stats.completed = sim.0.is_completed();
    stats.last_tool = report.tool;
    stats.released_total += report.released;
}

/// Sample the primary window's cursor and left mouse button.
///
/// Window cursor coordinates are already top-left, y down, which is the
/// simulation's world convention.
pub fn pointer_input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut pointer: ResMut<PointerInput>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    match window.cursor_position() {
        Some(cursor_pos) => {
            pointer.position = cursor_pos;
            pointer.pressed = buttons.pressed(MouseButton::Left);
        }
        None => pointer.pressed = false,
    }
}

/// `H` toggles the hose, `R` respawns the dirt.
pub fn tool_hotkey_system(keys: Res<ButtonInput<KeyCode>>, mut requests: MessageWriter<ToolRequest>) {
    if keys.just_pressed(KeyCode::KeyH) {
        requests.write(ToolRequest::ToggleHose);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        requests.write(ToolRequest::ResetDirt);
    }
}

/// Release every particle when the app shuts down.
pub fn destroy_on_exit_system(mut exit: MessageReader<AppExit>, sim: Option<ResMut<CleaningSim>>) {
    if exit.read().next().is_none() {
        return;
    }
    if let Some(mut sim) = sim {
        sim.0.destroy();
    }
}

//! Demo presentation: camera, gizmo drawing and the progress HUD.
//!
//! | Layer        | Kind   | Source                  |
//! |--------------|--------|-------------------------|
//! | Object frame | Gizmos | `Simulation::bounds`    |
//! | Particles    | Gizmos | `Simulation::particles` |
//! | Hose         | Gizmos | nozzle → pointer        |
//! | Progress HUD | UI     | [`CleaningStats`]       |

use crate::config::CleaningConfig;
use crate::material::ParticleShape;
use crate::simulation::{CleaningComplete, CleaningSim, CleaningStats, PointerInput};
use bevy::prelude::*;

const HUD_FONT_SIZE: f32 = 18.0;

/// Marker for the progress text node.
#[derive(Component)]
pub struct ProgressTextDisplay;

/// Default Camera2d centred on the world.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("✓ Camera spawned");
}

/// World (top-left origin, y down) → camera space (centre origin, y up).
fn to_screen(world: Vec2, config: &CleaningConfig) -> Vec2 {
    Vec2::new(
        world.x - config.world_width * 0.5,
        config.world_height * 0.5 - world.y,
    )
}

// ── Startup: HUD ──────────────────────────────────────────────────────────────

pub fn setup_progress_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ProgressTextDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Clean: 0%"),
                TextFont {
                    font_size: HUD_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });
}

// ── Update: HUD ───────────────────────────────────────────────────────────────

pub fn progress_display_system(
    stats: Res<CleaningStats>,
    parent_query: Query<&Children, With<ProgressTextDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !stats.is_changed() {
        return;
    }
    let tool = if stats.using_hose { "hose" } else { "scrub" };
    let status = if stats.completed { " | CLEAN!" } else { "" };
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format!(
                    "Clean: {:.0}% | Particles: {} | Tool: {} (H) | Reset (R){}",
                    stats.progress * 100.0,
                    stats.live_particles,
                    tool,
                    status
                ));
            }
        }
    }
}

pub fn completion_log_system(mut complete: MessageReader<CleaningComplete>) {
    for msg in complete.read() {
        info!("✓ Object cleaned ({:.1}%)", msg.progress * 100.0);
    }
}

// ── Update: gizmos ────────────────────────────────────────────────────────────

pub fn particle_gizmo_system(
    mut gizmos: Gizmos,
    sim: Option<Res<CleaningSim>>,
    config: Res<CleaningConfig>,
) {
    let Some(sim) = sim else {
        return;
    };
    let bounds = sim.0.bounds();
    gizmos.rect_2d(
        to_screen(bounds.center(), &config),
        Vec2::new(bounds.width, bounds.height),
        Color::srgba(1.0, 1.0, 1.0, 0.4),
    );

    for view in sim.0.particles() {
        let pos = to_screen(view.pos, &config);
        let half = view.size * 0.5;
        match view.shape {
            ParticleShape::Circle => {
                gizmos.circle_2d(pos, half, view.color);
            }
            ParticleShape::Square => {
                gizmos.rect_2d(pos, Vec2::splat(view.size), view.color);
            }
            ParticleShape::Blob => {
                gizmos.ellipse_2d(pos, Vec2::new(half * 1.2, half * 0.9), view.color);
            }
        }
    }
}

pub fn hose_gizmo_system(
    mut gizmos: Gizmos,
    sim: Option<Res<CleaningSim>>,
    pointer: Res<PointerInput>,
    config: Res<CleaningConfig>,
) {
    let Some(sim) = sim else {
        return;
    };
    if !sim.0.using_hose() {
        return;
    }
    let nozzle = to_screen(sim.0.nozzle(), &config);
    gizmos.circle_2d(nozzle, 6.0, Color::srgb(0.3, 0.6, 1.0));
    if pointer.pressed {
        gizmos.line_2d(
            nozzle,
            to_screen(pointer.position, &config),
            Color::srgba(0.4, 0.7, 1.0, 0.6),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_corners_map_to_camera_space() {
        let config = CleaningConfig::default();
        assert_eq!(
            to_screen(Vec2::ZERO, &config),
            Vec2::new(-config.world_width * 0.5, config.world_height * 0.5)
        );
        assert_eq!(
            to_screen(
                Vec2::new(config.world_width * 0.5, config.world_height * 0.5),
                &config
            ),
            Vec2::ZERO
        );
    }
}

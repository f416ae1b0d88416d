//! The object being cleaned: its world rectangle and the named presets.

use crate::error::{validate_bounds, SimResult};
use bevy::prelude::*;

/// World-space rectangle of the cleaning object.
///
/// Particles live in object-local space, with the origin at the rectangle's
/// centre; [`ObjectBounds::to_world`] and [`ObjectBounds::to_local`] convert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectBounds {
    /// Top-left corner, world units.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ObjectBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> SimResult<Self> {
        validate_bounds(width, height)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Rectangle of `width × height` centred in a `world_w × world_h` world.
    pub fn centered_in(world_w: f32, world_h: f32, width: f32, height: f32) -> SimResult<Self> {
        Self::new(
            (world_w - width) * 0.5,
            (world_h - height) * 0.5,
            width,
            height,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn max_extent(&self) -> f32 {
        self.width.max(self.height)
    }

    pub fn to_world(&self, local: Vec2) -> Vec2 {
        local + self.center()
    }

    pub fn to_local(&self, world: Vec2) -> Vec2 {
        world - self.center()
    }
}

/// A named object preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningObject {
    pub id: &'static str,
    pub name: &'static str,
    /// Width over height.
    pub aspect_ratio: f32,
    /// Base size in pixels for the smallest screen.
    pub base_size: f32,
    /// 0–1, how hard the object is to clean.
    pub difficulty: f32,
}

pub const CLEANING_OBJECTS: [CleaningObject; 3] = [
    CleaningObject {
        id: "vintage_photo",
        name: "Vintage Photo",
        aspect_ratio: 1.4,
        base_size: 320.0,
        difficulty: 0.6,
    },
    CleaningObject {
        id: "business_card",
        name: "Business Card",
        aspect_ratio: 1.75,
        base_size: 280.0,
        difficulty: 0.3,
    },
    CleaningObject {
        id: "trading_card",
        name: "Trading Card",
        aspect_ratio: 0.7,
        base_size: 300.0,
        difficulty: 0.8,
    },
];

pub fn cleaning_object(id: &str) -> Option<&'static CleaningObject> {
    CLEANING_OBJECTS.iter().find(|o| o.id == id)
}

/// Long side of the object for a screen of the given width.
pub fn object_size_for_screen(base_size: f32, screen_width: f32) -> f32 {
    if screen_width >= 1080.0 {
        (base_size * 2.8).max(900.0)
    } else if screen_width >= 900.0 {
        (base_size * 1.6).max(450.0)
    } else {
        (base_size * 1.2).max(380.0)
    }
}

impl CleaningObject {
    /// `(width, height)` for a screen, keeping the aspect ratio with the long
    /// side at [`object_size_for_screen`].
    pub fn dimensions_for_screen(&self, screen_width: f32) -> (f32, f32) {
        let long = object_size_for_screen(self.base_size, screen_width);
        if self.aspect_ratio >= 1.0 {
            (long, long / self.aspect_ratio)
        } else {
            (long * self.aspect_ratio, long)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_bounds_round_trip_local_world() {
        let b = ObjectBounds::centered_in(1200.0, 800.0, 300.0, 200.0).unwrap();
        assert_eq!(b.center(), Vec2::new(600.0, 400.0));
        let local = Vec2::new(-10.0, 25.0);
        assert_eq!(b.to_local(b.to_world(local)), local);
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(ObjectBounds::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(ObjectBounds::new(0.0, 0.0, 10.0, f32::INFINITY).is_err());
    }

    #[test]
    fn screen_size_breakpoints() {
        assert_eq!(object_size_for_screen(300.0, 1200.0), 900.0);
        assert_eq!(object_size_for_screen(400.0, 1080.0), 1120.0);
        assert_eq!(object_size_for_screen(300.0, 950.0), 480.0);
        assert_eq!(object_size_for_screen(300.0, 600.0), 380.0);
    }

    #[test]
    fn portrait_objects_keep_long_side_vertical() {
        let card = cleaning_object("trading_card").unwrap();
        let (w, h) = card.dimensions_for_screen(600.0);
        assert!(h > w);
        assert!((w / h - 0.7).abs() < 1e-5);
    }
}

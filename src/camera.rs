//! Camera
//!
//! Viewport placement for the renderer. Pure: same inputs, same offsets.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;

/// World coordinate shown at the top-left corner of the screen.
///
/// Negative on an axis where the zone is smaller than the screen, which
/// centres the zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal offset in pixels
    pub x: f64,
    /// Vertical offset in pixels
    pub y: f64,
}

impl Viewport {
    /// Screen position of a world point.
    #[inline]
    pub fn to_screen(self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.x, world.y - self.y)
    }
}

/// Offset on one axis.
fn axis(zone: f64, view: f64, focus: f64) -> f64 {
    if zone < view {
        return (zone - view) / 2.0;
    }
    (focus - view / 2.0).clamp(0.0, zone - view)
}

/// Viewport for a zone of `zone` pixels on a screen of `view` pixels,
/// following `focus` (normally the player).
pub fn viewport(zone: (f64, f64), view: (f64, f64), focus: Vec2) -> Viewport {
    Viewport {
        x: axis(zone.0, view.0, focus.x),
        y: axis(zone.1, view.1, focus.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEW: (f64, f64) = (960.0, 640.0);

    #[test]
    fn test_small_zone_is_centred() {
        let v = viewport((320.0, 320.0), VIEW, Vec2::new(10.0, 300.0));
        assert_eq!(v, Viewport { x: -320.0, y: -160.0 });
        // Focus doesn't matter.
        assert_eq!(v, viewport((320.0, 320.0), VIEW, Vec2::new(200.0, 5.0)));
    }

    #[test]
    fn test_follows_and_clamps() {
        let zone = (3200.0, 1600.0);
        assert_eq!(viewport(zone, VIEW, Vec2::new(1600.0, 800.0)), Viewport { x: 1120.0, y: 480.0 });
        assert_eq!(viewport(zone, VIEW, Vec2::new(16.0, 16.0)), Viewport { x: 0.0, y: 0.0 });
        assert_eq!(viewport(zone, VIEW, Vec2::new(3190.0, 1590.0)), Viewport { x: 2240.0, y: 960.0 });
    }

    #[test]
    fn test_mixed_axes() {
        let v = viewport((2000.0, 320.0), VIEW, Vec2::new(1000.0, 100.0));
        assert_eq!(v, Viewport { x: 520.0, y: -160.0 });
        assert_eq!(v.to_screen(Vec2::new(1000.0, 100.0)), Vec2::new(480.0, 260.0));
    }

    proptest! {
        #[test]
        fn test_view_stays_inside_zone(
            zw in 1.0f64..5000.0,
            zh in 1.0f64..5000.0,
            fx in -100.0f64..5100.0,
            fy in -100.0f64..5100.0,
        ) {
            let v = viewport((zw, zh), VIEW, Vec2::new(fx, fy));
            if zw >= VIEW.0 {
                prop_assert!(v.x >= 0.0 && v.x + VIEW.0 <= zw + 1e-9);
            } else {
                prop_assert!((v.x - (zw - VIEW.0) / 2.0).abs() < 1e-9);
            }
            if zh >= VIEW.1 {
                prop_assert!(v.y >= 0.0 && v.y + VIEW.1 <= zh + 1e-9);
            } else {
                prop_assert!((v.y - (zh - VIEW.1) / 2.0).abs() < 1e-9);
            }
        }
    }
}

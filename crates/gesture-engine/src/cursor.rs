//! Iris-to-screen cursor mapping and the hot zone

use crate::config::ScreenConfig;
use crate::eye::Point2D;

/// Absolute screen position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

/// Bottom-left screen rectangle bound to the tab-close action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotZone {
    /// Cursor x must be strictly below this
    pub max_x: f32,
    /// Cursor y must be strictly above this
    pub min_y: f32,
}

/// Height of the hot zone strip above the bottom screen edge (pixels)
pub const HOT_ZONE_HEIGHT: f32 = 100.0;

impl HotZone {
    /// Left quarter of the screen, bottom 100 pixels
    pub fn for_screen(screen: &ScreenConfig) -> Self {
        Self {
            max_x: screen.width as f32 / 4.0,
            min_y: screen.height as f32 - HOT_ZONE_HEIGHT,
        }
    }

    pub fn contains(&self, cursor: CursorPosition) -> bool {
        (cursor.x as f32) < self.max_x && (cursor.y as f32) > self.min_y
    }
}

/// Stateless linear mapping from iris position to screen coordinates
#[derive(Debug, Clone, Copy)]
pub struct CursorMapper {
    screen: ScreenConfig,
    hot_zone: HotZone,
}

impl CursorMapper {
    pub fn new(screen: ScreenConfig) -> Self {
        Self {
            hot_zone: HotZone::for_screen(&screen),
            screen,
        }
    }

    /// Average both irises in frame pixels, then scale to the screen.
    /// Points far outside the frame saturate instead of wrapping.
    pub fn map(&self, left: Point2D, right: Point2D, frame_width: u32, frame_height: u32) -> CursorPosition {
        let avg = |l: f32, r: f32, dim: u32| {
            let l_px = i64::from((l * dim as f32) as i32);
            let r_px = i64::from((r * dim as f32) as i32);
            (l_px + r_px).div_euclid(2)
        };

        let eye_x = avg(left.x, right.x, frame_width);
        let eye_y = avg(left.y, right.y, frame_height);

        CursorPosition {
            x: scale(eye_x, frame_width, self.screen.width),
            y: scale(eye_y, frame_height, self.screen.height),
        }
    }

    /// Hot zone predicate for a mapped cursor
    pub fn in_hot_zone(&self, cursor: CursorPosition) -> bool {
        self.hot_zone.contains(cursor)
    }
}

fn scale(px: i64, frame_dim: u32, screen_dim: u32) -> i32 {
    if frame_dim == 0 {
        return 0;
    }
    ((px as f64 / frame_dim as f64) * screen_dim as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mapper() -> CursorMapper {
        CursorMapper::new(ScreenConfig::default())
    }

    fn pt(x: f32, y: f32) -> Point2D {
        Point2D { x, y }
    }

    #[test]
    fn test_origin_maps_to_origin() {
        let c = mapper().map(pt(0.0, 0.0), pt(0.0, 0.0), 640, 480);
        assert_eq!(c, CursorPosition { x: 0, y: 0 });
    }

    #[test]
    fn test_far_corner_maps_to_screen_size() {
        let c = mapper().map(pt(1.0, 1.0), pt(1.0, 1.0), 640, 480);
        assert_eq!(c, CursorPosition { x: 1920, y: 1080 });
    }

    #[test]
    fn test_center_maps_to_center() {
        let c = mapper().map(pt(0.4, 0.5), pt(0.6, 0.5), 640, 480);
        assert_eq!(c, CursorPosition { x: 960, y: 540 });
    }

    #[test]
    fn test_out_of_frame_iris_saturates() {
        let m = mapper();
        let far = m.map(pt(1.0e7, 0.5), pt(1.0e7, 0.5), 640, 480);
        assert_eq!(far, CursorPosition { x: i32::MAX, y: 540 });

        let c = m.map(pt(f32::MAX, -f32::MAX), pt(f32::MAX, -f32::MAX), 640, 480);
        assert_eq!(c, CursorPosition { x: i32::MAX, y: i32::MIN });
    }

    #[test]
    fn test_hot_zone_bounds() {
        let m = mapper();
        assert!(m.in_hot_zone(CursorPosition { x: 1920 / 8, y: 1080 - 50 }));
        assert!(!m.in_hot_zone(CursorPosition { x: 1920 / 2, y: 1080 - 50 }));
        assert!(!m.in_hot_zone(CursorPosition { x: 1920 / 8, y: 1080 - 100 }));
        assert!(!m.in_hot_zone(CursorPosition { x: 480, y: 1079 }));
    }

    proptest! {
        #[test]
        fn prop_mapping_monotonic(
            a in 0.0f32..=1.0, b in 0.0f32..=1.0,
            w in 64u32..2000, h in 64u32..2000,
        ) {
            let m = mapper();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let c_lo = m.map(pt(lo, lo), pt(lo, lo), w, h);
            let c_hi = m.map(pt(hi, hi), pt(hi, hi), w, h);
            prop_assert!(c_lo.x <= c_hi.x);
            prop_assert!(c_lo.y <= c_hi.y);
        }

        #[test]
        fn prop_mapping_within_screen(x in 0.0f32..=1.0, y in 0.0f32..=1.0) {
            let c = mapper().map(pt(x, y), pt(x, y), 640, 480);
            prop_assert!((0..=1920).contains(&c.x));
            prop_assert!((0..=1080).contains(&c.y));
        }

        #[test]
        fn prop_mapping_linear_within_pixel(x in 0.0f32..=1.0) {
            // One frame pixel spans 3 screen pixels at 640 -> 1920
            let c = mapper().map(pt(x, 0.0), pt(x, 0.0), 640, 480);
            let ideal = x as f64 * 1920.0;
            prop_assert!((c.x as f64 - ideal).abs() <= 4.0);
        }
    }
}

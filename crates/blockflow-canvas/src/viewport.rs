use blockflow_graphics::Point;

/// Pan and zoom of the canvas inside its container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Point,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan.x,
            canvas.y * self.zoom + self.pan.y,
        )
    }

    /// Sets `zoom` while keeping the canvas point under `pivot` in place.
    pub fn zoom_about(&mut self, pivot: Point, zoom: f32) {
        let anchored = self.to_canvas(pivot);
        self.zoom = zoom;
        self.pan = Point::new(pivot.x - anchored.x * zoom, pivot.y - anchored.y * zoom);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan = self.pan.offset(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut viewport = Viewport {
            pan: Point::new(30.0, -10.0),
            zoom: 1.2,
        };
        let pivot = Point::new(200.0, 150.0);
        let before = viewport.to_canvas(pivot);
        viewport.zoom_about(pivot, 2.0);
        let after = viewport.to_canvas(pivot);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
        assert_eq!(viewport.zoom, 2.0);
    }

    #[test]
    fn screen_and_canvas_are_inverse() {
        let viewport = Viewport {
            pan: Point::new(12.0, 8.0),
            zoom: 0.5,
        };
        let canvas = Point::new(100.0, 40.0);
        assert_eq!(viewport.to_screen(canvas), Point::new(62.0, 28.0));
        assert_eq!(viewport.to_canvas(Point::new(62.0, 28.0)), canvas);
    }
}

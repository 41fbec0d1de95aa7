use raqote::{DrawOptions, DrawTarget, PathBuilder, SolidSource, Source};

use crate::color::Rgba;
use crate::math::pi;
use crate::raster::Raster;

/// A filled primitive in image-space pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A closed polygon; needs at least three vertices to cover anything.
    Polygon(Vec<(f64, f64)>),
    Circle { center: (f64, f64), radius: f64 },
}

/// Anti-aliased drawing surface prefilled with a background color.
pub struct Canvas {
    dt: DrawTarget,
    foreground: SolidSource,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba, foreground: Rgba) -> Self {
        let mut dt = DrawTarget::new(width as i32, height as i32);
        dt.clear(background.to_source());
        Canvas {
            dt,
            foreground: foreground.to_source(),
        }
    }

    /// Fills `shape` with the foreground color. Degenerate shapes draw nothing.
    pub fn fill(&mut self, shape: &Shape) {
        let mut pb = PathBuilder::new();
        match shape {
            Shape::Polygon(points) => {
                if points.len() < 3 {
                    return;
                }
                let (x, y) = points[0];
                pb.move_to(x as f32, y as f32);
                for &(x, y) in &points[1..] {
                    pb.line_to(x as f32, y as f32);
                }
                pb.close();
            }
            &Shape::Circle {
                center: (x, y),
                radius,
            } => {
                if radius.is_nan() || radius <= 0.0 {
                    return;
                }
                pb.move_to((x + radius) as f32, y as f32);
                pb.arc(x as f32, y as f32, radius as f32, 0.0, pi(2.0) as f32);
                pb.close();
            }
        }
        let path = pb.finish();
        self.dt.fill(
            &path,
            &Source::Solid(self.foreground),
            &DrawOptions::new(),
        );
    }

    pub fn fill_all<'a>(&mut self, shapes: impl IntoIterator<Item = &'a Shape>) {
        for shape in shapes {
            self.fill(shape);
        }
    }

    /// Copies the surface out as straight-alpha RGBA.
    pub fn into_raster(self) -> Raster {
        let (width, height) = (self.dt.width() as u32, self.dt.height() as u32);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for &px in self.dt.get_data() {
            let [b, g, r, a] = px.to_le_bytes();
            data.extend_from_slice(&unpremultiply(r, g, b, a).to_bytes());
        }
        Raster::from_raw(width, height, data)
    }
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    match a {
        0 => Rgba::TRANSPARENT,
        255 => Rgba::new(r, g, b, a),
        _ => {
            let channel = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
            Rgba::new(channel(r), channel(g), channel(b), a)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_background_only() {
        let canvas = Canvas::new(4, 3, Rgba::opaque(10, 20, 30), Rgba::BLACK);
        let raster = canvas.into_raster();
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert!(raster.pixels().all(|p| p == Rgba::opaque(10, 20, 30)));
    }

    #[test]
    fn test_fill_polygon() {
        let mut canvas = Canvas::new(10, 10, Rgba::WHITE, Rgba::opaque(255, 0, 0));
        canvas.fill(&Shape::Polygon(vec![(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]));
        let raster = canvas.into_raster();
        assert_eq!(raster.pixel(5, 5), Rgba::opaque(255, 0, 0));
        assert_eq!(raster.pixel(0, 0), Rgba::WHITE);
        assert_eq!(raster.pixel(9, 9), Rgba::WHITE);
    }

    #[test]
    fn test_fill_circle() {
        let mut canvas = Canvas::new(20, 20, Rgba::WHITE, Rgba::BLACK);
        canvas.fill(&Shape::Circle {
            center: (10.0, 10.0),
            radius: 6.0,
        });
        let raster = canvas.into_raster();
        assert_eq!(raster.pixel(10, 10), Rgba::BLACK);
        assert_eq!(raster.pixel(13, 10), Rgba::BLACK);
        assert_eq!(raster.pixel(1, 1), Rgba::WHITE);
        assert_eq!(raster.pixel(18, 18), Rgba::WHITE);
    }

    #[test]
    fn test_degenerate_shapes_draw_nothing() {
        let mut canvas = Canvas::new(6, 6, Rgba::WHITE, Rgba::BLACK);
        canvas.fill_all(&[
            Shape::Polygon(vec![(0.0, 0.0), (6.0, 6.0)]),
            Shape::Circle {
                center: (3.0, 3.0),
                radius: 0.0,
            },
        ]);
        assert!(canvas.into_raster().pixels().all(|p| p == Rgba::WHITE));
    }

    #[test]
    fn test_unpremultiply() {
        assert_eq!(unpremultiply(0, 0, 0, 0), Rgba::TRANSPARENT);
        assert_eq!(unpremultiply(1, 2, 3, 255), Rgba::new(1, 2, 3, 255));
        assert_eq!(unpremultiply(64, 0, 128, 128), Rgba::new(128, 0, 255, 128));
    }
}

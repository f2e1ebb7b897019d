//! Drawing surface for `embedded-graphics`.
//!
//! Lines, shapes and text come from `embedded-graphics`; they reach the panel
//! only through single pixels and whole-screen fills.

use core::convert::Infallible;

use embedded_graphics::image::GetPixel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Point, PointsIter, Size};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;

use crate::connector::Connector;
use crate::panel::Panel;

/// Minimal monochrome canvas a renderer needs.
pub trait PixelSurface {
    /// Set (`true`) or clear one pixel, ignored outside the canvas.
    fn draw_pixel(&mut self, x: i32, y: i32, on: bool);

    /// Pixel state, `false` outside the canvas.
    fn read_pixel(&self, x: i32, y: i32) -> bool;

    fn fill_screen(&mut self, on: bool);

    fn width(&self) -> u32;

    /// Addressable height, a single module row while a line is focused.
    fn height(&self) -> u32;
}

impl<CONNECTOR: Connector> PixelSurface for Panel<CONNECTOR> {
    fn draw_pixel(&mut self, x: i32, y: i32, on: bool) {
        Panel::draw_pixel(self, x, y, on);
    }

    fn read_pixel(&self, x: i32, y: i32) -> bool {
        Panel::read_pixel(self, x, y)
    }

    fn fill_screen(&mut self, on: bool) {
        Panel::fill_screen(self, on);
    }

    fn width(&self) -> u32 {
        Panel::width(self)
    }

    fn height(&self) -> u32 {
        self.focused_height()
    }
}

impl<CONNECTOR: Connector> OriginDimensions for Panel<CONNECTOR> {
    fn size(&self) -> Size {
        Size::new(Panel::width(self), self.focused_height())
    }
}

impl<CONNECTOR: Connector> DrawTarget for Panel<CONNECTOR> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            Panel::draw_pixel(self, point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        for point in area.points() {
            Panel::draw_pixel(self, point.x, point.y, color.is_on());
        }
        Ok(())
    }

    // Whole buffer in one pass, bypasses clip and focus
    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Panel::fill_screen(self, color.is_on());
        Ok(())
    }
}

impl<CONNECTOR: Connector> GetPixel for Panel<CONNECTOR> {
    type Color = BinaryColor;

    fn pixel(&self, p: Point) -> Option<Self::Color> {
        let inside = p.x >= 0 && p.y >= 0 && (p.x as u32) < Panel::width(self) && (p.y as u32) < Panel::height(self);
        inside.then(|| BinaryColor::from(Panel::read_pixel(self, p.x, p.y)))
    }
}

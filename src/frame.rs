use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Point, Size},
    Pixel,
};
use std::convert::Infallible;

/// In-memory monochrome frame buffer. Used as the screen when there's no
/// panel attached, and for checking what got drawn in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    pixels: Vec<BinaryColor>,
}

impl Frame {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BinaryColor::Off; (size.width * size.height) as usize],
        }
    }

    /// Get a pixel. `None` if out of bounds
    #[cfg(test)]
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Count pixels of one color within a region
    #[cfg(test)]
    pub fn count_in(
        &self,
        top_left: Point,
        size: Size,
        color: BinaryColor,
    ) -> usize {
        (top_left.y..top_left.y + size.height as i32)
            .flat_map(|y| {
                (top_left.x..top_left.x + size.width as i32)
                    .map(move |x| Point::new(x, y))
            })
            .filter(|&point| self.pixel(point) == Some(color))
            .count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0
            || y < 0
            || x >= self.size.width as i32
            || y >= self.size.height as i32
        {
            None
        } else {
            Some(y as usize * self.size.width as usize + x as usize)
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Anything off-screen gets clipped
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

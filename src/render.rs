//! Software rasterization of clipped segments into an ARGB8888 pixel buffer.

use crate::engine::DrawSink;

pub const COLOR_BACKGROUND: u32 = 0xFFFFFFFF;
pub const COLOR_LINE: u32 = 0xFF000000;
pub const COLOR_ENDPOINT: u32 = 0xFFFF0000;

/// Side length of the square marker drawn on each segment endpoint.
const ENDPOINT_MARKER: i32 = 4;

pub struct Renderer {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![COLOR_BACKGROUND; size],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![COLOR_BACKGROUND; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    pub(crate) fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = (y as u32 * self.width + x as u32) as usize;
            self.color_buffer[index] = color;
        }
    }

    pub(crate) fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham's line algorithm: steps along the major axis with an integer
    /// error term deciding when to also step along the minor axis.
    pub(crate) fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        let x_step = if x0 < x1 { 1 } else { -1 };
        let y_step = if y0 < y1 { 1 } else { -1 };

        let mut err = dx - dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_step;
            }
            if e2 < dx {
                err += dx;
                y += y_step;
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> u32 {
        self.color_buffer[(y * self.width + x) as usize]
    }
}

impl DrawSink for Renderer {
    fn draw_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let (x0, y0) = (x0.round() as i32, y0.round() as i32);
        let (x1, y1) = (x1.round() as i32, y1.round() as i32);
        self.draw_line(x0, y0, x1, y1, COLOR_LINE);
        // Small squares centered on each endpoint.
        let half = ENDPOINT_MARKER / 2;
        self.draw_rect(
            x0 - half,
            y0 - half,
            ENDPOINT_MARKER,
            ENDPOINT_MARKER,
            COLOR_ENDPOINT,
        );
        self.draw_rect(
            x1 - half,
            y1 - half,
            ENDPOINT_MARKER,
            ENDPOINT_MARKER,
            COLOR_ENDPOINT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut renderer = Renderer::new(4, 4);
        renderer.set_pixel(-1, 0, COLOR_LINE);
        renderer.set_pixel(0, 4, COLOR_LINE);
        renderer.set_pixel(100, 100, COLOR_LINE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(renderer.pixel(x, y), COLOR_BACKGROUND);
            }
        }
    }

    #[test]
    fn horizontal_line_fills_the_row() {
        let mut renderer = Renderer::new(8, 8);
        renderer.draw_line(0, 3, 7, 3, COLOR_LINE);
        for x in 0..8 {
            assert_eq!(renderer.pixel(x, 3), COLOR_LINE);
        }
        assert_eq!(renderer.pixel(0, 2), COLOR_BACKGROUND);
    }

    #[test]
    fn diagonal_line_touches_both_corners() {
        let mut renderer = Renderer::new(8, 8);
        renderer.draw_line(0, 0, 7, 7, COLOR_LINE);
        assert_eq!(renderer.pixel(0, 0), COLOR_LINE);
        assert_eq!(renderer.pixel(7, 7), COLOR_LINE);
        assert_eq!(renderer.pixel(3, 3), COLOR_LINE);
    }

    #[test]
    fn segments_get_endpoint_markers() {
        let mut renderer = Renderer::new(16, 16);
        renderer.draw_segment(4.0, 4.0, 12.0, 4.0);
        assert_eq!(renderer.pixel(4, 4), COLOR_ENDPOINT);
        assert_eq!(renderer.pixel(12, 4), COLOR_ENDPOINT);
        // Midway along the line stays the line color.
        assert_eq!(renderer.pixel(8, 4), COLOR_LINE);
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut renderer = Renderer::new(4, 4);
        renderer.draw_line(0, 0, 3, 3, COLOR_LINE);
        renderer.clear(COLOR_BACKGROUND);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(renderer.pixel(x, y), COLOR_BACKGROUND);
            }
        }
    }
}

//! CPU paint raster - RGBA f32 storage with dab rasterization

/// An RGBA f32 raster that brush dabs are composited into
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
    /// Set whenever a pixel changes, cleared by `take_dirty`
    dirty: bool,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
            dirty: false,
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
        self.dirty = true;
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Blend a color onto an existing pixel using alpha compositing
    /// Formula: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let src_alpha = color[3];
        let inv_src_alpha = 1.0 - src_alpha;

        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
        self.dirty = true;
    }

    /// Composite a filled disk centered at pixel coordinates `(cx, cy)`.
    ///
    /// A pixel is covered when its center lies within `radius`.
    ///
    /// # Returns
    /// Number of pixels touched.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 4]) -> usize {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return 0;
        }

        let x_min = (cx - radius).floor().max(0.0) as u32;
        let y_min = (cy - radius).floor().max(0.0) as u32;
        let x_max = ((cx + radius).ceil().max(0.0) as u32).min(self.width);
        let y_max = ((cy + radius).ceil().max(0.0) as u32).min(self.height);

        let radius_sq = radius * radius;
        let mut touched = 0;

        for py in y_min..y_max {
            for px in x_min..x_max {
                let dx = (px as f32 + 0.5) - cx;
                let dy = (py as f32 + 0.5) - cy;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend_pixel(px, py, color);
                    touched += 1;
                }
            }
        }

        touched
    }

    /// Paint a dab at texture coordinates.
    ///
    /// `x = u * width`; `y = (1 - v) * height` when `flip_v`, else `v * height`.
    pub fn paint_uv_dab(&mut self, u: f32, v: f32, radius: f32, color: [f32; 4], flip_v: bool) -> usize {
        let x = u * self.width as f32;
        let y = (if flip_v { 1.0 - v } else { v }) * self.height as f32;
        self.fill_circle(x, y, radius, color)
    }

    /// Whether the raster changed since the last `take_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Get raw pixel data for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_new_surface() {
        let surface = CpuSurface::new(100, 50);
        assert_eq!(surface.width, 100);
        assert_eq!(surface.height, 50);
        assert_eq!(surface.pixel_count(), 5000);
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_blend_pixel() {
        let mut surface = CpuSurface::new(10, 10);
        surface.clear([1.0, 1.0, 1.0, 1.0]);

        surface.blend_pixel(5, 5, [1.0, 0.0, 0.0, 0.5]);

        let result = surface.get_pixel(5, 5).unwrap();
        assert!((result[0] - 1.0).abs() < 0.01);
        assert!((result[1] - 0.5).abs() < 0.01);
        assert!((result[2] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_fill_circle_covers_disk_only() {
        let mut surface = CpuSurface::new(20, 20);
        let touched = surface.fill_circle(10.0, 10.0, 3.0, RED);

        assert!(touched > 0);
        assert_eq!(surface.get_pixel(10, 10), Some(RED));
        assert_eq!(surface.get_pixel(0, 0), Some([0.0; 4]));
        // Corner of the bounding square is outside the disk
        assert_eq!(surface.get_pixel(7, 7), Some([0.0; 4]));
        assert!(surface.take_dirty());
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_fill_circle_clips_at_edges() {
        let mut surface = CpuSurface::new(8, 8);
        let touched = surface.fill_circle(0.0, 0.0, 2.0, RED);
        assert!(touched > 0 && touched < 8);
        assert_eq!(surface.get_pixel(0, 0), Some(RED));

        assert_eq!(surface.fill_circle(-10.0, -10.0, 2.0, RED), 0);
        assert_eq!(surface.fill_circle(4.0, 4.0, 0.0, RED), 0);
    }

    #[test]
    fn test_paint_uv_dab_flip() {
        let mut surface = CpuSurface::new(10, 10);
        // v = 0.95 is near the top row once flipped
        surface.paint_uv_dab(0.05, 0.95, 1.0, RED, true);
        assert_eq!(surface.get_pixel(0, 0), Some(RED));
        assert_eq!(surface.get_pixel(0, 9), Some([0.0; 4]));

        let mut surface = CpuSurface::new(10, 10);
        surface.paint_uv_dab(0.05, 0.95, 1.0, RED, false);
        assert_eq!(surface.get_pixel(0, 9), Some(RED));
        assert_eq!(surface.get_pixel(0, 0), Some([0.0; 4]));
    }

    #[test]
    fn test_as_bytes() {
        let surface = CpuSurface::new(2, 2);
        // 4 pixels * 4 components * 4 bytes per f32 = 64 bytes
        assert_eq!(surface.as_bytes().len(), 64);
    }
}

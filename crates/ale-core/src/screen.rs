//! Raw screen of palette codes, before colour conversion.

/// A `height × width` grid of palette codes, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AleScreen {
    rows: usize,
    columns: usize,
    pixels: Vec<u8>,
}

impl AleScreen {
    /// A black screen of the given dimensions.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            rows: height,
            columns: width,
            pixels: vec![0; height * width],
        }
    }

    /// Pixel at (row, column).
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.pixels[self.index(row, column)]
    }

    pub fn pixel_mut(&mut self, row: usize, column: usize) -> &mut u8 {
        let idx = self.index(row, column);
        &mut self.pixels[idx]
    }

    /// One row of pixels.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.columns;
        &self.pixels[start..start + self.columns]
    }

    /// The whole grid, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.columns
    }

    /// Bytes in the underlying array (one per pixel).
    #[must_use]
    pub fn array_size(&self) -> usize {
        self.rows * self.columns
    }

    /// Refresh from an engine framebuffer of the same dimensions.
    pub fn copy_from(&mut self, framebuffer: &[u8]) {
        self.pixels.copy_from_slice(framebuffer);
    }

    fn index(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.rows && column < self.columns,
            "pixel ({row}, {column}) outside {}x{} screen",
            self.rows,
            self.columns
        );
        row * self.columns + column
    }
}

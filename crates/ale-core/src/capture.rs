//! PNG export of environment screens.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{AleError, Result};
use crate::palette::ColourPalette;
use crate::screen::AleScreen;

/// Write `screen` to `path` as an 8-bit RGB PNG using `palette`.
pub fn save_png(screen: &AleScreen, palette: &ColourPalette, path: &Path) -> Result<()> {
    let width = u32::try_from(screen.width())
        .map_err(|_| AleError::Export("screen too wide".into()))?;
    let height = u32::try_from(screen.height())
        .map_err(|_| AleError::Export("screen too tall".into()))?;

    let mut rgb = vec![0; screen.array_size() * 3];
    palette.convert_buffer_rgb(&mut rgb, screen.as_slice());

    let file = fs::File::create(path).map_err(|e| AleError::io(e, path))?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgb)?;
    writer.finish()?;
    Ok(())
}

/// Writes screens to PNG files, optionally numbering them into a directory.
#[derive(Debug, Clone)]
pub struct ScreenExporter {
    palette: ColourPalette,
    dir: Option<PathBuf>,
    frame: u64,
}

impl ScreenExporter {
    /// Exporter that only writes to explicit paths.
    #[must_use]
    pub fn new(palette: ColourPalette) -> Self {
        Self {
            palette,
            dir: None,
            frame: 0,
        }
    }

    /// Exporter that numbers frames into `dir`, creating it if needed.
    pub fn with_dir(palette: ColourPalette, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AleError::io(e, &dir))?;
        Ok(Self {
            palette,
            dir: Some(dir),
            frame: 0,
        })
    }

    /// Frames written by [`ScreenExporter::save_next`] so far.
    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frame
    }

    pub fn save(&self, screen: &AleScreen, path: &Path) -> Result<()> {
        save_png(screen, &self.palette, path)
    }

    /// Write the next numbered frame (`000000.png`, `000001.png`, ...).
    ///
    /// Returns the path written.
    pub fn save_next(&mut self, screen: &AleScreen) -> Result<PathBuf> {
        let Some(dir) = &self.dir else {
            return Err(AleError::Export("exporter has no output directory".into()));
        };
        let path = dir.join(format!("{:06}.png", self.frame));
        save_png(screen, &self.palette, &path)?;
        self.frame += 1;
        Ok(path)
    }
}

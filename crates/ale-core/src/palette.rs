//! Conversion of raw TIA colour codes into RGB and grayscale.
//!
//! A palette code is one byte. Bits 7-4 select the hue and bits 3-1 the
//! luminance; bit 0 is ignored by the hardware. Odd codes are still filled in
//! so that lookups are total over all 256 values: on PAL they hold the gray
//! of the even neighbour (colour loss), elsewhere they repeat it.

mod tables;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AleError, Result};

pub use tables::{pack, unpack};

/// Bytes in a user palette file: NTSC and PAL tables of 128 entries each,
/// then the 8 SECAM entries, three bytes per entry.
pub const USER_PALETTE_LEN: usize = (128 + 128 + 8) * 3;

/// Which set of colour tables to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaletteType {
    #[default]
    Standard,
    Alternate,
    User,
}

impl fmt::Display for PaletteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Alternate => "alternate",
            Self::User => "user",
        })
    }
}

impl FromStr for PaletteType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "alternate" | "z26" => Ok(Self::Alternate),
            "user" => Ok(Self::User),
            other => Err(format!("unknown palette `{other}`")),
        }
    }
}

/// Television standard the console is wired for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    #[default]
    Ntsc,
    Pal,
    Secam,
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ntsc => "NTSC",
            Self::Pal => "PAL",
            Self::Secam => "SECAM",
        })
    }
}

impl FromStr for DisplayFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NTSC" => Ok(Self::Ntsc),
            "PAL" => Ok(Self::Pal),
            "SECAM" => Ok(Self::Secam),
            other => Err(format!("unknown display format `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
struct UserTables {
    ntsc: [u32; 128],
    pal: [u32; 128],
    secam: [u32; 8],
}

/// The active 256-entry colour table plus its grayscale companion.
#[derive(Debug, Clone)]
pub struct ColourPalette {
    palette_type: PaletteType,
    format: DisplayFormat,
    rgb: [u32; 256],
    gray: [u8; 256],
    user: Option<UserTables>,
}

impl Default for ColourPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl ColourPalette {
    /// Standard NTSC palette.
    #[must_use]
    pub fn new() -> Self {
        let mut palette = Self {
            palette_type: PaletteType::Standard,
            format: DisplayFormat::Ntsc,
            rgb: [0; 256],
            gray: [0; 256],
            user: None,
        };
        palette.rebuild(&tables::NTSC_STANDARD);
        palette
    }

    #[must_use]
    pub fn palette_type(&self) -> PaletteType {
        self.palette_type
    }

    #[must_use]
    pub fn display_format(&self) -> DisplayFormat {
        self.format
    }

    #[must_use]
    pub fn has_user_table(&self) -> bool {
        self.user.is_some()
    }

    /// Select the active table. Selecting `User` before a user table has been
    /// loaded is an error and leaves the current table in place.
    pub fn configure(&mut self, palette_type: PaletteType, format: DisplayFormat) -> Result<()> {
        let base: [u32; 128] = match (palette_type, format) {
            (PaletteType::User, _) => {
                let Some(user) = &self.user else {
                    return Err(AleError::PaletteFormat(
                        "user palette selected but none loaded".into(),
                    ));
                };
                match format {
                    DisplayFormat::Ntsc => user.ntsc,
                    DisplayFormat::Pal => user.pal,
                    DisplayFormat::Secam => expand_secam(&user.secam),
                }
            }
            (PaletteType::Standard, DisplayFormat::Ntsc) => tables::NTSC_STANDARD,
            (PaletteType::Standard, DisplayFormat::Pal) => tables::PAL_STANDARD,
            (PaletteType::Alternate, DisplayFormat::Ntsc) => tables::ntsc_alternate(),
            (PaletteType::Alternate, DisplayFormat::Pal) => tables::pal_alternate(),
            (_, DisplayFormat::Secam) => expand_secam(&tables::SECAM_STANDARD),
        };
        self.palette_type = palette_type;
        self.format = format;
        self.rebuild(&base);
        Ok(())
    }

    /// Load a user palette file into the user slot. Does not activate it.
    pub fn load_user_table(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| AleError::io(e, path))?;
        self.load_user_table_bytes(&bytes)?;
        log::info!("Loaded user palette from {}", path.display());
        Ok(())
    }

    /// Parse a raw user palette: exactly [`USER_PALETTE_LEN`] bytes of RGB triples.
    pub fn load_user_table_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != USER_PALETTE_LEN {
            return Err(AleError::PaletteFormat(format!(
                "expected {USER_PALETTE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut triples = bytes.chunks_exact(3).map(|c| pack(c[0], c[1], c[2]));
        let mut user = UserTables {
            ntsc: [0; 128],
            pal: [0; 128],
            secam: [0; 8],
        };
        for slot in user
            .ntsc
            .iter_mut()
            .chain(user.pal.iter_mut())
            .chain(user.secam.iter_mut())
        {
            *slot = triples.next().unwrap_or_default();
        }
        self.user = Some(user);
        if self.palette_type == PaletteType::User {
            self.configure(PaletteType::User, self.format)?;
        }
        Ok(())
    }

    /// Packed `0x00RRGGBB` for a palette code.
    #[must_use]
    pub fn to_rgb_packed(&self, code: u8) -> u32 {
        self.rgb[usize::from(code)]
    }

    #[must_use]
    pub fn to_rgb(&self, code: u8) -> (u8, u8, u8) {
        unpack(self.to_rgb_packed(code))
    }

    #[must_use]
    pub fn to_grayscale(&self, code: u8) -> u8 {
        self.gray[usize::from(code)]
    }

    /// Interleaved conversion: three bytes (R, G, B) per source pixel.
    ///
    /// # Panics
    ///
    /// If `dst` is shorter than `3 * src.len()`.
    pub fn convert_buffer_rgb(&self, dst: &mut [u8], src: &[u8]) {
        assert!(
            dst.len() >= src.len() * 3,
            "rgb destination holds {} bytes, {} required",
            dst.len(),
            src.len() * 3
        );
        for (out, &code) in dst.chunks_exact_mut(3).zip(src) {
            let (r, g, b) = self.to_rgb(code);
            out.copy_from_slice(&[r, g, b]);
        }
    }

    /// Planar conversion: all red values, then all green, then all blue.
    ///
    /// # Panics
    ///
    /// If `dst` is shorter than `3 * src.len()`.
    pub fn convert_buffer_rgb_planar(&self, dst: &mut [u8], src: &[u8]) {
        let n = src.len();
        assert!(
            dst.len() >= n * 3,
            "rgb destination holds {} bytes, {} required",
            dst.len(),
            n * 3
        );
        let (reds, rest) = dst.split_at_mut(n);
        let (greens, rest) = rest.split_at_mut(n);
        let blues = &mut rest[..n];
        for (i, &code) in src.iter().enumerate() {
            let (r, g, b) = self.to_rgb(code);
            reds[i] = r;
            greens[i] = g;
            blues[i] = b;
        }
    }

    /// One luminance byte per source pixel.
    ///
    /// # Panics
    ///
    /// If `dst` is shorter than `src`.
    pub fn convert_buffer_grayscale(&self, dst: &mut [u8], src: &[u8]) {
        assert!(
            dst.len() >= src.len(),
            "grayscale destination holds {} bytes, {} required",
            dst.len(),
            src.len()
        );
        for (out, &code) in dst.iter_mut().zip(src) {
            *out = self.to_grayscale(code);
        }
    }

    fn rebuild(&mut self, base: &[u32; 128]) {
        for (i, &colour) in base.iter().enumerate() {
            let (r, g, b) = unpack(colour);
            let y = luma(r, g, b);
            self.rgb[i * 2] = colour;
            self.rgb[i * 2 + 1] = if self.format == DisplayFormat::Pal {
                pack(y, y, y)
            } else {
                colour
            };
            self.gray[i * 2] = y;
            self.gray[i * 2 + 1] = y;
        }
    }
}

/// Spread the 8 SECAM colours over every hue.
fn expand_secam(secam: &[u32; 8]) -> [u32; 128] {
    std::array::from_fn(|i| secam[i % 8])
}

/// ITU-R 601 luma.
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.2989 * f64::from(r) + 0.5870 * f64::from(g) + 0.1140 * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

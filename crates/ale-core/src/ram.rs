//! Copy of the console's 128 bytes of working RAM.

/// Size of the console's working RAM in bytes.
pub const RAM_SIZE: usize = 128;

/// A 128-byte RAM image. Copies are full duplicates; equality is byte-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AleRam {
    bytes: [u8; RAM_SIZE],
}

impl Default for AleRam {
    fn default() -> Self {
        Self::new()
    }
}

impl AleRam {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; RAM_SIZE],
        }
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; RAM_SIZE]) -> Self {
        Self { bytes }
    }

    /// Byte at `addr`. Addresses wrap at 128, as the RIOT mirrors its RAM.
    #[must_use]
    pub fn get(&self, addr: usize) -> u8 {
        self.bytes[addr % RAM_SIZE]
    }

    /// Mutable byte at `addr` (wrapping).
    pub fn byte_mut(&mut self, addr: usize) -> &mut u8 {
        &mut self.bytes[addr % RAM_SIZE]
    }

    /// The whole image.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        RAM_SIZE
    }

    /// Overwrite this image with `bytes`.
    pub fn copy_from(&mut self, bytes: &[u8; RAM_SIZE]) {
        self.bytes.copy_from_slice(bytes);
    }
}

//! Read-only pixel access used by the scan phase.

/// A random-access RGB raster that can be shared across scan workers.
pub trait PixelSource: Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// RGB at (x, y); callers stay within `width() x height()`.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// Borrowed view over tightly packed 8-bit RGB or RGBA rows.
///
/// Any alpha channel is ignored.
#[derive(Clone, Copy, Debug)]
pub struct RgbView<'a> {
    width: u32,
    height: u32,
    channels: usize,
    data: &'a [u8],
}

impl<'a> RgbView<'a> {
    /// View over `width * height * 3` bytes. Returns `None` on a size mismatch.
    pub fn from_rgb(width: u32, height: u32, data: &'a [u8]) -> Option<Self> {
        Self::with_channels(width, height, 3, data)
    }

    /// View over `width * height * 4` bytes. Returns `None` on a size mismatch.
    pub fn from_rgba(width: u32, height: u32, data: &'a [u8]) -> Option<Self> {
        Self::with_channels(width, height, 4, data)
    }

    fn with_channels(width: u32, height: u32, channels: usize, data: &'a [u8]) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(channels)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }
}

impl PixelSource for RgbView<'_> {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * self.channels;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{FimError, FimResult};

/// Tightly packed, straight-alpha RGBA8 pixels in row-major order, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    size: Size,
    data: Vec<u8>,
}

impl std::fmt::Debug for RgbaBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaBuffer")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RgbaBuffer {
    /// Allocate a transparent-black buffer.
    pub fn new(width: u32, height: u32) -> FimResult<Self> {
        let size = Size::new(width, height)?;
        Ok(Self {
            size,
            data: vec![0; size.rgba_len()],
        })
    }

    /// Allocate a buffer filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> FimResult<Self> {
        let mut out = Self::new(width, height)?;
        out.fill(color);
        Ok(out)
    }

    /// Wrap existing straight-alpha bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> FimResult<Self> {
        let size = Size::new(width, height)?;
        if data.len() != size.rgba_len() {
            return Err(FimError::validation(format!(
                "rgba buffer for {width}x{height} needs {} bytes, got {}",
                size.rgba_len(),
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.size.width as usize * 4
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the raw bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume into raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Read the pixel at `(x, y)`, top-left origin.
    pub fn get_pixel(&self, x: u32, y: u32) -> FimResult<Rgba8> {
        let i = self.offset(x, y)?;
        Ok(Rgba8::from_array([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    /// Write the pixel at `(x, y)`, top-left origin.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> FimResult<()> {
        let i = self.offset(x, y)?;
        self.data[i..i + 4].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// Reverse the row order in place, converting between bottom-left and top-left origins.
    pub fn flip_vertical(&mut self) {
        let row_bytes = self.row_bytes();
        flip_rows_in_place(&mut self.data, row_bytes);
    }

    fn offset(&self, x: u32, y: u32) -> FimResult<usize> {
        if !self.size.contains(x, y) {
            return Err(FimError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.size.width, self.size.height
            )));
        }
        Ok((y as usize * self.size.width as usize + x as usize) * 4)
    }
}

/// Swap row `y` with row `rows - 1 - y` for the first `rows / 2` rows.
///
/// Uses a single scratch row: copy top into scratch, bottom into top, scratch into bottom. The
/// middle row of an odd-height image stays where it is.
pub fn flip_rows_in_place(data: &mut [u8], row_bytes: usize) {
    if row_bytes == 0 {
        return;
    }
    let rows = data.len() / row_bytes;
    let mut scratch = vec![0u8; row_bytes];
    for y in 0..rows / 2 {
        let top = y * row_bytes;
        let bottom = (rows - 1 - y) * row_bytes;
        scratch.copy_from_slice(&data[top..top + row_bytes]);
        data.copy_within(bottom..bottom + row_bytes, top);
        data[bottom..bottom + row_bytes].copy_from_slice(&scratch);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/rgba.rs"]
mod tests;

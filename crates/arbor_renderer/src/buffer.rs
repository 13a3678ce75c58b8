//! Floating point RGB image buffer.

use std::ops::{Index, IndexMut};

use arbor_core::Color;

/// Colour channel of an [`Image`] sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R = 0,
    G = 1,
    B = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];
}

/// A `width x height` buffer of linear RGB samples.
///
/// Samples are stored column by column, so a contiguous run of the buffer is
/// a contiguous range of columns. Workers split the buffer along those runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Image {
    /// Create an image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Create an image with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        let len = width as usize * height as usize * 3;
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples in one column.
    pub fn column_len(&self) -> usize {
        self.height as usize * 3
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (x as usize * self.height as usize + y as usize) * 3
    }

    /// Colour of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = self.offset(x, y);
        Color::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Color) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&colour.to_array());
    }

    /// Raw samples in column-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Samples clamped to `[0, 1]` and quantized to bytes, row by row.
    ///
    /// This is the layout image encoders expect.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let colour = self.pixel(x, y);
                for c in colour.to_array() {
                    bytes.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
                }
            }
        }
        bytes
    }
}

impl Index<(u32, u32, Channel)> for Image {
    type Output = f32;

    fn index(&self, (x, y, channel): (u32, u32, Channel)) -> &f32 {
        &self.data[self.offset(x, y) + channel as usize]
    }
}

impl IndexMut<(u32, u32, Channel)> for Image {
    fn index_mut(&mut self, (x, y, channel): (u32, u32, Channel)) -> &mut f32 {
        let i = self.offset(x, y) + channel as usize;
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_by_column_row_channel() {
        let mut image = Image::new(4, 3);
        image[(2, 1, Channel::G)] = 0.5;
        image.set_pixel(3, 2, Color::new(0.1, 0.2, 0.3));

        assert_eq!(image.pixel(2, 1), Color::new(0.0, 0.5, 0.0));
        assert_eq!(image[(3, 2, Channel::B)], 0.3);
        assert_eq!(image.as_slice().len(), 36);
    }

    #[test]
    fn test_columns_are_contiguous() {
        let mut image = Image::new(3, 2);
        image.set_pixel(1, 0, Color::ONE);
        image.set_pixel(1, 1, Color::ONE);

        let column = image.column_len();
        let ones = &image.as_slice()[column..2 * column];
        assert!(ones.iter().all(|&v| v == 1.0));
        assert_eq!(image.as_slice().iter().filter(|&&v| v == 1.0).count(), 6);
    }

    #[test]
    fn test_to_rgb8_is_row_major_and_clamped() {
        let mut image = Image::new(2, 2);
        image.set_pixel(1, 0, Color::new(2.0, -1.0, 0.5));

        let bytes = image.to_rgb8();
        assert_eq!(bytes.len(), 12);
        // Second pixel of the first row
        assert_eq!(&bytes[3..6], &[255, 0, 128]);
        assert!(bytes[6..].iter().all(|&b| b == 0));
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_pixel_panics() {
        let image = Image::new(2, 2);
        image.pixel(2, 0);
    }
}

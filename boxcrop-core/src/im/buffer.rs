// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use crate::error::BoxcropError;

/// A row-major container storing an image buffer or grid of pixels.
///
/// The struct is generic over the subpixel type `T`. The length of the
/// buffer must be equal to the product of `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use boxcrop_core::im::PixelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * channels) as usize];
///
/// let buffer = PixelBuffer::new(width, height, channels, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height * channels) as usize);
/// ```
///
/// ```
/// use boxcrop_core::im::PixelBuffer;
///
/// let data = vec![0u8; 10 * 10 * 4];
/// let buffer = PixelBuffer::new(10, 10, 3, data);
///
/// assert!(buffer.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    w: u32,         // Width
    h: u32,         // Height
    c: u32,         // Channels
    buffer: Vec<T>, // Subpixels
}

impl<T: Copy> PixelBuffer<T> {
    /// Initializes a buffer from raw row-major subpixels
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of image channels (e.g. 1 for grayscale)
    /// * `buffer` - Subpixels ordered by row, then column, then channel
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Vec<T>,
    ) -> Result<PixelBuffer<T>, BoxcropError> {
        let expected = width as u64 * height as u64 * channels as u64;

        if expected != buffer.len() as u64 {
            return Err(BoxcropError::BufferError(format!(
                "Buffer of length {} does not match a {}x{}x{} image",
                buffer.len(),
                height,
                width,
                channels
            )));
        }

        Ok(PixelBuffer {
            w: width,
            h: height,
            c: channels,
            buffer,
        })
    }
}

// >>> PROPERTY METHODS

impl<T: Copy> PixelBuffer<T> {
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of channels in the image
    pub fn channels(&self) -> u32 {
        self.c
    }

    /// Shape/dimensions of the image
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.h, self.w, self.c)
    }

    /// Length of the raw image
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Subpixels of the pixel at column `x` and row `y`
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[T]> {
        if x >= self.w || y >= self.h {
            return None;
        }

        let c = self.c as usize;
        let start = ((y as usize) * (self.w as usize) + (x as usize)) * c;
        Some(&self.buffer[start..start + c])
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T: Copy> PixelBuffer<T> {
    /// Returns the raw image
    pub fn into_raw(self) -> Vec<T> {
        self.buffer
    }

    /// Returns a reference to the raw image
    pub fn as_raw(&self) -> &[T] {
        &self.buffer
    }
}

// <<< CONVERSION METHODS

// >>> TRANSFORM METHODS

impl<T: Copy> PixelBuffer<T> {
    /// Create a new buffer with copied cropped contents
    ///
    /// Copies rows `[y, y + h)` and columns `[x, x + w)`. A zero width or
    /// height yields an empty buffer.
    ///
    /// # Arguments
    ///
    /// * `x` - Minimum x-coordinate (left)
    /// * `y` - Minimum y-coordinate (top)
    /// * `w` - Width of crop
    /// * `h` - Height of crop
    ///
    /// # Examples
    ///
    /// ```
    /// use boxcrop_core::im::PixelBuffer;
    ///
    /// let buffer = PixelBuffer::new(3, 2, 1, vec![0u8, 1, 2, 3, 4, 5]).unwrap();
    /// let cropped = buffer.crop(1, 0, 2, 2).unwrap();
    ///
    /// assert_eq!(cropped.as_raw(), &[1, 2, 4, 5]);
    /// ```
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<PixelBuffer<T>, BoxcropError> {
        if w == 0 || h == 0 {
            return Ok(PixelBuffer {
                w,
                h,
                c: self.c,
                buffer: Vec::new(),
            });
        }

        if x as u64 + w as u64 > self.w as u64 || y as u64 + h as u64 > self.h as u64 {
            return Err(BoxcropError::BufferError(format!(
                "Cropping region ({}, {}, {}, {}) out of bounds for a {}x{} image",
                x, y, w, h, self.w, self.h
            )));
        }

        let c = self.c as usize;
        let orig_w = self.w as usize;

        let mut new_buffer = Vec::with_capacity(w as usize * h as usize * c);

        for row in y..y + h {
            let start = ((row as usize) * orig_w + (x as usize)) * c;
            let end = start + (w as usize) * c;
            new_buffer.extend_from_slice(&self.buffer[start..end]);
        }

        Ok(PixelBuffer {
            w,
            h,
            c: self.c,
            buffer: new_buffer,
        })
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;

    fn gradient(width: u32, height: u32, channels: u32) -> PixelBuffer<u16> {
        let data: Vec<u16> = (0..width * height * channels).map(|v| v as u16).collect();
        PixelBuffer::new(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_new_size_mismatch() {
        assert!(PixelBuffer::new(2, 2, 1, vec![0u8; 3]).is_err());
        assert!(PixelBuffer::new(2, 2, 1, vec![0u8; 4]).is_ok());
    }

    #[test]
    fn test_crop_content() {
        let buffer = gradient(5, 4, 3);
        let cropped = buffer.crop(1, 2, 3, 2).unwrap();

        assert_eq!(cropped.shape(), (2, 3, 3));

        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(cropped.pixel(x, y), buffer.pixel(x + 1, y + 2));
            }
        }
    }

    #[test]
    fn test_crop_full_image() {
        let buffer = gradient(4, 4, 1);
        let cropped = buffer.crop(0, 0, 4, 4).unwrap();
        assert_eq!(cropped, buffer);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let buffer = gradient(4, 4, 1);
        assert!(buffer.crop(2, 0, 3, 1).is_err());
        assert!(buffer.crop(0, 3, 1, 2).is_err());
    }

    #[test]
    fn test_crop_empty() {
        let buffer = gradient(4, 4, 2);
        let cropped = buffer.crop(9, 1, 0, 2).unwrap();

        assert!(cropped.is_empty());
        assert_eq!(cropped.channels(), 2);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let buffer = gradient(2, 2, 1);
        assert_eq!(buffer.pixel(1, 1), Some(&[3u16][..]));
        assert_eq!(buffer.pixel(2, 0), None);
    }
}

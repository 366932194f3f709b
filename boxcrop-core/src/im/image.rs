// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use image::{
    DynamicImage, ImageBuffer, ImageError, ImageFormat, ImageReader, Luma, LumaA, Rgb, Rgba,
};

use crate::error::BoxcropError;
use crate::im::PixelBuffer;
use crate::impl_enum_dispatch;

/// A decoded image stored as a grid of subpixels
///
/// The enum holds each subpixel data type a decoded raster can have. Every
/// channel of the source is kept, alpha included, so crops are copied
/// verbatim. Images are built from an `image::DynamicImage` and turned back
/// into one for encoding.
///
/// # Examples
///
/// ```
/// use image::{RgbImage, DynamicImage};
/// use boxcrop_core::im::CropImage;
///
/// let rgb = RgbImage::new(10, 10);
/// let dynamic = DynamicImage::ImageRgb8(rgb);
/// let image = CropImage::new_from_default(dynamic).unwrap();
///
/// assert_eq!(image.shape(), (10, 10, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CropImage {
    U8(PixelBuffer<u8>),
    U16(PixelBuffer<u16>),
    F32(PixelBuffer<f32>),
}

// >>> I/O METHODS

impl CropImage {
    /// Open a new image from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a decodable raster image
    ///
    /// ```no_run
    /// use boxcrop_core::im::CropImage;
    /// let image = CropImage::open("image.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CropImage, BoxcropError> {
        Self::open_with_format(path).map(|(image, _)| image)
    }

    /// Open a new image and report the format it was decoded with
    ///
    /// The format is guessed from the file contents first and from the
    /// extension second, so mislabelled files still decode.
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a decodable raster image
    pub fn open_with_format<P: AsRef<Path>>(
        path: P,
    ) -> Result<(CropImage, Option<ImageFormat>), BoxcropError> {
        let path = path.as_ref();
        let decode_error = |message: String| BoxcropError::ImageDecodeError(path.into(), message);

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(err.to_string()))?;

        let format = reader.format();

        let dynamic = reader
            .decode()
            .map_err(|err| decode_error(err.to_string()))?;

        let image = Self::new_from_default(dynamic).map_err(|err| decode_error(err.to_string()))?;

        Ok((image, format))
    }

    /// Initialize a new image from a DynamicImage
    ///
    /// # Arguments
    ///
    /// * `image` - A decoded DynamicImage of any colour type
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{GrayImage, DynamicImage};
    /// use boxcrop_core::im::CropImage;
    ///
    /// let gray = GrayImage::new(10, 10);
    /// let dynamic = DynamicImage::ImageLuma8(gray);
    /// let image = CropImage::new_from_default(dynamic);
    /// ```
    pub fn new_from_default(image: DynamicImage) -> Result<CropImage, BoxcropError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(CropImage::U8(PixelBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA8(buffer) => Ok(CropImage::U8(PixelBuffer::new(
                width,
                height,
                2,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgb8(buffer) => Ok(CropImage::U8(PixelBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba8(buffer) => Ok(CropImage::U8(PixelBuffer::new(
                width,
                height,
                4,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLuma16(buffer) => Ok(CropImage::U16(PixelBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA16(buffer) => Ok(CropImage::U16(PixelBuffer::new(
                width,
                height,
                2,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgb16(buffer) => Ok(CropImage::U16(PixelBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba16(buffer) => Ok(CropImage::U16(PixelBuffer::new(
                width,
                height,
                4,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgb32F(buffer) => Ok(CropImage::F32(PixelBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba32F(buffer) => Ok(CropImage::F32(PixelBuffer::new(
                width,
                height,
                4,
                buffer.into_raw(),
            )?)),
            other => Self::new_from_default(DynamicImage::ImageRgba8(other.to_rgba8())),
        }
    }

    /// Convert the image back into a DynamicImage
    pub fn into_dynamic(self) -> Result<DynamicImage, BoxcropError> {
        let width = self.width();
        let height = self.height();
        let size_error = || BoxcropError::BufferError("Failed to rebuild image buffer".to_string());

        let dynamic = match (self, width, height) {
            (CropImage::U8(buffer), w, h) => match buffer.channels() {
                1 => DynamicImage::ImageLuma8(
                    ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                2 => DynamicImage::ImageLumaA8(
                    ImageBuffer::<LumaA<u8>, Vec<u8>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                3 => DynamicImage::ImageRgb8(
                    ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                4 => DynamicImage::ImageRgba8(
                    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                _ => return Err(size_error()),
            },
            (CropImage::U16(buffer), w, h) => match buffer.channels() {
                1 => DynamicImage::ImageLuma16(
                    ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                2 => DynamicImage::ImageLumaA16(
                    ImageBuffer::<LumaA<u16>, Vec<u16>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                3 => DynamicImage::ImageRgb16(
                    ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                4 => DynamicImage::ImageRgba16(
                    ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                _ => return Err(size_error()),
            },
            (CropImage::F32(buffer), w, h) => match buffer.channels() {
                3 => DynamicImage::ImageRgb32F(
                    ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                4 => DynamicImage::ImageRgba32F(
                    ImageBuffer::<Rgba<f32>, Vec<f32>>::from_raw(w, h, buffer.into_raw())
                        .ok_or_else(size_error)?,
                ),
                _ => return Err(size_error()),
            },
        };

        Ok(dynamic)
    }

    /// Save image, overwriting any existing file
    ///
    /// The format is inferred from the extension of `path`. When the path
    /// has no recognised extension, `fallback` is used instead. When the
    /// format cannot store the image's colour type (e.g. alpha into JPEG),
    /// the image is converted to 8-bit gray or RGB and encoded again.
    ///
    /// # Arguments
    ///
    /// * `path` - Output path
    /// * `fallback` - Format to use when none can be inferred from `path`
    ///
    /// ```no_run
    /// use boxcrop_core::im::CropImage;
    /// let image = CropImage::open("image.png").unwrap();
    /// image.save("image.jpg", None).unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(
        self,
        path: P,
        fallback: Option<ImageFormat>,
    ) -> Result<(), BoxcropError> {
        let path = path.as_ref();
        let write_error = |message: String| BoxcropError::ImageWriteError(path.into(), message);

        if self.is_empty() {
            return Err(write_error(format!(
                "Cropped region of {}x{} pixels is empty",
                self.height(),
                self.width()
            )));
        }

        let format = ImageFormat::from_path(path)
            .ok()
            .or(fallback)
            .ok_or_else(|| {
                write_error("Could not infer an image format from the file name".to_string())
            })?;

        let channels = self.channels();
        let dynamic = self
            .into_dynamic()
            .map_err(|err| write_error(err.to_string()))?;

        let result = match dynamic.save_with_format(path, format) {
            Err(ImageError::Unsupported(_)) if channels <= 2 => {
                DynamicImage::ImageLuma8(dynamic.to_luma8()).save_with_format(path, format)
            }
            Err(ImageError::Unsupported(_)) => {
                DynamicImage::ImageRgb8(dynamic.to_rgb8()).save_with_format(path, format)
            }
            result => result,
        };

        result.map_err(|err| {
            // A failed encoder may leave a truncated file behind
            let _ = std::fs::remove_file(path);
            write_error(err.to_string())
        })
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl_enum_dispatch!(CropImage, U8, U16, F32; width(&self) -> u32);
impl_enum_dispatch!(CropImage, U8, U16, F32; height(&self) -> u32);
impl_enum_dispatch!(CropImage, U8, U16, F32; channels(&self) -> u32);
impl_enum_dispatch!(CropImage, U8, U16, F32; shape(&self) -> (u32, u32, u32));
impl_enum_dispatch!(CropImage, U8, U16, F32; len(&self) -> usize);
impl_enum_dispatch!(CropImage, U8, U16, F32; is_empty(&self) -> bool);

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl CropImage {
    /// Create a new image with copied cropped contents
    ///
    /// # Arguments
    ///
    /// * `x` - Minimum x-coordinate (left)
    /// * `y` - Minimum y-coordinate (top)
    /// * `w` - Width of crop
    /// * `h` - Height of crop
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<CropImage, BoxcropError> {
        match self {
            CropImage::U8(buffer) => Ok(CropImage::U8(buffer.crop(x, y, w, h)?)),
            CropImage::U16(buffer) => Ok(CropImage::U16(buffer.crop(x, y, w, h)?)),
            CropImage::F32(buffer) => Ok(CropImage::F32(buffer.crop(x, y, w, h)?)),
        }
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;
    use image::{GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

    fn rgb_gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([x as u8, y as u8, (x + y) as u8])
        }))
    }

    #[test]
    fn test_dynamic_keeps_alpha() {
        let dynamic = DynamicImage::ImageRgba8(RgbaImage::from_fn(4, 3, |x, _| {
            Rgba([x as u8, x as u8, x as u8, 7])
        }));

        let image = CropImage::new_from_default(dynamic).unwrap();
        assert_eq!(image.shape(), (3, 4, 4));

        let dynamic = DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(4, 3, |x, _| {
            LumaA([x as u8, 7])
        }));

        let image = CropImage::new_from_default(dynamic).unwrap();
        assert_eq!(image.channels(), 2);
    }

    #[test]
    fn test_dynamic_round_trip() {
        let dynamic = rgb_gradient(6, 5);
        let image = CropImage::new_from_default(dynamic.clone()).unwrap();

        assert_eq!(image.into_dynamic().unwrap(), dynamic);
    }

    #[test]
    fn test_crop_matches_source_region() {
        let dynamic = rgb_gradient(20, 10);
        let image = CropImage::new_from_default(dynamic.clone()).unwrap();

        let cropped = image.crop(4, 2, 8, 5).unwrap().into_dynamic().unwrap();
        let expected = dynamic.crop_imm(4, 2, 8, 5);

        assert_eq!(cropped, expected);
    }

    #[test]
    fn test_save_png_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");

        let dynamic = rgb_gradient(12, 9);
        let image = CropImage::new_from_default(dynamic).unwrap();
        let cropped = image.crop(3, 1, 5, 6).unwrap();

        cropped.clone().save(&path, None).unwrap();

        let reloaded = CropImage::open(&path).unwrap();
        assert_eq!(reloaded, cropped);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");

        let image = CropImage::new_from_default(rgb_gradient(12, 9)).unwrap();
        image.crop(0, 0, 4, 4).unwrap().save(&path, None).unwrap();
        image.crop(0, 0, 2, 3).unwrap().save(&path, None).unwrap();

        assert_eq!(CropImage::open(&path).unwrap().shape(), (3, 2, 3));
    }

    #[test]
    fn test_save_empty_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");

        let image = CropImage::new_from_default(rgb_gradient(4, 4)).unwrap();
        let empty = image.crop(3, 0, 0, 2).unwrap();

        let result = empty.save(&path, None);
        assert!(matches!(result, Err(BoxcropError::ImageWriteError(_, _))));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_alpha_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");

        let dynamic = DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 8, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }));

        CropImage::new_from_default(dynamic)
            .unwrap()
            .save(&path, None)
            .unwrap();

        let reloaded = CropImage::open(&path).unwrap();
        assert_eq!(reloaded.width(), 8);
        assert_eq!(reloaded.height(), 8);
    }

    #[test]
    fn test_save_without_extension_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a");

        let image = CropImage::new_from_default(DynamicImage::ImageLuma8(GrayImage::new(3, 3)))
            .unwrap();

        assert!(image.clone().save(&path, None).is_err());
        assert!(!path.exists());

        image.save(&path, Some(ImageFormat::Png)).unwrap();

        let (reloaded, format) = CropImage::open_with_format(&path).unwrap();
        assert_eq!(format, Some(ImageFormat::Png));
        assert_eq!(reloaded.shape(), (3, 3, 1));
    }

    #[test]
    fn test_open_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let result = CropImage::open(&path);
        assert!(matches!(result, Err(BoxcropError::ImageDecodeError(_, _))));

        let result = CropImage::open(dir.path().join("does_not_exist.png"));
        assert!(matches!(result, Err(BoxcropError::ImageDecodeError(_, _))));
    }
}

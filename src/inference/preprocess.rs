//! Image preprocessing
//!
//! Turns an uploaded, encoded image into the `(1, S, S, 3)` float tensor the
//! classifier was trained on: decode, force RGB, resize (no crop, aspect ratio
//! not kept), scale to `[0, 1]`, add the batch axis.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader, RgbImage};
use ndarray::Array4;
use tracing::debug;

use crate::utils::error::{LeafScanError, Result};

/// Side length the classifier expects
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Number of color channels in the tensor
pub const CHANNELS: usize = 3;

/// JPEG end-of-image marker
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Normalized image batch in NHWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    /// Wrap an existing NHWC array
    pub fn from_array(data: Array4<f32>) -> Self {
        Self { data }
    }

    /// Tensor shape as `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        let (n, h, w, c) = self.data.dim();
        [n, h, w, c]
    }

    pub fn array(&self) -> &Array4<f32> {
        &self.data
    }

    /// Contiguous row-major view of the values, if the layout allows it
    pub fn as_slice(&self) -> Option<&[f32]> {
        self.data.as_slice()
    }
}

/// Decodes and normalizes images for the classifier
#[derive(Debug, Clone)]
pub struct Preprocessor {
    image_size: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }
}

impl Preprocessor {
    pub fn new(image_size: u32) -> Self {
        Self { image_size }
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Shape of every tensor this preprocessor produces
    pub fn tensor_shape(&self) -> [usize; 4] {
        let side = self.image_size as usize;
        [1, side, side, CHANNELS]
    }

    /// Decode raw bytes into an image
    ///
    /// Any failure (unknown format, empty or truncated data) is an
    /// [`LeafScanError::InvalidImageFormat`].
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(LeafScanError::InvalidImageFormat("empty payload".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| LeafScanError::InvalidImageFormat(e.to_string()))?;

        let format = reader.format();
        if format == Some(ImageFormat::Jpeg) && !jpeg_is_complete(bytes) {
            return Err(LeafScanError::InvalidImageFormat(
                "JPEG data ends before the end-of-image marker".to_string(),
            ));
        }

        let image = reader.decode()?;

        debug!(
            "Decoded {:?} image: {}x{} ({:?})",
            format,
            image.width(),
            image.height(),
            image.color()
        );

        Ok(image)
    }

    /// Convert, resize and normalize an already decoded image
    pub fn preprocess_image(&self, image: &DynamicImage) -> ImageTensor {
        let rgb = image.to_rgb8();
        let resized = resize_image(&rgb, self.image_size);
        let tensor = normalize_image(&resized);

        debug!("Image shape after preprocessing: {:?}", tensor.shape());

        tensor
    }

    /// Full preprocessing of an encoded image
    pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor> {
        let image = self.decode(bytes)?;
        Ok(self.preprocess_image(&image))
    }

    /// All-zero tensor of the expected shape
    pub fn blank_tensor(&self) -> ImageTensor {
        let [n, h, w, c] = self.tensor_shape();
        ImageTensor::from_array(Array4::zeros((n, h, w, c)))
    }
}

/// Whether a JPEG payload runs up to its end-of-image marker
///
/// The JPEG decoder fills a cut-off scan with gray instead of failing, so
/// completeness is checked on the raw bytes. Trailing NULs and whitespace
/// after the marker are tolerated.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0 && !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_EOI)
}

/// Resize to a square of the given side, ignoring the aspect ratio
fn resize_image(image: &RgbImage, size: u32) -> RgbImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    image::imageops::resize(image, size, size, FilterType::CatmullRom)
}

/// Scale `[0, 255]` to `[0, 1]` and lay out as `(1, H, W, 3)`
fn normalize_image(image: &RgbImage) -> ImageTensor {
    let (width, height) = image.dimensions();

    let data = Array4::from_shape_fn(
        (1, height as usize, width as usize, CHANNELS),
        |(_, y, x, c)| image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    );

    ImageTensor::from_array(data)
}

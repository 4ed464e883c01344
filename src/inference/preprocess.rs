//! Image Preprocessing
//!
//! Turns raw upload bytes into the model's input tensor: decode, force RGB,
//! stretch to a fixed square, scale to [0, 1], add a batch axis.
//!
//! The resize does not preserve aspect ratio. Non-square inputs are
//! distorted; the stored weights were trained on the same stretched
//! inputs, so this is kept as is.

use image::{imageops::FilterType, DynamicImage, RgbImage};

use crate::utils::error::{OncoDataError, Result};
use crate::IMAGE_SIZE;

/// Float image tensor in NHWC layout with a batch of one
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    shape: [usize; 4],
}

impl ImageTensor {
    /// Wrap raw NHWC data. `data.len()` must equal the product of `shape`.
    pub fn new(data: Vec<f32>, shape: [usize; 4]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(OncoDataError::Inference(format!(
                "tensor data has {} values, shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { data, shape })
    }

    /// Shape as `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at batch `n`, row `y`, column `x`, channel `c`
    pub fn get(&self, n: usize, y: usize, x: usize, c: usize) -> Option<f32> {
        let [batch, h, w, ch] = self.shape;
        if n >= batch || y >= h || x >= w || c >= ch {
            return None;
        }
        self.data.get(((n * h + y) * w + x) * ch + c).copied()
    }
}

/// Deterministic image-to-tensor transformation
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    /// Target square edge in pixels
    pub image_size: u32,
    /// Resampling filter used for the stretch resize
    pub filter: FilterType,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            image_size: IMAGE_SIZE as u32,
            // Bicubic, the default of the library the weights were prepared with
            filter: FilterType::CatmullRom,
        }
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the target image size
    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = size;
        self
    }

    /// Configure the resampling filter
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Decode raw bytes into an image
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(OncoDataError::InvalidImage("empty upload".to_string()));
        }
        image::load_from_memory(bytes).map_err(|e| OncoDataError::InvalidImage(e.to_string()))
    }

    /// Force three channels and stretch to `image_size` x `image_size`
    pub fn to_model_rgb(&self, image: &DynamicImage) -> RgbImage {
        let rgb = image.to_rgb8();
        if rgb.dimensions() == (self.image_size, self.image_size) {
            return rgb;
        }
        image::imageops::resize(&rgb, self.image_size, self.image_size, self.filter)
    }

    /// Scale an RGB image to [0, 1] and prepend the batch axis
    pub fn to_tensor(&self, rgb: &RgbImage) -> ImageTensor {
        let (width, height) = rgb.dimensions();
        let data: Vec<f32> = rgb
            .as_raw()
            .iter()
            .map(|&v| v as f32 / 255.0)
            .collect();

        ImageTensor {
            data,
            shape: [1, height as usize, width as usize, 3],
        }
    }

    /// Full pipeline: bytes -> `[1, size, size, 3]` tensor
    pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor> {
        let image = self.decode(bytes)?;
        tracing::debug!(
            "Decoded {}x{} image ({:?})",
            image.width(),
            image.height(),
            image.color()
        );
        let rgb = self.to_model_rgb(&image);
        Ok(self.to_tensor(&rgb))
    }
}

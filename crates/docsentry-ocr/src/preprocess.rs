//! Image preprocessing ahead of OCR.
//!
//! Every variant starts from a 2× cubic upscale of the source, which helps the
//! engine with low-resolution phone photos.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageReader, ImageResult};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;

/// Neighbourhood size for the adaptive threshold.
const ADAPTIVE_BLOCK: u32 = 11;
/// Offset subtracted from the local mean.
const ADAPTIVE_C: i16 = 2;

/// Denoising heuristic applied before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preprocessing {
    /// Global Otsu threshold.
    Otsu,
    /// Gaussian-weighted local threshold.
    AdaptiveGaussian,
    Grayscale,
    /// Colour upscale only.
    Original,
}

impl Preprocessing {
    /// Fixed priority among the variants.
    pub const SEARCH_ORDER: [Self; 4] = [
        Self::Otsu,
        Self::AdaptiveGaussian,
        Self::Grayscale,
        Self::Original,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Otsu => "Otsu Threshold",
            Self::AdaptiveGaussian => "Adaptive Threshold",
            Self::Grayscale => "Grayscale Only",
            Self::Original => "Original",
        }
    }

    /// Apply this variant to an already upscaled image.
    pub fn apply(&self, upscaled: &DynamicImage) -> DynamicImage {
        match self {
            Self::Otsu => DynamicImage::ImageLuma8(otsu_threshold(&upscaled.to_luma8())),
            Self::AdaptiveGaussian => {
                DynamicImage::ImageLuma8(adaptive_gaussian_threshold(&upscaled.to_luma8()))
            }
            Self::Grayscale => DynamicImage::ImageLuma8(upscaled.to_luma8()),
            Self::Original => upscaled.clone(),
        }
    }
}

/// Decode an image from disk, sniffing the format from its contents.
pub fn load_image(path: &std::path::Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Double both dimensions with Catmull-Rom (cubic) interpolation.
pub fn upscale(image: &DynamicImage) -> DynamicImage {
    image.resize_exact(
        image.width().saturating_mul(2),
        image.height().saturating_mul(2),
        FilterType::CatmullRom,
    )
}

/// Grayscale then global Otsu threshold, without upscaling.
pub fn binarize(image: &DynamicImage) -> GrayImage {
    otsu_threshold(&image.to_luma8())
}

/// Pixels strictly above the Otsu level become white, the rest black.
pub fn otsu_threshold(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > level { 255 } else { 0 };
    }
    out
}

/// A pixel is white when it exceeds its Gaussian-weighted neighbourhood mean
/// minus [`ADAPTIVE_C`].
pub fn adaptive_gaussian_threshold(gray: &GrayImage) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, block_sigma(ADAPTIVE_BLOCK));
    let mut out = gray.clone();
    for (p, mean) in out.pixels_mut().zip(local_mean.pixels()) {
        let floor = i16::from(mean.0[0]) - ADAPTIVE_C;
        p.0[0] = if i16::from(p.0[0]) > floor { 255 } else { 0 };
    }
    out
}

/// Sigma the Gaussian kernel gets for a given odd block size.
fn block_sigma(block: u32) -> f32 {
    0.3 * ((block as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    /// Left half dark, right half light.
    fn split_image() -> DynamicImage {
        let img = RgbImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgb([30, 30, 30])
            } else {
                Rgb([220, 220, 220])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn upscale_doubles_dimensions() {
        let up = upscale(&split_image());
        assert_eq!((up.width(), up.height()), (32, 16));
    }

    #[test]
    fn otsu_separates_two_tones() {
        let bin = binarize(&split_image());
        assert_eq!(bin.get_pixel(0, 0), &Luma([0]));
        assert_eq!(bin.get_pixel(15, 7), &Luma([255]));
    }

    #[test]
    fn adaptive_output_is_binary() {
        let out = adaptive_gaussian_threshold(&split_image().to_luma8());
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // Flat regions sit above mean - C.
        assert_eq!(out.get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn block_sigma_for_eleven() {
        assert!((block_sigma(11) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn variants_keep_expected_colour_types() {
        let up = upscale(&split_image());
        for variant in Preprocessing::SEARCH_ORDER {
            let out = variant.apply(&up);
            assert_eq!((out.width(), out.height()), (32, 16));
            match variant {
                Preprocessing::Original => assert!(out.as_rgb8().is_some()),
                _ => assert!(out.as_luma8().is_some()),
            }
        }
    }

    #[test]
    fn load_image_sniffs_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        // PNG bytes behind a misleading extension.
        let path = tmp.path().join("card.dat");
        split_image()
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.width(), 16);
        assert!(load_image(&tmp.path().join("missing.png")).is_err());
    }
}

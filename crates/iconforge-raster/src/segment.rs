//! # Raster Segmentation
//!
//! Turns a rasterized icon into one binary mask per disjoint shape.
//!
//! Preprocessing runs in a fixed order: decode, integer upscale with cubic
//! interpolation, white border padding, 3×3 Gaussian blur, fixed threshold,
//! then a 2×2 morphological closing. Shapes are black (0) on white (255).
//!
//! Segmentation labels 8-connected black regions in raster-scan discovery
//! order and materializes each surviving region as its own full-size mask.

use iconforge_core::SegmentationError;
use iconforge_settings::SegmentationSettings;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use std::collections::VecDeque;
use tracing::{debug, info};

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Binarized, padded raster of the whole icon
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMask {
    image: GrayImage,
}

impl RasterMask {
    /// Wrap an already binarized image
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Decode and preprocess an encoded raster
    pub fn from_raster(
        raster: &[u8],
        settings: &SegmentationSettings,
    ) -> Result<Self, SegmentationError> {
        let decoded = image::load_from_memory(raster).map_err(|e| SegmentationError::Decode {
            reason: e.to_string(),
        })?;
        let gray = decoded.to_luma8();
        debug!(
            "Decoded raster {}x{} ({} bytes)",
            gray.width(),
            gray.height(),
            raster.len()
        );

        let upscaled = imageops::resize(
            &gray,
            gray.width() * settings.upscale,
            gray.height() * settings.upscale,
            FilterType::CatmullRom,
        );
        let mut image = pad(&upscaled, settings.padding);
        image = blur3(&image);
        threshold(&mut image, settings.threshold);
        image = close2(&image);

        Ok(Self { image })
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of shape (black) pixels
    pub fn foreground_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == BLACK).count()
    }
}

/// One isolated 8-connected shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeComponent {
    /// Label in raster-scan discovery order, starting at 1
    pub id: u32,
    /// Number of shape pixels
    pub pixel_count: usize,
    /// Full-size mask holding only this shape
    pub mask: GrayImage,
}

impl ShapeComponent {
    /// Encode the mask as a binary PGM for the tracer
    pub fn to_pgm(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Vec::new();
        PnmEncoder::new(&mut buf)
            .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
            .write_image(
                self.mask.as_raw(),
                self.mask.width(),
                self.mask.height(),
                ExtendedColorType::L8,
            )?;
        Ok(buf)
    }
}

/// Split a mask into components, dropping those below the noise floor
pub fn split_components(mask: &RasterMask, noise_floor: usize) -> Vec<ShapeComponent> {
    let image = mask.image();
    let (width, height) = image.dimensions();
    let w = width as usize;
    let h = height as usize;
    let pixels = image.as_raw();

    let mut labels = vec![0u32; w * h];
    let mut next_label = 0u32;
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..w * h {
        if pixels[start] != BLACK || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        queue.push_back(start);
        let mut members = Vec::new();

        while let Some(idx) = queue.pop_front() {
            members.push(idx);
            let x = idx % w;
            let y = idx / w;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let n = ny as usize * w + nx as usize;
                    if pixels[n] == BLACK && labels[n] == 0 {
                        labels[n] = next_label;
                        queue.push_back(n);
                    }
                }
            }
        }

        if members.len() < noise_floor {
            debug!(
                "Skipping component {} ({} px below noise floor {})",
                next_label,
                members.len(),
                noise_floor
            );
            continue;
        }

        let mut component_mask = GrayImage::from_pixel(width, height, Luma([WHITE]));
        for &idx in &members {
            component_mask.put_pixel((idx % w) as u32, (idx / w) as u32, Luma([BLACK]));
        }
        components.push(ShapeComponent {
            id: next_label,
            pixel_count: members.len(),
            mask: component_mask,
        });
    }

    info!(
        "Found {} components ({} labels before noise filtering)",
        components.len(),
        next_label
    );
    components
}

/// Preprocess an encoded raster and split it into shape components
pub fn segment_raster(
    raster: &[u8],
    settings: &SegmentationSettings,
) -> Result<Vec<ShapeComponent>, SegmentationError> {
    let mask = RasterMask::from_raster(raster, settings)?;
    let components = split_components(&mask, settings.noise_floor);
    if components.is_empty() {
        return Err(SegmentationError::NoShapes {
            raster_bytes: raster.len(),
        });
    }
    Ok(components)
}

fn pad(image: &GrayImage, padding: u32) -> GrayImage {
    let mut padded = GrayImage::from_pixel(
        image.width() + 2 * padding,
        image.height() + 2 * padding,
        Luma([WHITE]),
    );
    imageops::replace(&mut padded, image, padding as i64, padding as i64);
    padded
}

/// 1-2-1 Gaussian kernel, normalized
const GAUSSIAN_3X3: [f32; 9] = [
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    4.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
];

/// 3×3 Gaussian blur; pixels outside the raster count as white
fn blur3(image: &GrayImage) -> GrayImage {
    // filter3x3 leaves its outermost ring unfiltered, so filter a one pixel
    // larger canvas and crop it back
    let framed = pad(image, 1);
    let blurred: GrayImage = imageops::filter3x3(&framed, &GAUSSIAN_3X3);
    imageops::crop_imm(&blurred, 1, 1, image.width(), image.height()).to_image()
}

/// Luminance above the cutoff becomes white, everything else black
fn threshold(image: &mut GrayImage, cutoff: u8) {
    for pixel in image.pixels_mut() {
        *pixel = if pixel.0[0] > cutoff {
            Luma([WHITE])
        } else {
            Luma([BLACK])
        };
    }
}

/// 2×2 closing of the white region: dilate, then erode
fn close2(image: &GrayImage) -> GrayImage {
    let dilated = morph2(image, -1, u8::max);
    morph2(&dilated, 1, u8::min)
}

/// Combine each pixel with its 2×2 neighbourhood at offsets {0, step}
fn morph2(image: &GrayImage, step: i64, combine: fn(u8, u8) -> u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut value = image.get_pixel(x, y).0[0];
            for (dx, dy) in [(step, 0), (0, step), (step, step)] {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64 {
                    value = combine(value, image.get_pixel(nx as u32, ny as u32).0[0]);
                }
            }
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

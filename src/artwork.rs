use image::{imageops, RgbaImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pixels with alpha below this are background.
pub const ALPHA_THRESHOLD: u8 = 128;

/// A decoded sprite, cropped to its opaque pixels.
///
/// Pixels are row-major RGBA packed as `0xRRGGBBAA`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Artwork {
    /// RGBA of the pixel at `(x, y)`, `None` when out of bounds.
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y * self.width + x) as usize;
        self.pixels.get(index).map(|px| px.to_be_bytes())
    }

    /// RGB of the pixel at `(x, y)` if it is opaque.
    pub fn opaque_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let [r, g, b, a] = self.rgba(x, y)?;
        (a >= ALPHA_THRESHOLD).then_some((r, g, b))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ArtworkError {
    #[error("sprite decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("sprite has no visible pixels")]
    Empty,
}

pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, ArtworkError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (x, y, width, height) = opaque_bounds(&image).ok_or(ArtworkError::Empty)?;
    let cropped = imageops::crop_imm(&image, x, y, width, height).to_image();
    let pixels = cropped
        .pixels()
        .map(|px| u32::from_be_bytes(px.0))
        .collect();
    Ok(Artwork {
        width,
        height,
        pixels,
    })
}

fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0[3] < ALPHA_THRESHOLD {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

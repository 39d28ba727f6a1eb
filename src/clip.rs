//! Polygon-clipped pixel extraction.
//!
//! The output raster spans the polygon's bounding box. A pixel is copied from
//! the source when its center lies inside the polygon under the nonzero
//! winding rule; every other pixel stays fully transparent.

use std::cmp::Ordering;
use std::io::Cursor;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use eframe::egui::Pos2;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, Rgba, RgbaImage};

use crate::config::ExportFormat;
use crate::error::{CropError, Result};
use crate::points::bounding_box;

/// A polygon needs three vertices to enclose any area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Cuts the polygon `points` (image space) out of `image`.
pub fn extract(image: &DynamicImage, points: &[Pos2]) -> Result<CroppedResult> {
    if points.len() < MIN_POLYGON_VERTICES {
        return Err(CropError::InsufficientPoints {
            found: points.len(),
        });
    }
    let Some(bbox) = bounding_box(points) else {
        return Err(CropError::InsufficientPoints { found: 0 });
    };

    let width = bbox.width().round();
    let height = bbox.height().round();
    // Also rejects NaN coordinates.
    if !(width >= 1.0 && height >= 1.0) {
        return Err(CropError::DegeneratePolygon);
    }
    let (width, height) = (width as u32, height as u32);
    let origin_x = bbox.min.x.round() as i64;
    let origin_y = bbox.min.y.round() as i64;

    let (src_w, src_h) = (image.width() as i64, image.height() as i64);
    let mut output = RgbaImage::new(width, height);
    let mut crossings = Vec::with_capacity(points.len());

    for row in 0..height {
        let sy = origin_y + row as i64;
        if sy < 0 || sy >= src_h {
            continue;
        }
        row_crossings(points, sy as f32 + 0.5, &mut crossings);

        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].direction;
            if winding == 0 {
                continue;
            }
            // Columns whose center x + 0.5 falls in [start, end).
            let first = (pair[0].x - 0.5).ceil() as i64;
            let last = (pair[1].x - 0.5).ceil() as i64;
            let first = first.max(origin_x).max(0);
            let last = last.min(origin_x + width as i64).min(src_w);
            for sx in first..last {
                let pixel = image.get_pixel(sx as u32, sy as u32);
                output.put_pixel((sx - origin_x) as u32, row, pixel);
            }
        }
    }

    log::debug!(
        "extracted {}x{} region at ({}, {}) from {} vertices",
        width,
        height,
        origin_x,
        origin_y,
        points.len()
    );
    Ok(CroppedResult {
        image: output,
        origin: [origin_x, origin_y],
    })
}

#[derive(Clone, Copy, Debug)]
struct Crossing {
    x: f32,
    direction: i32,
}

/// Collects where the closed polygon crosses the horizontal line `y`,
/// sorted left to right. Edges are half-open in y so a vertex sitting
/// exactly on the line is counted once.
fn row_crossings(points: &[Pos2], y: f32, out: &mut Vec<Crossing>) {
    out.clear();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        if (a.y <= y) == (b.y <= y) {
            continue;
        }
        let t = (y - a.y) / (b.y - a.y);
        out.push(Crossing {
            x: a.x + t * (b.x - a.x),
            direction: if b.y > a.y { 1 } else { -1 },
        });
    }
    out.sort_by(|l, r| l.x.partial_cmp(&r.x).unwrap_or(Ordering::Equal));
}

/// Output of [`extract`]. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedResult {
    image: RgbaImage,
    origin: [i64; 2],
}

impl CroppedResult {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Top-left corner of the crop in source image pixels.
    pub fn origin(&self) -> [i64; 2] {
        self.origin
    }

    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let (w, h) = self.image.dimensions();
        match format {
            ExportFormat::Png => PngEncoder::new(Cursor::new(&mut bytes))
                .write_image(self.image.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(CropError::Encode)?,
            ExportFormat::Jpeg { quality } => {
                let flat = flatten_onto_white(&self.image);
                JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality)
                    .write_image(&flat, w, h, ExtendedColorType::Rgb8)
                    .map_err(CropError::Encode)?
            }
        }
        Ok(bytes)
    }

    /// `data:<mime>;base64,...` form, ready for inline display.
    pub fn to_data_url(&self, format: ExportFormat) -> Result<String> {
        let bytes = self.encode(format)?;
        Ok(format!(
            "data:{};base64,{}",
            format.mime_type(),
            BASE64.encode(bytes)
        ))
    }

    /// Writes the crop to `path`; the extension picks PNG or JPEG.
    pub fn save(&self, path: &Path, jpeg_quality: u8) -> Result<()> {
        let bytes = self.encode(ExportFormat::from_path(path, jpeg_quality))?;
        std::fs::write(path, bytes).map_err(|source| CropError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn flatten_onto_white(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for Rgba([r, g, b, a]) in image.pixels().copied() {
        let alpha = a as u32;
        for channel in [r, g, b] {
            rgb.push(((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8);
        }
    }
    rgb
}

use std::path::Path;

use eframe::egui::Color32;

/// Presentation and behaviour constants for the cropper.
///
/// A plain value table: built once with [`Default`] and handed to whoever
/// needs it, never mutated behind anyone's back.
#[derive(Debug, Clone)]
pub struct CropperConfig {
    /// Distance in display pixels at which a pointer counts as "on" a vertex.
    pub hit_radius: f32,
    /// Radius of the drawn vertex handles, in display pixels.
    pub handle_radius: f32,
    pub stroke_width: f32,
    pub handle_outline_width: f32,
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub handle_color: Color32,
    pub handle_outline_color: Color32,
    /// Gap kept around the image inside the canvas area.
    pub canvas_padding: f32,
    /// Fraction of the largest fitting rectangle used by rectangle presets.
    pub preset_coverage: f32,
    pub default_file_name: &'static str,
    pub jpeg_quality: u8,
    pub max_file_size: u64,
    pub accepted_extensions: &'static [&'static str],
    pub window_size: [f32; 2],
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            hit_radius: 10.0,
            handle_radius: 6.0,
            stroke_width: 2.0,
            handle_outline_width: 2.0,
            stroke_color: Color32::from_rgb(25, 118, 210),
            fill_color: Color32::from_rgba_unmultiplied(25, 118, 210, 51),
            handle_color: Color32::from_rgb(25, 118, 210),
            handle_outline_color: Color32::WHITE,
            canvas_padding: 20.0,
            preset_coverage: 0.8,
            default_file_name: "cropped-image.png",
            jpeg_quality: 95,
            max_file_size: 50 * 1024 * 1024,
            accepted_extensions: &["png", "jpg", "jpeg", "gif", "bmp"],
            window_size: [900.0, 700.0],
        }
    }
}

/// Encoding used when a crop leaves the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    /// No alpha channel; transparent pixels are flattened onto white.
    Jpeg { quality: u8 },
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }

    /// Picks the format from a file extension, falling back to PNG.
    pub fn from_path(path: &Path, jpeg_quality: u8) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => ExportFormat::Jpeg {
                quality: jpeg_quality,
            },
            _ => ExportFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/crop.JPEG"), 80),
            ExportFormat::Jpeg { quality: 80 }
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("crop.png"), 80),
            ExportFormat::Png
        );
        assert_eq!(ExportFormat::from_path(Path::new("crop"), 80), ExportFormat::Png);
    }

    #[test]
    fn extension_maps_back_to_same_format() {
        for format in [ExportFormat::Png, ExportFormat::Jpeg { quality: 70 }] {
            let name = format!("crop.{}", format.extension());
            assert_eq!(ExportFormat::from_path(Path::new(&name), 70), format);
        }
        assert_eq!(ExportFormat::Jpeg { quality: 1 }.mime_type(), "image/jpeg");
    }

    #[test]
    fn default_file_name_is_png() {
        let config = CropperConfig::default();
        assert_eq!(
            ExportFormat::from_path(Path::new(config.default_file_name), config.jpeg_quality),
            ExportFormat::Png
        );
    }
}

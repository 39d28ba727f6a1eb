use std::path::PathBuf;

/// Everything that can go wrong between picking a file and writing a crop.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a readable image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("file is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("need at least 3 points to crop, have {found}")]
    InsufficientPoints { found: usize },

    #[error("polygon encloses no area")]
    DegeneratePolygon,

    #[error("no image loaded")]
    NoImage,
}

pub type Result<T> = std::result::Result<T, CropError>;

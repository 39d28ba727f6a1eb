//! Reading and decoding image files, optionally off the UI thread.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam::channel::Sender;
use image::DynamicImage;

use crate::error::{CropError, Result};

/// Identifies one load request; only the newest ticket may install an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub(crate) u64);

/// Completion message sent back by [`spawn_decode`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub path: PathBuf,
    pub result: Result<DynamicImage>,
}

/// Decodes an in-memory file, sniffing the format from its header.
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(CropError::Decode)
}

/// Like [`decode_bytes`], refusing buffers over `max_file_size` bytes.
pub fn decode_bytes_limited(bytes: &[u8], max_file_size: u64) -> Result<DynamicImage> {
    check_size(bytes.len() as u64, max_file_size)?;
    decode_bytes(bytes)
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(CropError::TooLarge { size, limit });
    }
    Ok(())
}

/// Reads and decodes `path`, refusing files over `max_file_size` bytes.
pub fn decode_path(path: &Path, max_file_size: u64) -> Result<DynamicImage> {
    let io_err = |source| CropError::Io {
        path: path.to_path_buf(),
        source,
    };
    check_size(std::fs::metadata(path).map_err(io_err)?.len(), max_file_size)?;
    let bytes = std::fs::read(path).map_err(io_err)?;
    decode_bytes(&bytes)
}

/// Decodes `path` on a worker thread and reports through `sender`.
pub fn spawn_decode(
    path: PathBuf,
    ticket: LoadTicket,
    max_file_size: u64,
    sender: Sender<LoadOutcome>,
) {
    thread::spawn(move || {
        let result = decode_path(&path, max_file_size);
        if sender
            .send(LoadOutcome {
                ticket,
                path,
                result,
            })
            .is_err()
        {
            log::debug!("load receiver gone, dropping decoded image");
        }
    });
}

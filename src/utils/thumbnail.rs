use crate::domain::AppError;

const MAX_WIDTH: u32 = 320;
const MAX_HEIGHT: u32 = 180;

/// Decoded thumbnail, RGBA8 pixels ready for the image widget
#[derive(Clone)]
pub struct ThumbnailImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for ThumbnailImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode any supported image format and shrink it to fit the result panel
pub fn decode_thumbnail(data: &[u8]) -> Result<ThumbnailImage, AppError> {
    let img = image::load_from_memory(data).map_err(|e| AppError::Thumbnail(e.to_string()))?;

    let img = if img.width() > MAX_WIDTH || img.height() > MAX_HEIGHT {
        img.thumbnail(MAX_WIDTH, MAX_HEIGHT)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ThumbnailImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

use crate::configuration::TrackingSettings;
use rocket::http::ContentType;
use std::path::PathBuf;

/// A transparent 1x1 GIF.
pub const EMBEDDED_PIXEL: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// The image returned once an open has been registered.
#[derive(Debug, Clone)]
pub enum TrackingPixel {
    Embedded,
    /// Read on every request, so a file removed at runtime turns into a 500.
    File(PathBuf),
}

impl TrackingPixel {
    pub fn from_settings(settings: &TrackingSettings) -> Self {
        match &settings.pixel_path {
            Some(path) => TrackingPixel::File(path.clone()),
            None => TrackingPixel::Embedded,
        }
    }

    pub async fn load(&self) -> Result<(ContentType, Vec<u8>), std::io::Error> {
        match self {
            TrackingPixel::Embedded => Ok((ContentType::GIF, EMBEDDED_PIXEL.to_vec())),
            TrackingPixel::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                let content_type = path
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .and_then(ContentType::from_extension)
                    .unwrap_or(ContentType::PNG);
                Ok((content_type, bytes))
            }
        }
    }
}

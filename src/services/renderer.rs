//! Image export of QR codes: PNG, JPEG or SVG at fixed square sizes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;
use thiserror::Error;

pub const ALLOWED_SIZES: [u32; 4] = [300, 512, 1024, 2048];
const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported size {0}px, choose one of 300, 512, 1024 or 2048")]
    UnsupportedSize(u32),
    #[error("content cannot be encoded as a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
    Svg,
}

impl DownloadFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DownloadFormat::Png => "png",
            DownloadFormat::Jpg => "jpg",
            DownloadFormat::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DownloadFormat::Png => "image/png",
            DownloadFormat::Jpg => "image/jpeg",
            DownloadFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Debug)]
pub struct RenderedQr {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub fn file_name(name: &str, size: u32, format: DownloadFormat) -> String {
    format!("{}-{}px.{}", name, size, format.extension())
}

/// Render `content` as a `size`×`size` image named after `name`.
pub fn render_qr(
    content: &str,
    name: &str,
    format: DownloadFormat,
    size: u32,
) -> Result<RenderedQr, RenderError> {
    if !ALLOWED_SIZES.contains(&size) {
        return Err(RenderError::UnsupportedSize(size));
    }

    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::H)?;

    let bytes = match format {
        DownloadFormat::Svg => code
            .render::<svg::Color<'_>>()
            .min_dimensions(size, size)
            .quiet_zone(true)
            .build()
            .into_bytes(),
        DownloadFormat::Png | DownloadFormat::Jpg => {
            let raster = code
                .render::<Luma<u8>>()
                .min_dimensions(size, size)
                .quiet_zone(true)
                .build();
            // Module rounding can overshoot; scale to the exact requested size
            let raster = imageops::resize(&raster, size, size, FilterType::Nearest);

            let mut buf = Vec::new();
            if format == DownloadFormat::Png {
                raster.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            } else {
                JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&raster)?;
            }
            buf
        }
    };

    Ok(RenderedQr {
        bytes,
        content_type: format.content_type(),
        file_name: file_name(name, size, format),
    })
}

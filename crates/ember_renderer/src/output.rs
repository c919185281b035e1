//! Image encoders: PPM (text and binary) and PNG.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::Framebuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output extension '{0}' (expected .ppm, .pnm or .png)")]
    UnsupportedExtension(String),

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Plain-text PPM (`P3`)
    Ppm,
    /// Binary PPM (`P6`)
    PpmBinary,
    Png,
}

impl ImageFormat {
    /// Pick a format from the file extension: `.ppm` is text, `.pnm` binary.
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ppm" => Ok(ImageFormat::Ppm),
            "pnm" => Ok(ImageFormat::PpmBinary),
            "png" => Ok(ImageFormat::Png),
            _ => Err(OutputError::UnsupportedExtension(extension)),
        }
    }
}

/// Write a plain-text PPM: one `r g b` line per pixel, top scanline first.
pub fn write_ppm<W: Write>(writer: &mut W, framebuffer: &Framebuffer) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", framebuffer.width(), framebuffer.height())?;
    writeln!(writer, "255")?;

    for [r, g, b] in framebuffer.to_rgb8() {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Write a binary PPM (`P6`).
pub fn write_ppm_binary<W: Write>(writer: &mut W, framebuffer: &Framebuffer) -> io::Result<()> {
    write!(
        writer,
        "P6\n{} {}\n255\n",
        framebuffer.width(),
        framebuffer.height()
    )?;

    let pixels = framebuffer.to_rgb8();
    writer.write_all(bytemuck::cast_slice(&pixels))?;
    Ok(())
}

/// Encode `framebuffer` to `path` in the given format.
pub fn save_image(
    framebuffer: &Framebuffer,
    path: &Path,
    format: ImageFormat,
) -> Result<(), OutputError> {
    match format {
        ImageFormat::Ppm | ImageFormat::PpmBinary => {
            let mut writer = BufWriter::new(File::create(path)?);
            if format == ImageFormat::Ppm {
                write_ppm(&mut writer, framebuffer)?;
            } else {
                write_ppm_binary(&mut writer, framebuffer)?;
            }
            writer.flush()?;
        }
        ImageFormat::Png => {
            let (width, height) = (framebuffer.width(), framebuffer.height());
            let bytes: Vec<u8> = bytemuck::cast_slice(&framebuffer.to_rgb8()).to_vec();
            let img = image::RgbImage::from_raw(width, height, bytes)
                .ok_or(OutputError::BufferSize { width, height })?;
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
    }

    info!("Image saved as {} ({:?})", path.display(), format);
    Ok(())
}

//! PNG decode/encode for source bitmaps.
//!
//! Supports 8-bit RGB and RGBA images; other color types and depths are
//! rejected with a descriptive error rather than being silently converted.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use thiserror::Error;

use rasterlogic_core::{Pixmap, Rgba};

#[derive(Error, Debug)]
pub enum PngError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("unsupported PNG format: {color_type:?} at {bit_depth:?}")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

/// Decode a PNG file into a [`Pixmap`].
pub fn load_png(path: &Path) -> Result<Pixmap, PngError> {
    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(PngError::UnsupportedFormat {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let pixels: Vec<Rgba> = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| Rgba::opaque(c[0], c[1], c[2]))
            .collect(),
        other => {
            return Err(PngError::UnsupportedFormat {
                color_type: other,
                bit_depth: info.bit_depth,
            })
        }
    };

    log::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        info.width,
        info.height,
        info.color_type
    );
    Ok(Pixmap::from_pixels(info.width, info.height, pixels))
}

/// Encode a [`Pixmap`] as an 8-bit RGBA PNG file.
pub fn save_png(path: &Path, pixmap: &Pixmap) -> Result<(), PngError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut data = Vec::with_capacity((pixmap.width() * pixmap.height() * 4) as usize);
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            let p = pixmap.get(x, y);
            data.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
    writer.write_image_data(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path(suffix: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rasterlogic-png-{}{}", Uuid::new_v4(), suffix))
    }

    #[test]
    fn test_rgba_roundtrip() {
        let mut p = Pixmap::new(3, 2);
        p.set(0, 0, Rgba::new(255, 0, 0, 255));
        p.set(1, 0, Rgba::new(0, 255, 0, 128));
        p.set(2, 1, Rgba::new(0, 0, 255, 0));

        let path = temp_path(".png");
        save_png(&path, &p).unwrap();
        let back = load_png(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, p);
    }

    #[test]
    fn test_rgb_decodes_opaque() {
        let path = temp_path(".png");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[10, 20, 30, 40, 50, 60]).unwrap();
        }

        let back = load_png(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.get(0, 0), Rgba::opaque(10, 20, 30));
        assert_eq!(back.get(1, 0), Rgba::opaque(40, 50, 60));
    }

    #[test]
    fn test_grayscale_is_rejected() {
        let path = temp_path(".png");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 255]).unwrap();
        }

        let err = load_png(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, PngError::UnsupportedFormat { .. }));
    }
}

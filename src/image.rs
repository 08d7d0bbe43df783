use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

/// How the pixels end up in the PDF
pub enum ImageData {
    /// Baseline RGB JPEGs can be copied into the PDF byte for byte
    Jpeg(Vec<u8>),
    /// Everything else is decoded and re-encoded as deflated RGB
    Decoded(DynamicImage),
}

/// A raster image that can be placed (and re-used) on any page of a document
pub struct Image {
    pub data: ImageData,
    /// width in pixels
    pub width: u32,
    /// height in pixels
    pub height: u32,
}

struct Encoded {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load a PNG, JPEG, or any other format the [image] crate can decode
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image, PDFError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::debug!("loaded image {:?} ({} bytes)", path, bytes.len());
        Image::new_from_bytes(bytes)
    }

    pub fn new_from_bytes(bytes: Vec<u8>) -> Result<Image, PDFError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        let (width, height) = decoded.dimensions();

        let data = match (format, decoded.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => ImageData::Jpeg(bytes),
            _ => ImageData::Decoded(decoded),
        };

        Ok(Image {
            data,
            width,
            height,
        })
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let (width, height) = image.dimensions();
        Image {
            data: ImageData::Decoded(image),
            width,
            height,
        }
    }

    /// width / height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    fn encode(&self) -> Encoded {
        match &self.data {
            ImageData::Jpeg(bytes) => Encoded {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            ImageData::Decoded(image) => {
                let level = CompressionLevel::DefaultLevel as u8;
                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });
                Encoded {
                    filter: Filter::FlateDecode,
                    bytes: compress_to_vec_zlib(image.to_rgb8().as_raw(), level),
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.get_or_gen(RefType::Image(image_index));
        let encoded = self.encode();
        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, &encoded.bytes);
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask);
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn png_bytes_are_decoded_with_dimensions() {
        let mut png = Vec::new();
        let pixels = RgbaImage::from_pixel(4, 2, Rgba([182, 165, 141, 128]));
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let image = Image::new_from_bytes(png).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.aspect_ratio(), 2.0);
        assert!(matches!(image.data, ImageData::Decoded(_)));
        assert!(image.encode().mask.is_some());
    }

    #[test]
    fn garbage_is_an_image_error() {
        let result = Image::new_from_bytes(b"definitely not an image".to_vec());
        assert!(matches!(result, Err(PDFError::Image(_))));
    }
}

//! Upload decoding and result encoding

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage};

/// Image codec errors
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl ImagingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Encoding used for the marked-up image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(format!("unsupported output format '{}'", other)),
        }
    }
}

/// Decode an uploaded image, apply its EXIF orientation and convert to RGB
pub fn decode_upright(data: &[u8]) -> Result<RgbImage, ImagingError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImagingError::Decode(e.to_string()))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ImagingError::Decode(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| ImagingError::Decode(e.to_string()))?;

    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|e| ImagingError::Decode(e.to_string()))?;
    image.apply_orientation(orientation);

    Ok(image.to_rgb8())
}

/// Encode an RGB image
pub fn encode(image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>, ImagingError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format.image_format())
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode an RGB image and wrap it in base64 for a JSON response
pub fn encode_base64(image: &RgbImage, format: OutputFormat) -> Result<String, ImagingError> {
    use base64::Engine;

    let bytes = encode(image, format)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(40, 20, |x, _| Rgb([(x * 6) as u8, 80, 160]))
    }

    #[test]
    fn test_decode_png() {
        let png = encode(&sample(), OutputFormat::Png).unwrap();
        let decoded = decode_upright(&png).unwrap();

        assert_eq!(decoded.dimensions(), (40, 20));
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_decode_jpeg_keeps_dimensions() {
        let jpeg = encode(&sample(), OutputFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = decode_upright(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (40, 20));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_upright(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImagingError::Decode(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_encode_base64() {
        use base64::Engine;

        let encoded = encode_base64(&sample(), OutputFormat::Png).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert!("gif".parse::<OutputFormat>().is_err());
    }
}

//! Source loading and decoding.
//!
//! Loading (reading a file, fetching a URL, unpacking a data URL) is the only
//! asynchronous step in the whole pipeline. Decoding itself is synchronous
//! and is exposed separately through [`Decoder::decode_bytes`] for hosts
//! that have no async runtime.

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose};
use percent_encoding::percent_decode_str;

use crate::backend::RasterBackend;
use crate::error::DecodeError;
use crate::raster::RasterImage;

/// Upload size cap applied by the editor's file picker (5 MiB).
///
/// The pipeline does not enforce it on its own; callers opt in through
/// [`DecodeOptions::max_bytes`].
pub const DEFAULT_UPLOAD_LIMIT: u64 = 5 * 1024 * 1024;

// ============================================================================
// ImageSource
// ============================================================================

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A `data:` URL, base64 or percent-encoded.
    DataUrl(String),
    /// Raw file contents with an optional MIME type (e.g. from a file picker).
    Bytes { bytes: Vec<u8>, mime: Option<String> },
    /// A local file.
    File(PathBuf),
    /// An `http://` or `https://` URL. Requires the `http` feature.
    Url(String),
}

impl ImageSource {
    /// Classifies a textual reference.
    ///
    /// `data:` becomes [`DataUrl`](Self::DataUrl), `http(s)://` becomes
    /// [`Url`](Self::Url), and anything else is treated as a file path
    /// (with an optional `file://` prefix).
    pub fn from_reference(reference: &str) -> Self {
        let trimmed = reference.trim();
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("data:") {
            Self::DataUrl(trimmed.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else if lower.starts_with("file://") {
            Self::File(PathBuf::from(&trimmed["file://".len()..]))
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>, mime: Option<&str>) -> Self {
        Self::Bytes {
            bytes: bytes.into(),
            mime: mime.map(str::to_string),
        }
    }

    /// Short label used in log lines.
    fn label(&self) -> &'static str {
        match self {
            Self::DataUrl(_) => "data-url",
            Self::Bytes { .. } => "bytes",
            Self::File(_) => "file",
            Self::Url(_) => "url",
        }
    }
}

// ============================================================================
// Source kind detection
// ============================================================================

/// Raster formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Png,
    Jpeg,
    Svg,
}

impl SourceKind {
    /// Maps a MIME type to a kind. Parameters such as `;charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Sniffs the kind from the payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => return Some(Self::Png),
            Ok(image::ImageFormat::Jpeg) => return Some(Self::Jpeg),
            Ok(_) => return None,
            Err(_) => {}
        }

        let text = std::str::from_utf8(bytes).ok()?;
        let head = text.trim_start_matches('\u{feff}').trim_start();
        let looks_like_markup = head.starts_with("<svg") || head.starts_with("<?xml") || head.starts_with("<!--");
        (looks_like_markup && text.contains("<svg")).then_some(Self::Svg)
    }
}

// ============================================================================
// Data URLs
// ============================================================================

/// The decoded parts of a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parses `data:[<mime>][;base64],<payload>`.
    pub fn parse(url: &str) -> Result<Self, DecodeError> {
        let trimmed = url.trim();
        let rest = trimmed
            .get(..5)
            .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
            .map(|_| &trimmed[5..])
            .ok_or_else(|| DecodeError::InvalidDataUrl("missing `data:` scheme".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DecodeError::InvalidDataUrl("missing `,` separator".to_string()))?;

        let mut params = header.split(';');
        let mime = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let bytes = if is_base64 {
            let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            general_purpose::STANDARD.decode(cleaned)?
        } else {
            percent_decode_str(payload).collect()
        };

        Ok(Self { mime, bytes })
    }
}

// ============================================================================
// Decoder
// ============================================================================

/// Options applied while loading a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Rejects payloads larger than this many bytes. `None` means no cap.
    pub max_bytes: Option<u64>,
}

impl DecodeOptions {
    /// Options with the editor's 5 MiB upload cap.
    pub fn with_upload_limit() -> Self {
        Self {
            max_bytes: Some(DEFAULT_UPLOAD_LIMIT),
        }
    }
}

/// Turns an [`ImageSource`] into a [`RasterImage`].
pub struct Decoder<B> {
    backend: B,
    options: DecodeOptions,
}

impl<B: RasterBackend> Decoder<B> {
    pub fn new(backend: B, options: DecodeOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads and decodes a source.
    ///
    /// The returned future resolves only once the raster is fully decoded
    /// or decoding has failed, so no caller can observe a partial image.
    pub async fn decode(&self, source: ImageSource) -> Result<RasterImage, DecodeError> {
        let label = source.label();
        let (bytes, mime) = self.load(source).await?;
        log::debug!("loaded {} bytes from {} source", bytes.len(), label);
        self.decode_bytes(&bytes, mime.as_deref())
    }

    /// Decodes an in-memory payload.
    ///
    /// `mime` is a hint; when it is missing or unrecognised the format is
    /// sniffed from the bytes.
    pub fn decode_bytes(&self, bytes: &[u8], mime: Option<&str>) -> Result<RasterImage, DecodeError> {
        self.check_size(bytes.len() as u64)?;

        let hinted = mime.and_then(|m| {
            let kind = SourceKind::from_mime(m);
            if kind.is_none() {
                log::warn!("ignoring unrecognised MIME hint `{}`", m);
            }
            kind
        });

        let kind = hinted
            .or_else(|| SourceKind::sniff(bytes))
            .ok_or_else(|| {
                DecodeError::UnsupportedFormat(
                    mime.map(str::to_string)
                        .unwrap_or_else(|| "unrecognised content".to_string()),
                )
            })?;

        let image = match kind {
            SourceKind::Png | SourceKind::Jpeg => self.backend.decode_bitmap(bytes)?,
            SourceKind::Svg => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| DecodeError::UnsupportedFormat(format!("SVG is not UTF-8: {e}")))?;
                self.backend.rasterize_svg(text)?
            }
        };

        log::debug!(
            "decoded {:?} source to {}x{}",
            kind,
            image.width(),
            image.height()
        );
        Ok(image)
    }

    async fn load(&self, source: ImageSource) -> Result<(Vec<u8>, Option<String>), DecodeError> {
        match source {
            ImageSource::DataUrl(url) => {
                let parsed = DataUrl::parse(&url)?;
                Ok((parsed.bytes, parsed.mime))
            }
            ImageSource::Bytes { bytes, mime } => Ok((bytes, mime)),
            ImageSource::File(path) => self.load_file(path).await,
            ImageSource::Url(url) => self.fetch(&url).await,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn load_file(&self, path: PathBuf) -> Result<(Vec<u8>, Option<String>), DecodeError> {
        if let Some(limit) = self.options.max_bytes {
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|source| DecodeError::Io {
                    path: path.clone(),
                    source,
                })?;
            if metadata.len() > limit {
                return Err(DecodeError::TooLarge {
                    size: metadata.len(),
                    limit,
                });
            }
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| DecodeError::Io {
                path: path.clone(),
                source,
            })?;
        Ok((bytes, mime_from_extension(&path)))
    }

    #[cfg(target_arch = "wasm32")]
    async fn load_file(&self, path: PathBuf) -> Result<(Vec<u8>, Option<String>), DecodeError> {
        Err(DecodeError::UnsupportedSource(format!(
            "file access is not available in this host: {}",
            path.display()
        )))
    }

    #[cfg(feature = "http")]
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>), DecodeError> {
        let response = reqwest::get(url).await?.error_for_status()?;
        if let (Some(limit), Some(len)) = (self.options.max_bytes, response.content_length()) {
            if len > limit {
                return Err(DecodeError::TooLarge { size: len, limit });
            }
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok((bytes, mime))
    }

    #[cfg(not(feature = "http"))]
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Option<String>), DecodeError> {
        Err(DecodeError::UnsupportedSource(format!(
            "fetching URLs requires the `http` feature: {url}"
        )))
    }

    fn check_size(&self, size: u64) -> Result<(), DecodeError> {
        match self.options.max_bytes {
            Some(limit) if size > limit => Err(DecodeError::TooLarge { size, limit }),
            _ => Ok(()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn mime_from_extension(path: &std::path::Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SoftwareBackend;

    const TINY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"><rect width="4" height="2" fill="#00ff00"/></svg>"##;

    fn decoder() -> Decoder<SoftwareBackend> {
        Decoder::new(SoftwareBackend, DecodeOptions::default())
    }

    fn png_bytes(img: &RasterImage) -> Vec<u8> {
        SoftwareBackend.encode_png(img).unwrap()
    }

    #[test]
    fn reference_classification() {
        assert!(matches!(
            ImageSource::from_reference("data:image/png;base64,AAAA"),
            ImageSource::DataUrl(_)
        ));
        assert!(matches!(
            ImageSource::from_reference("https://example.com/logo.png"),
            ImageSource::Url(_)
        ));
        assert_eq!(
            ImageSource::from_reference("file:///tmp/logo.png"),
            ImageSource::File(PathBuf::from("/tmp/logo.png"))
        );
        assert_eq!(
            ImageSource::from_reference("logo.svg"),
            ImageSource::File(PathBuf::from("logo.svg"))
        );
    }

    #[test]
    fn data_url_base64() {
        let parsed = DataUrl::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(parsed.mime.as_deref(), Some("image/png"));
        assert_eq!(parsed.bytes, b"hello");
    }

    #[test]
    fn data_url_percent_encoded() {
        let parsed = DataUrl::parse("data:image/svg+xml;utf8,%3Csvg%3E%3C/svg%3E").unwrap();
        assert_eq!(parsed.mime.as_deref(), Some("image/svg+xml"));
        assert_eq!(parsed.bytes, b"<svg></svg>");
    }

    #[test]
    fn data_url_errors() {
        assert!(matches!(
            DataUrl::parse("image/png;base64,AAAA"),
            Err(DecodeError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64"),
            Err(DecodeError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,!!!"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn data_url_scheme_is_case_insensitive() {
        let url = "Data:image/png;base64,aGVsbG8=";
        assert!(matches!(ImageSource::from_reference(url), ImageSource::DataUrl(_)));
        assert_eq!(DataUrl::parse(url).unwrap().bytes, b"hello");
        assert_eq!(DataUrl::parse("DATA:,hi").unwrap().bytes, b"hi");
    }

    #[test]
    fn mime_mapping_ignores_parameters() {
        assert_eq!(SourceKind::from_mime("image/svg+xml;charset=utf-8"), Some(SourceKind::Svg));
        assert_eq!(SourceKind::from_mime("IMAGE/JPEG"), Some(SourceKind::Jpeg));
        assert_eq!(SourceKind::from_mime("image/gif"), None);
    }

    #[test]
    fn sniff_detects_formats() {
        let png = png_bytes(&RasterImage::filled(1, 1, [0, 0, 0, 255]));
        assert_eq!(SourceKind::sniff(&png), Some(SourceKind::Png));
        assert_eq!(SourceKind::sniff(TINY_SVG.as_bytes()), Some(SourceKind::Svg));
        assert_eq!(
            SourceKind::sniff(b"<?xml version=\"1.0\"?>\n<svg/>"),
            Some(SourceKind::Svg)
        );
        assert_eq!(SourceKind::sniff(b"GIF89a...."), None);
        assert_eq!(SourceKind::sniff(b"plain text"), None);
    }

    #[test]
    fn decode_bytes_png() {
        let source = RasterImage::filled(3, 3, [200, 200, 200, 255]);
        let decoded = decoder().decode_bytes(&png_bytes(&source), None).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn decode_bytes_svg() {
        let decoded = decoder().decode_bytes(TINY_SVG.as_bytes(), Some("image/svg+xml")).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        assert_eq!(decoded.pixel(0, 0), Some([0, 255, 0, 255]));
    }

    #[test]
    fn decode_bytes_rejects_garbage() {
        let err = decoder().decode_bytes(b"definitely not an image", None).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn decode_bytes_rejects_truncated_png() {
        let mut source = RasterImage::new(16, 16);
        for (x, y, px) in source.as_rgba_mut().enumerate_pixels_mut() {
            px.0 = [(x * 16) as u8, (y * 16) as u8, 77, 255];
        }
        let png = png_bytes(&source);
        let truncated = &png[..png.len() / 2];

        let err = decoder().decode_bytes(truncated, Some("image/png")).unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)), "got {err:?}");
    }

    #[test]
    fn decode_bytes_rejects_oversized_svg() {
        let huge = br#"<svg xmlns="http://www.w3.org/2000/svg" width="40000" height="40000"/>"#;
        let decoder = Decoder::new(SoftwareBackend, DecodeOptions::with_upload_limit());
        let err = decoder.decode_bytes(huge, Some("image/svg+xml")).unwrap_err();
        assert!(matches!(err, DecodeError::RasterTooLarge { .. }), "got {err:?}");
    }

    #[test]
    fn unknown_mime_falls_back_to_sniffing() {
        let source = RasterImage::filled(2, 2, [1, 2, 3, 255]);
        let decoded = decoder()
            .decode_bytes(&png_bytes(&source), Some("application/octet-stream"))
            .unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn size_cap_is_enforced() {
        let decoder = Decoder::new(SoftwareBackend, DecodeOptions { max_bytes: Some(8) });
        let err = decoder.decode_bytes(TINY_SVG.as_bytes(), None).unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { limit: 8, .. }));
    }

    #[tokio::test]
    async fn decode_data_url_source() {
        let source = RasterImage::filled(2, 1, [50, 50, 50, 255]);
        let url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png_bytes(&source))
        );

        let decoded = decoder().decode(ImageSource::from_reference(&url)).await.unwrap();
        assert_eq!(decoded, source);
    }

    #[tokio::test]
    async fn decode_missing_file_reports_path() {
        let path = std::env::temp_dir().join("logoshift-definitely-missing.png");
        let err = decoder().decode(ImageSource::File(path.clone())).await.unwrap_err();
        match err {
            DecodeError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn decode_file_source() {
        let path = std::env::temp_dir().join(format!("logoshift-decode-{}.svg", std::process::id()));
        tokio::fs::write(&path, TINY_SVG).await.unwrap();

        let decoded = decoder().decode(ImageSource::File(path.clone())).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(decoded.unwrap().dimensions().width, 4);
    }

    #[cfg(not(feature = "http"))]
    #[tokio::test]
    async fn url_source_needs_http_feature() {
        let err = decoder()
            .decode(ImageSource::Url("https://example.com/a.png".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedSource(_)));
    }
}

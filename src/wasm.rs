//! Browser bindings.
//!
//! [`LogoEditor`] holds one decoded logo and the chosen background, and
//! exposes preview and export to JavaScript.
//!
//! # Feature Flag
//!
//! Only available with the `wasm` feature enabled:
//!
//! ```toml
//! [dependencies]
//! logoshift = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { LogoEditor } from 'logoshift';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = LogoEditor.fromBytes(bytes, file.type);
//!
//! editor.setBackground('#1e90ff');
//! editor.renderToCanvas(document.getElementById('preview'), 'white');
//!
//! const config = JSON.stringify({ variant: 'white', includeBackground: true, format: 'pdf' });
//! const blob = new Blob([editor.exportBytes(config)], { type: 'application/pdf' });
//! const name = editor.exportFileName(config);
//! ```

use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::backend::SoftwareBackend;
use crate::color::Background;
use crate::config::ExportConfig;
use crate::decode::{DataUrl, DecodeOptions};
use crate::encode::OutputArtifact;
use crate::pipeline::ExportPipeline;
use crate::raster::RasterImage;
use crate::transform::Variant;

/// Stem used for suggested download names.
const FILE_STEM: &str = "logo";

// ============================================================================
// LogoEditor
// ============================================================================

/// A decoded logo plus the editor's background choice.
#[wasm_bindgen]
pub struct LogoEditor {
    pipeline: ExportPipeline<SoftwareBackend>,
    source: RasterImage,
    background: Background,
}

#[wasm_bindgen]
impl LogoEditor {
    /// Decodes an uploaded file.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The raw file contents
    /// * `mime` - The file's MIME type, if the browser reported one
    ///
    /// Uploads larger than 5 MiB are rejected.
    #[wasm_bindgen(js_name = "fromBytes")]
    pub fn from_bytes(bytes: &[u8], mime: Option<String>) -> Result<LogoEditor, JsError> {
        let pipeline = ExportPipeline::new(SoftwareBackend, DecodeOptions::with_upload_limit());
        let source = pipeline
            .decoder()
            .decode_bytes(bytes, mime.as_deref())
            .map_err(|e| JsError::new(&format!("Failed to decode image: {}", e)))?;

        Ok(Self {
            pipeline,
            source,
            background: Background::default(),
        })
    }

    /// Decodes a `data:` URL, as produced by `FileReader.readAsDataURL`.
    #[wasm_bindgen(js_name = "fromDataUrl")]
    pub fn from_data_url(url: &str) -> Result<LogoEditor, JsError> {
        let parsed = DataUrl::parse(url).map_err(|e| JsError::new(&e.to_string()))?;
        Self::from_bytes(&parsed.bytes, parsed.mime)
    }

    pub fn width(&self) -> u32 {
        self.source.width()
    }

    pub fn height(&self) -> u32 {
        self.source.height()
    }

    // ---- Background ----

    /// Sets the background from `"transparent"` or a hex color.
    #[wasm_bindgen(js_name = "setBackground")]
    pub fn set_background(&mut self, value: &str) -> Result<(), JsError> {
        self.background = value
            .parse()
            .map_err(|e| JsError::new(&format!("Invalid background: {}", e)))?;
        Ok(())
    }

    /// The current background in its textual form.
    #[wasm_bindgen(getter)]
    pub fn background(&self) -> String {
        self.background.to_string()
    }

    // ---- Preview ----

    /// Draws `variant` over the current background onto a canvas, resizing
    /// the canvas to the logo.
    #[wasm_bindgen(js_name = "renderToCanvas")]
    pub fn render_to_canvas(&self, canvas: &HtmlCanvasElement, variant: &str) -> Result<(), JsError> {
        let preview = self.preview(variant)?;
        let width = preview.width();
        let height = preview.height();

        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("Failed to get 2d context"))?
            .ok_or_else(|| JsError::new("Canvas 2d context is null"))?
            .dyn_into()
            .map_err(|_| JsError::new("Failed to cast to CanvasRenderingContext2d"))?;

        // transparent previews must not keep the previous frame
        ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));

        if preview.is_empty() {
            return Ok(());
        }

        let raw_pixels = preview.into_raw();
        let image_data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&raw_pixels), width, height)
                .map_err(|_| JsError::new("Failed to create ImageData"))?;

        ctx.put_image_data(&image_data, 0.0, 0.0)
            .map_err(|_| JsError::new("Failed to put image data"))?;

        Ok(())
    }

    /// Returns the preview for `variant` as raw RGBA pixels.
    #[wasm_bindgen(js_name = "renderToPixels")]
    pub fn render_to_pixels(&self, variant: &str) -> Result<js_sys::Uint8Array, JsError> {
        let raw_pixels = self.preview(variant)?.into_raw();
        Ok(js_sys::Uint8Array::from(raw_pixels.as_slice()))
    }

    // ---- Export ----

    /// Encodes the logo according to a JSON [`ExportConfig`].
    #[wasm_bindgen(js_name = "exportBytes")]
    pub fn export_bytes(&self, config_json: &str) -> Result<js_sys::Uint8Array, JsError> {
        let artifact = self.export(config_json)?;
        Ok(js_sys::Uint8Array::from(artifact.bytes()))
    }

    /// Encodes the logo and returns it as a `data:` URL.
    #[wasm_bindgen(js_name = "exportDataUrl")]
    pub fn export_data_url(&self, config_json: &str) -> Result<String, JsError> {
        Ok(self.export(config_json)?.to_data_url())
    }

    /// The suggested download name for a JSON [`ExportConfig`].
    #[wasm_bindgen(js_name = "exportFileName")]
    pub fn export_file_name(&self, config_json: &str) -> Result<String, JsError> {
        Ok(parse_config(config_json)?.file_name(FILE_STEM))
    }
}

impl LogoEditor {
    fn preview(&self, variant: &str) -> Result<RasterImage, JsError> {
        let variant: Variant = variant
            .parse()
            .map_err(|e| JsError::new(&format!("Invalid variant: {}", e)))?;
        Ok(self.pipeline.preview(&self.source, variant, self.background))
    }

    fn export(&self, config_json: &str) -> Result<OutputArtifact, JsError> {
        let config = parse_config(config_json)?;
        self.pipeline
            .export(&self.source, &config, self.background, FILE_STEM)
            .map_err(|e| JsError::new(&format!("Export failed: {}", e)))
    }
}

fn parse_config(json: &str) -> Result<ExportConfig, JsError> {
    ExportConfig::from_json(json).map_err(|e| JsError::new(&format!("Failed to parse export config: {}", e)))
}

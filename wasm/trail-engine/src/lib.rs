//! WASM Trail Engine
//!
//! Runs the cursor trail reveal engine inside the browser so pointer events
//! never leave the page. Image pixels stay in the browser as well: JS
//! registers each image's dimensions and receives draw commands back.

use std::collections::HashMap;

use cursor_gallery_lib::config::TrailConfig;
use cursor_gallery_lib::rendering::{
    project_frame, Coord, DrawCommand, GalleryImage, ImageId, ImageSpace, ImageTransform,
    ProjectionOptions, Size,
};
use cursor_gallery_lib::trail::{PointerEvent, TrailRevealEngine};
use wasm_bindgen::prelude::*;

/// Initialize panic hook and logging for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[TRAIL] WASM module initialized");
}

/// Trail engine handle owned by the page.
#[wasm_bindgen]
pub struct WasmTrailEngine {
    engine: TrailRevealEngine,
    config: TrailConfig,
    sizes: HashMap<ImageId, Size<ImageSpace>>,
}

#[wasm_bindgen]
impl WasmTrailEngine {
    /// Create an engine from a `TrailConfig` object (or `undefined` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_js: JsValue) -> Result<WasmTrailEngine, JsValue> {
        Ok(Self::from_config(parse_config(config_js)?))
    }

    /// Replace images, threshold and edit mode in one call.
    #[wasm_bindgen]
    pub fn configure(
        &mut self,
        images_js: JsValue,
        threshold: u32,
        edit_mode: bool,
    ) -> Result<(), JsValue> {
        let images: Vec<GalleryImage> = serde_wasm_bindgen::from_value(images_js)
            .map_err(|e| format!("Failed to parse images: {}", e))?;
        self.apply_settings(images, threshold, edit_mode);
        Ok(())
    }

    /// Apply a full `TrailConfig` object (keeps the current images).
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config_js: JsValue) -> Result<(), JsValue> {
        self.config = parse_config(config_js)?;
        self.engine.apply_config(&self.config);
        Ok(())
    }

    /// Record the pixel size of a loaded image.
    #[wasm_bindgen(js_name = registerImage)]
    pub fn register_image(&mut self, id: &str, width: u32, height: u32) {
        self.sizes.insert(ImageId::new(id), Size::from_u32(width, height));
    }

    #[wasm_bindgen(js_name = unregisterImage)]
    pub fn unregister_image(&mut self, id: &str) {
        self.sizes.remove(&ImageId::new(id));
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.engine.on_pointer_down(Coord::new(x, y));
    }

    /// Returns the new entry id when the move revealed an image.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<f64> {
        self.engine
            .on_pointer_move(Coord::new(x, y))
            .map(|id| id.value() as f64)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.engine.on_pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.engine.on_pointer_leave();
    }

    /// Dispatch a `PointerEvent` object.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event_js: JsValue) -> Result<Option<f64>, JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event_js)
            .map_err(|e| format!("Failed to parse pointer event: {}", e))?;
        Ok(self.engine.handle(&event).map(|id| id.value() as f64))
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Tap-to-edit lookup. Returns a `HitResult` or `undefined`.
    ///
    /// `radius` defaults to the configured hit radius.
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64, radius: Option<f64>) -> Result<JsValue, JsValue> {
        let radius = radius.unwrap_or(self.config.hit_radius);
        match self.engine.hit_test(Coord::new(x, y), radius) {
            Some(hit) => serde_wasm_bindgen::to_value(&hit)
                .map_err(|e| JsValue::from(format!("Failed to serialize hit: {}", e))),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Write back an edited `ImageTransform`. Returns false for unknown ids.
    #[wasm_bindgen(js_name = applyTransform)]
    pub fn apply_transform(
        &mut self,
        image_id: &str,
        transform_js: JsValue,
    ) -> Result<bool, JsValue> {
        let mut transform: ImageTransform = serde_wasm_bindgen::from_value(transform_js)
            .map_err(|e| format!("Failed to parse transform: {}", e))?;
        transform.validate();
        Ok(self.engine.apply_transform(&ImageId::new(image_id), transform))
    }

    /// Revealed entries, oldest first.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.engine.snapshot();
        serde_wasm_bindgen::to_value(&*snapshot)
            .map_err(|e| JsValue::from(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Draw commands for the current frame. Unregistered images are skipped.
    #[wasm_bindgen]
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.draw_commands())
            .map_err(|e| JsValue::from(format!("Failed to serialize frame: {}", e)))
    }

    #[wasm_bindgen(getter, js_name = revealedCount)]
    pub fn revealed_count(&self) -> usize {
        self.engine.revealed_len()
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.engine.current_index()
    }
}

impl WasmTrailEngine {
    fn from_config(config: TrailConfig) -> Self {
        Self {
            engine: TrailRevealEngine::with_config(Vec::new(), &config),
            config,
            sizes: HashMap::new(),
        }
    }

    /// Threshold and edit mode go through `TrailConfig::validate` first.
    fn apply_settings(&mut self, images: Vec<GalleryImage>, threshold: u32, edit_mode: bool) {
        self.config.threshold = threshold;
        self.config.edit_mode = edit_mode;
        self.config.validate();
        self.engine
            .configure(images, self.config.threshold, self.config.edit_mode);
    }

    fn draw_commands(&self) -> Vec<DrawCommand> {
        let snapshot = self.engine.snapshot();
        let options = ProjectionOptions::from(&self.config);
        project_frame(&snapshot, |id| self.sizes.get(id).copied(), &options)
    }
}

fn parse_config(config_js: JsValue) -> Result<TrailConfig, JsValue> {
    if config_js.is_undefined() || config_js.is_null() {
        return Ok(TrailConfig::default());
    }
    let mut config: TrailConfig = serde_wasm_bindgen::from_value(config_js)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    config.validate();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_gallery_lib::config::trail::{MAX_THRESHOLD, MIN_THRESHOLD};

    fn gallery(names: &[&str]) -> Vec<GalleryImage> {
        names.iter().map(|n| GalleryImage::new(*n)).collect()
    }

    #[test]
    fn configure_clamps_threshold() {
        let mut wasm = WasmTrailEngine::from_config(TrailConfig::default());

        wasm.apply_settings(gallery(&["a"]), 0, true);
        assert_eq!(wasm.config.threshold, MIN_THRESHOLD);
        assert_eq!(wasm.engine.threshold(), MIN_THRESHOLD);
        assert!(wasm.engine.edit_mode());

        wasm.apply_settings(gallery(&["a"]), 5_000, false);
        assert_eq!(wasm.engine.threshold(), MAX_THRESHOLD);
        assert!(!wasm.engine.edit_mode());
    }

    #[test]
    fn frame_skips_unregistered_images() {
        let mut wasm = WasmTrailEngine::from_config(TrailConfig::default());
        wasm.apply_settings(gallery(&["a", "b"]), 80, false);
        wasm.register_image("a", 600, 300);

        assert!(wasm.pointer_move(0.0, 100.0).is_some());
        assert!(wasm.pointer_move(0.0, 200.0).is_some());
        assert_eq!(wasm.revealed_count(), 2);

        let commands = wasm.draw_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].image_id.as_str(), "a");
        assert_eq!((commands[0].width, commands[0].height), (300.0, 150.0));

        wasm.register_image("b", 100, 100);
        assert_eq!(wasm.draw_commands().len(), 2);
        wasm.unregister_image("a");
        assert_eq!(wasm.draw_commands().len(), 1);
    }
}

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Draw a path with the mouse; after enough points it turns into a
//! breathing wireframe. The modules below are plain Rust and run on the
//! host; everything touching the browser lives in the wasm-only `wasm` module.

pub mod app;
pub mod camera;
pub mod capture;
pub mod config;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod metric;
pub mod morph;
pub mod phase;
pub mod present;
pub mod prompts;
pub mod shape;

pub use app::{FrameUpdate, LineUpdate, Sketch};
pub use config::{ShapeMode, SketchConfig};
pub use error::{ConfigError, SketchError};
pub use phase::InteractionPhase;
#[cfg(target_arch = "wasm32")]
pub use wasm::DomPresenter;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::SketchConfig;
    use crate::error::SketchError;

    mod dom;
    mod render;

    pub use dom::DomPresenter;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        run().map_err(|err| {
            log::error!("startup failed: {err}");
            JsValue::from(err)
        })
    }

    fn run() -> Result<(), SketchError> {
        let document = web_sys::window()
            .and_then(|win| win.document())
            .ok_or(SketchError::Js("no document".into()))?;
        let canvas = document
            .get_element_by_id("canvas")
            .ok_or_else(|| SketchError::MissingElement("canvas".into()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| SketchError::MissingElement("canvas".into()))?;

        let query = document
            .location()
            .and_then(|loc| loc.search().ok())
            .unwrap_or_default();
        let config = SketchConfig::from_query(&query)?;
        log::info!("starting in {:?} mode", config.shape.mode);

        render::start(canvas, config)
    }
}

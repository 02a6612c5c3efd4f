use thiserror::Error;

/// Failures while parsing the page query string into a [`crate::config::SketchConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown shape mode `{0}` (expected `polyhedron` or `wireframe`)")]
    UnknownMode(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum SketchError {
    #[error("required element `#{0}` not found")]
    MissingElement(String),
    #[error("WebGL2 not supported")]
    NoWebGl,
    #[error("shader error: {0}")]
    Shader(String),
    #[error("gpu resource error: {0}")]
    Gpu(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<SketchError> for wasm_bindgen::JsValue {
    fn from(err: SketchError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps_transparently() {
        let err: SketchError = ConfigError::UnknownMode("cube".into()).into();
        assert_eq!(
            err.to_string(),
            "unknown shape mode `cube` (expected `polyhedron` or `wireframe`)"
        );
    }

    #[test]
    fn missing_element_names_the_id() {
        let err = SketchError::MissingElement("canvas".into());
        assert_eq!(err.to_string(), "required element `#canvas` not found");
    }
}

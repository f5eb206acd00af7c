use snowgl_core::{MathError, ObjError};
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::shaders::ShaderError;

/// Errors surfaced to JavaScript callers
#[derive(Debug, Error)]
pub enum WebError {
    #[error("browser DOM unavailable: {0}")]
    Dom(&'static str),

    #[error("no element with id `{0}`")]
    MissingCanvas(String),

    #[error("WebGL context could not create a {0} buffer")]
    Buffer(&'static str),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Obj(#[from] ObjError),

    #[error(transparent)]
    Math(#[from] MathError),
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

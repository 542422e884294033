use thiserror::Error;

/// Failures surfaced by the simulation core and its collaborators.
///
/// None of these are fatal: callers log them and continue with a reduced
/// scene (missing texture, static water, ...).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to load asset `{path}`: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("height-field kernel `{kernel}` failed to initialize: {reason}")]
    KernelInit { kernel: String, reason: String },

    #[error("height-field kernel `{kernel}` failed to step: {reason}")]
    KernelStep { kernel: String, reason: String },

    #[error("renderer error: {0}")]
    Renderer(String),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown water mode `{0}` (expected static, drift, wave or gpu)")]
    UnknownWaterMode(String),
}

impl SimError {
    pub fn asset_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

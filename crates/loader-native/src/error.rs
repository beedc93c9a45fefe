use thiserror::Error;

/// Fatal startup failures. There is no visual fallback, so both kinds
/// abort before the first frame.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("shader module '{label}' failed to compile: {detail}")]
    ShaderCompile { label: &'static str, detail: String },
    #[error("gpu resource initialization failed: {0}")]
    ResourceInit(String),
}

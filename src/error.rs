use thiserror::Error;

/// Errors surfaced by the lighting library.
#[derive(Error, Debug)]
pub enum LightError {
    /// A shader stage failed to compile. `log` is the driver's info log.
    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader link error: {log}")]
    ShaderLink { log: String },

    /// Shader source or uniform name contained an interior NUL byte.
    #[error("invalid shader string: {0}")]
    InvalidString(#[from] std::ffi::NulError),

    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LightError>;

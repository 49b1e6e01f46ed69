use std::fmt;

/// Convenience result type used across alphaplay.
pub type AlphaResult<T> = Result<T, AlphaError>;

/// Programmable pipeline stage a shader belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Top-level error taxonomy used by renderer and player APIs.
#[derive(thiserror::Error, Debug)]
pub enum AlphaError {
    /// A shader stage failed to compile; `log` is the driver's info log.
    #[error("shader compile error ({stage} stage): {log}")]
    ShaderCompile {
        /// Stage that failed.
        stage: ShaderStage,
        /// Compiler diagnostic text.
        log: String,
    },

    /// The program failed to link; the payload is the linker's info log.
    #[error("program link error: {0}")]
    ProgramLink(String),

    /// A required attribute or uniform is not present in the linked program.
    #[error("missing shader location: {name}")]
    MissingLocation {
        /// GLSL symbol that could not be resolved.
        name: String,
    },

    /// The GL implementation refused to allocate an object.
    #[error("gl object creation failed: {0}")]
    GlCreate(String),

    /// Shader text could not be loaded from its provider.
    #[error("shader source error: '{name}': {reason}")]
    ShaderSource {
        /// Asset name that was requested.
        name: String,
        /// Why loading failed.
        reason: String,
    },

    /// Error reported by the media decoder.
    #[error("decoder error: code={code} extra={extra}: {message}")]
    Decoder {
        /// Primary error code.
        code: i32,
        /// Implementation-specific extra code.
        extra: i32,
        /// Human-readable message, possibly empty.
        message: String,
    },

    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation not permitted in the current lifecycle state.
    #[error("state error: {0}")]
    State(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AlphaError {
    /// Build a [`AlphaError::ShaderCompile`] value.
    pub fn shader_compile(stage: ShaderStage, log: impl Into<String>) -> Self {
        Self::ShaderCompile {
            stage,
            log: log.into(),
        }
    }

    /// Build a [`AlphaError::ProgramLink`] value.
    pub fn program_link(log: impl Into<String>) -> Self {
        Self::ProgramLink(log.into())
    }

    /// Build a [`AlphaError::MissingLocation`] value.
    pub fn missing_location(name: impl Into<String>) -> Self {
        Self::MissingLocation { name: name.into() }
    }

    /// Build a [`AlphaError::GlCreate`] value.
    pub fn gl_create(msg: impl Into<String>) -> Self {
        Self::GlCreate(msg.into())
    }

    /// Build a [`AlphaError::ShaderSource`] value.
    pub fn shader_source(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShaderSource {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AlphaError::Decoder`] value.
    pub fn decoder(code: i32, extra: i32, message: impl Into<String>) -> Self {
        Self::Decoder {
            code,
            extra,
            message: message.into(),
        }
    }

    /// Build a [`AlphaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AlphaError::State`] value.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Whether this error leaves the renderer unable to draw for the rest of the surface
    /// lifetime. Shader text, compile, link and location failures cannot self-heal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ShaderCompile { .. }
                | Self::ProgramLink(_)
                | Self::MissingLocation { .. }
                | Self::ShaderSource { .. }
                | Self::GlCreate(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

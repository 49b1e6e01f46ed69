use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{AlphaError, AlphaResult},
    geometry::ScaleMode,
    gpu::gl,
    shaders::{FRAGMENT_SHADER_2D, FRAGMENT_SHADER_OES, VERTEX_SHADER},
};

/// Which GL texture target the decoder's images are bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureTarget {
    /// `GL_TEXTURE_EXTERNAL_OES`, fed by a platform image stream.
    External,
    /// Plain `GL_TEXTURE_2D`, fed by CPU uploads.
    #[default]
    Texture2d,
}

impl TextureTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::External => gl::TEXTURE_EXTERNAL_OES,
            Self::Texture2d => gl::TEXTURE_2D,
        }
    }

    pub fn default_fragment_shader(self) -> &'static str {
        match self {
            Self::External => FRAGMENT_SHADER_OES,
            Self::Texture2d => FRAGMENT_SHADER_2D,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub texture_target: TextureTarget,
    pub vertex_shader: String,
    /// Falls back to the target's built-in fragment shader when unset.
    pub fragment_shader: Option<String>,
    pub scale_mode: ScaleMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_target: TextureTarget::default(),
            vertex_shader: VERTEX_SHADER.to_string(),
            fragment_shader: None,
            scale_mode: ScaleMode::default(),
        }
    }
}

impl RendererConfig {
    pub fn fragment_shader_name(&self) -> &str {
        self.fragment_shader
            .as_deref()
            .unwrap_or_else(|| self.texture_target.default_fragment_shader())
    }

    pub fn validate(&self) -> AlphaResult<()> {
        if self.vertex_shader.trim().is_empty() {
            return Err(AlphaError::validation("vertex_shader must not be empty"));
        }
        if self.fragment_shader_name().trim().is_empty() {
            return Err(AlphaError::validation("fragment_shader must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;

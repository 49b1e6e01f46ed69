//! Providers of GLSL text for the compositor's program.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{AlphaError, AlphaResult};

pub const VERTEX_SHADER: &str = "vertex.glsl";
pub const FRAGMENT_SHADER_OES: &str = "fragment_oes.glsl";
pub const FRAGMENT_SHADER_2D: &str = "fragment_2d.glsl";

/// Loads shader text by asset name. Failure is fatal to renderer initialization.
pub trait ShaderSource: Send {
    fn load_text(&self, name: &str) -> AlphaResult<String>;
}

/// Shaders compiled into the crate from `shaders/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinShaders;

impl ShaderSource for BuiltinShaders {
    fn load_text(&self, name: &str) -> AlphaResult<String> {
        let text = match name {
            VERTEX_SHADER => include_str!("../shaders/vertex.glsl"),
            FRAGMENT_SHADER_OES => include_str!("../shaders/fragment_oes.glsl"),
            FRAGMENT_SHADER_2D => include_str!("../shaders/fragment_2d.glsl"),
            _ => {
                return Err(AlphaError::shader_source(name, "no built-in shader"));
            }
        };
        Ok(text.to_string())
    }
}

/// Reads `<root>/<name>` from disk.
#[derive(Clone, Debug)]
pub struct DirShaderSource {
    root: PathBuf,
}

impl DirShaderSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ShaderSource for DirShaderSource {
    fn load_text(&self, name: &str) -> AlphaResult<String> {
        let path = self.root.join(name);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read shader '{}'", path.display()))
            .map_err(|e| AlphaError::shader_source(name, format!("{e:#}")))?;
        if text.trim().is_empty() {
            return Err(AlphaError::shader_source(name, "shader file is empty"));
        }
        Ok(text)
    }
}

/// In-memory sources keyed by name; handy for embedders that bundle their own assets.
#[derive(Clone, Debug, Default)]
pub struct StaticShaders {
    entries: Vec<(String, String)>,
}

impl StaticShaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, text.into()));
        self
    }
}

impl ShaderSource for StaticShaders {
    fn load_text(&self, name: &str) -> AlphaResult<String> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| AlphaError::shader_source(name, "not registered"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/shaders.rs"]
mod tests;

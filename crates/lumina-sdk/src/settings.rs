// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Startup configuration read from a RON file.
//!
//! Every field is optional in the file; anything missing keeps its default.
//!
//! ```ron
//! (
//!     window: (width: 1920, height: 1080, title: "Lumina"),
//!     performance: (fps: 144.0),
//! )
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lumina_infra::platform::WinitWindowBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings RON.
    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Title bar text.
    pub title: String,
    /// Whether the user may resize the window.
    pub resizable: bool,
    /// Whether the window background is transparent.
    pub transparent: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Lumina".to_string(),
            resizable: true,
            transparent: false,
        }
    }
}

/// Frame pacing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    /// Target frames per second.
    pub fps: f32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self { fps: 60.0 }
    }
}

/// All startup settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window section.
    pub window: WindowSettings,
    /// Performance section.
    pub performance: PerformanceSettings,
}

impl Settings {
    /// Parses settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Reads settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_ron_str(&text)?;
        log::info!("Settings loaded successfully from {}", path.display());
        Ok(settings)
    }

    /// Reads settings from `path`, falling back to the defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}. Using default settings.");
            Self::default()
        })
    }

    /// A window builder configured from the window section.
    pub fn window_builder(&self) -> WinitWindowBuilder {
        WinitWindowBuilder::new()
            .with_title(self.window.title.as_str())
            .with_dimensions(self.window.width, self.window.height)
            .with_resizable(self.window.resizable)
            .with_transparent(self.window.transparent)
    }
}

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

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use lumina_core::event::{keys, KeyPressed, WindowClose};
use lumina_core::math::TAU;
use lumina_core::{Event, ScopedSubscription};
use lumina_data::factory::{ComponentFactory, FactoryContext};
use lumina_data::scene::load_scene;
use lumina_infra::audio::SpectrumBuffer;
use lumina_sdk::{Application, Engine, Runtime, Settings};

const SPECTRUM_BINS: usize = 64;

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

/// Loads the demo scene and feeds it a synthetic spectrum in place of a
/// live audio capture.
struct SandboxApp {
    spectrum: SpectrumBuffer,
    bins: Vec<f32>,
    elapsed: f32,
    _escape: ScopedSubscription,
}

impl Application for SandboxApp {
    fn build(runtime: &mut Runtime) -> Result<Self> {
        let spectrum = SpectrumBuffer::new();
        let context = FactoryContext::new()
            .with_bus(runtime.bus().clone())
            .with_frequency_source(Arc::new(spectrum.clone()));
        let factory = ComponentFactory::with_builtins(context);

        let scene = load_scene(asset("scene.ron"), &factory)?;
        log::info!("Scene ready with {} objects.", scene.len());
        runtime.set_scene(scene);

        // The escape key quits through the same path as closing the window.
        let bus = runtime.bus().clone();
        let escape = runtime.bus().subscribe(move |e: &mut KeyPressed| {
            if e.key_code == keys::ESCAPE {
                bus.queue_event(WindowClose::new());
                e.set_handled(true);
            }
        });

        Ok(Self {
            spectrum,
            bins: vec![0.0; SPECTRUM_BINS],
            elapsed: 0.0,
            _escape: escape,
        })
    }

    fn update(&mut self, _runtime: &mut Runtime, delta_time: f32) {
        self.elapsed += delta_time;
        // A bass pulse at 2 Hz that decays towards the higher bins.
        let pulse = (self.elapsed * TAU * 2.0).sin().max(0.0);
        for (i, bin) in self.bins.iter_mut().enumerate() {
            *bin = pulse / (1.0 + i as f32);
        }
        self.spectrum.publish(&self.bins);
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::load_or_default(asset("settings.ron"));
    Engine::run::<SandboxApp>(settings)?;
    Ok(())
}

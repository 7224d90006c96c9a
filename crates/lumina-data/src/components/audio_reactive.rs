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

use std::fmt;
use std::sync::Arc;

use lumina_core::audio::FrequencySource;
use lumina_core::math::{lerp, Vec3};
use lumina_core::{Component, OwnerRef};

/// How quickly the smoothed amplitude chases the measured one, per second.
const SMOOTHING_RATE: f32 = 10.0;

/// Scales its owner with the loudness of a band of frequency bins.
///
/// Each frame the average magnitude of bins `start_bin..=end_bin` becomes the
/// target amplitude; the applied amplitude eases towards it, and the owner is
/// scaled to `original * (1 + amplitude * sensitivity)`.
pub struct AudioReactive {
    /// First bin of the band.
    pub start_bin: usize,
    /// Last bin of the band, inclusive.
    pub end_bin: usize,
    /// Scale gained per unit of amplitude.
    pub sensitivity: f32,

    source: Arc<dyn FrequencySource>,
    spectrum: Vec<f32>,
    current_amplitude: f32,
    original_scale: Vec3,
    owner: OwnerRef,
}

impl AudioReactive {
    /// Creates a scaler reading bins `start_bin..=end_bin` from `source`.
    pub fn new(
        source: Arc<dyn FrequencySource>,
        start_bin: usize,
        end_bin: usize,
        sensitivity: f32,
    ) -> Self {
        Self {
            start_bin,
            end_bin,
            sensitivity,
            source,
            spectrum: Vec::new(),
            current_amplitude: 0.0,
            original_scale: Vec3::ONE,
            owner: OwnerRef::detached(),
        }
    }

    /// The smoothed amplitude applied last frame.
    pub fn amplitude(&self) -> f32 {
        self.current_amplitude
    }

    fn band_average(&self) -> f32 {
        // An out-of-range or empty band reads as silence.
        if self.end_bin < self.spectrum.len() && self.start_bin < self.end_bin {
            let band = &self.spectrum[self.start_bin..=self.end_bin];
            band.iter().sum::<f32>() / band.len() as f32
        } else {
            0.0
        }
    }
}

impl Component for AudioReactive {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }

    fn awake(&mut self) {
        match self.owner.transform() {
            Some(transform) => self.original_scale = transform.scale,
            None => log::error!("AudioReactive needs an owner with a transform."),
        }
    }

    fn update(&mut self, delta_time: f32) {
        if !self.owner.is_alive() {
            return;
        }
        if !self.source.copy_latest(&mut self.spectrum) || self.spectrum.is_empty() {
            return;
        }

        let target = self.band_average();
        self.current_amplitude = lerp(self.current_amplitude, target, delta_time * SMOOTHING_RATE);

        let scale = self.original_scale * (1.0 + self.current_amplitude * self.sensitivity);
        self.owner.with_transform_mut(|t| t.scale = scale);
    }
}

impl fmt::Debug for AudioReactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioReactive")
            .field("start_bin", &self.start_bin)
            .field("end_bin", &self.end_bin)
            .field("sensitivity", &self.sensitivity)
            .field("amplitude", &self.current_amplitude)
            .finish()
    }
}

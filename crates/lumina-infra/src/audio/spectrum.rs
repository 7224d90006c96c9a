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

use std::sync::{Arc, Mutex, MutexGuard};

use lumina_core::audio::FrequencySource;

/// Latest frequency magnitudes, shared between an audio thread and the
/// simulation thread.
///
/// Clones share the same buffer: hand one to the audio callback, which calls
/// [`publish`](Self::publish) after each analysis, and give another to the
/// components that poll it as a [`FrequencySource`].
#[derive(Debug, Clone, Default)]
pub struct SpectrumBuffer {
    latest: Arc<Mutex<Option<Vec<f32>>>>,
}

impl SpectrumBuffer {
    /// An empty buffer; polling it reports no data until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored magnitudes with `magnitudes`.
    pub fn publish(&self, magnitudes: &[f32]) {
        let mut latest = self.lock();
        match latest.as_mut() {
            Some(buffer) => {
                buffer.clear();
                buffer.extend_from_slice(magnitudes);
            }
            None => *latest = Some(magnitudes.to_vec()),
        }
    }

    /// Forgets the stored magnitudes.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<f32>>> {
        // A producer that panicked mid-write leaves at worst a stale spectrum.
        self.latest.lock().unwrap_or_else(|poisoned| {
            log::warn!("Spectrum buffer lock was poisoned; recovering.");
            poisoned.into_inner()
        })
    }
}

impl FrequencySource for SpectrumBuffer {
    fn copy_latest(&self, out: &mut Vec<f32>) -> bool {
        match self.lock().as_ref() {
            Some(latest) => {
                out.clear();
                out.extend_from_slice(latest);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_until_published() {
        let buffer = SpectrumBuffer::new();
        let mut out = vec![7.0];
        assert!(!buffer.copy_latest(&mut out));
        assert_eq!(out, vec![7.0]);

        buffer.publish(&[1.0, 2.0]);
        assert!(buffer.copy_latest(&mut out));
        assert_eq!(out, vec![1.0, 2.0]);

        buffer.clear();
        assert!(!buffer.copy_latest(&mut out));
    }

    #[test]
    fn test_producer_thread_hands_over_spectrum() {
        let buffer = SpectrumBuffer::new();
        let producer = buffer.clone();

        let handle = thread::spawn(move || {
            for frame in 0..10 {
                producer.publish(&[frame as f32; 4]);
            }
        });
        handle.join().expect("producer thread");

        let mut out = Vec::new();
        assert!(buffer.copy_latest(&mut out));
        assert_eq!(out, vec![9.0; 4]);
    }
}

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

//! Contracts between the audio subsystem and audio-reactive components.

/// A poll-style source of frequency magnitudes.
///
/// Implementations are filled by an audio thread and guard their data with
/// their own lock; consumers on the simulation thread copy out the latest
/// spectrum once per frame.
pub trait FrequencySource: Send + Sync {
    /// Copies the latest magnitudes into `out`, replacing its contents.
    ///
    /// Returns `false` (leaving `out` untouched) if no spectrum is available yet.
    fn copy_latest(&self, out: &mut Vec<f32>) -> bool;
}

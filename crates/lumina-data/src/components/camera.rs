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

use std::cell::Cell;
use std::rc::Rc;

use lumina_core::event::WindowResize;
use lumina_core::math::{degrees_to_radians, Mat4};
use lumina_core::{Component, EventBus, OwnerRef, ScopedSubscription};

/// Aspect ratio used until the first viewport size is known (16:9).
pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// A perspective camera that looks through its owner's transform.
///
/// The view matrix is the inverse of the owner's model matrix, so moving or
/// rotating the entity moves the camera.
#[derive(Debug)]
pub struct Camera {
    /// The vertical field of view in degrees.
    pub fov_degrees: f32,
    /// The distance to the near clipping plane.
    pub near: f32,
    /// The distance to the far clipping plane.
    pub far: f32,

    owner: OwnerRef,
    aspect_ratio: Rc<Cell<f32>>,
    viewport: ScopedSubscription,
}

impl Camera {
    /// Creates a camera with the given projection parameters.
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            near,
            far,
            owner: OwnerRef::detached(),
            aspect_ratio: Rc::new(Cell::new(DEFAULT_ASPECT_RATIO)),
            viewport: ScopedSubscription::empty(),
        }
    }

    /// Keeps [`aspect_ratio`](Self::aspect_ratio) in sync with
    /// [`WindowResize`] events on `bus`.
    ///
    /// The subscription lives as long as the camera. Calling this again
    /// replaces the previous subscription.
    pub fn track_viewport(&mut self, bus: &EventBus) {
        let aspect_ratio = Rc::clone(&self.aspect_ratio);
        self.viewport = bus.subscribe(move |e: &mut WindowResize| {
            // Minimised windows report a zero height.
            if e.height > 0 {
                aspect_ratio.set(e.width as f32 / e.height as f32);
            }
        });
    }

    /// Whether the camera follows window resizes.
    pub fn is_tracking_viewport(&self) -> bool {
        self.viewport.is_active()
    }

    /// Width over height of the current viewport.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio.get()
    }

    /// Overrides the aspect ratio; ignored for a zero height.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio.set(width as f32 / height as f32);
        }
    }

    /// World-to-view matrix. Identity when the owner is gone.
    pub fn view_matrix(&self) -> Mat4 {
        self.owner
            .transform()
            .map(|t| t.matrix().inverse())
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Right-handed perspective projection with an OpenGL depth range.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            degrees_to_radians(self.fov_degrees),
            aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Projection for the tracked viewport.
    pub fn current_projection(&self) -> Mat4 {
        self.projection_matrix(self.aspect_ratio())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, 0.1, 100.0)
    }
}

impl Component for Camera {
    fn attach(&mut self, owner: OwnerRef) {
        self.owner = owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumina_core::math::Vec3;
    use lumina_core::{Entity, Transform};

    #[test]
    fn test_camera_default() {
        let camera = Camera::default();
        assert_eq!(camera.fov_degrees, 45.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
    }

    #[test]
    fn test_view_matrix_is_inverse_of_owner_transform() {
        let entity = Entity::named("camera");
        let camera = entity.add_component(Camera::default());
        entity
            .get_component::<Transform>()
            .expect("transform")
            .borrow_mut()
            .position = Vec3::new(0.0, 0.0, 3.0);

        let view = camera.borrow().view_matrix();
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin_in_view, Vec3::new(0.0, 0.0, -3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_without_owner_is_identity() {
        assert_eq!(Camera::default().view_matrix(), Mat4::IDENTITY);

        let entity = Entity::new();
        let camera = entity.add_component(Camera::default());
        drop(entity);
        assert_eq!(camera.borrow().view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_camera_tracks_resize_until_dropped() {
        let bus = EventBus::new();
        let mut camera = Camera::default();
        camera.track_viewport(&bus);
        assert!(camera.is_tracking_viewport());

        bus.publish(&mut WindowResize::new(800, 400));
        assert_relative_eq!(camera.aspect_ratio(), 2.0);

        // A zero height keeps the last valid ratio.
        bus.publish(&mut WindowResize::new(800, 0));
        assert_relative_eq!(camera.aspect_ratio(), 2.0);

        drop(camera);
        assert_eq!(bus.subscriber_count::<WindowResize>(), 0);
    }

    #[test]
    fn test_projection_matrix() {
        let camera = Camera::default();
        let proj = camera.projection_matrix(2.0);
        let focal = 1.0 / (degrees_to_radians(45.0) / 2.0).tan();
        assert_relative_eq!(proj.y_axis.y, focal, epsilon = 1e-5);
        assert_relative_eq!(proj.x_axis.x, focal / 2.0, epsilon = 1e-5);
    }
}

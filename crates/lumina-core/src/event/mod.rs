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

//! Provides the primitives for event-driven communication.
//!
//! Events are plain data records routed by their *concrete* Rust type. Producers
//! hand them to an [`EventBus`], either immediately ([`EventBus::publish`]) or
//! deferred until the next [`EventBus::dispatch_events`] pass. Consumers register
//! callbacks with [`EventBus::subscribe`] and keep the returned
//! [`ScopedSubscription`] alive for as long as they want to be notified.

mod app;
mod bus;
mod input;
mod subscription;

use std::any::Any;
use std::fmt;

pub use self::app::{WindowClose, WindowResize};
pub use self::bus::{EventBus, SubscriptionHandle};
pub use self::input::{
    keys, KeyCode, KeyPressed, KeyReleased, MouseButton, MouseButtonPressed,
    MouseButtonReleased, MouseMoved, MouseScrolled,
};
pub use self::subscription::ScopedSubscription;

/// Broad classification of an event, useful for filtering and diagnostics.
///
/// Routing never looks at the category: subscribers are matched on the exact
/// concrete event type only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventCategory {
    /// Uncategorised.
    #[default]
    None,
    /// Window and application lifecycle.
    Application,
    /// Generic input.
    Input,
    /// Keyboard input.
    Keyboard,
    /// Mouse input.
    Mouse,
}

/// A record of something that happened.
///
/// Implementations are usually generated with [`impl_event!`](crate::impl_event),
/// which expects the type to carry a `handled: bool` field.
pub trait Event: Any + fmt::Debug {
    /// The broad category of this event.
    fn category(&self) -> EventCategory;

    /// A short, stable name for the concrete event type.
    fn name(&self) -> &'static str;

    /// Whether a subscriber already consumed this event.
    fn is_handled(&self) -> bool;

    /// Marks the event as consumed (or not). Once `true`, the current
    /// publish pass stops notifying further subscribers.
    fn set_handled(&mut self, handled: bool);

    /// Upcasts to [`Any`] for type-based routing.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to [`Any`] for downcasting to the concrete event type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Implements [`Event`] for a struct that has a `handled: bool` field.
///
/// ```rust
/// use lumina_core::event::{Event, EventCategory};
/// use lumina_core::impl_event;
///
/// #[derive(Debug, Default)]
/// struct Ping {
///     handled: bool,
/// }
///
/// impl_event!(Ping, EventCategory::Application);
///
/// let ping = Ping::default();
/// assert_eq!(ping.name(), "Ping");
/// ```
#[macro_export]
macro_rules! impl_event {
    ($ty:ident, $category:expr) => {
        impl $crate::event::Event for $ty {
            fn category(&self) -> $crate::event::EventCategory {
                $category
            }

            fn name(&self) -> &'static str {
                stringify!($ty)
            }

            fn is_handled(&self) -> bool {
                self.handled
            }

            fn set_handled(&mut self, handled: bool) {
                self.handled = handled;
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

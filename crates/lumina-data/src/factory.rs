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

//! Name-based component construction for declarative scene assembly.
//!
//! Scene files and tools refer to components by name and pass loosely typed
//! arguments. The [`ComponentFactory`] validates those arguments and attaches
//! the component; every failure comes back as a [`FactoryError`] for the
//! caller to report.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use lumina_core::audio::FrequencySource;
use lumina_core::math::Vec3;
use lumina_core::{Entity, EventBus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{
    AudioReactive, Camera, Fractal, Phyllotaxis, PropertyAnimator, Rotation, MAX_POINTS,
    MAX_RECURSION_DEPTH,
};

/// A loosely typed component argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// `true` / `false`.
    Bool(bool),
    /// Any number; integers are accepted where counts are expected.
    Number(f32),
    /// A vector written as `[x, y, z]`.
    Vec3([f32; 3]),
    /// Free text.
    Text(String),
}

impl ArgValue {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::Number(_) => "number",
            ArgValue::Vec3(_) => "vec3",
            ArgValue::Text(_) => "text",
        }
    }
}

impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        ArgValue::Number(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<Vec3> for ArgValue {
    fn from(value: Vec3) -> Self {
        ArgValue::Vec3(value.to_array())
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_owned())
    }
}

/// Errors reported while building a component by name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactoryError {
    /// No builder is registered under this name.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),
    /// Too few or too many arguments.
    #[error("component '{component}' takes {min} to {max} argument(s), got {found}")]
    WrongArgumentCount {
        /// Component name.
        component: String,
        /// Fewest accepted arguments.
        min: usize,
        /// Most accepted arguments.
        max: usize,
        /// Arguments supplied.
        found: usize,
    },
    /// An argument has the wrong type or an out-of-range value.
    #[error("component '{component}', argument {index}: expected {expected}, got {found}")]
    InvalidArgument {
        /// Component name.
        component: String,
        /// Zero-based argument position.
        index: usize,
        /// What the builder wanted.
        expected: &'static str,
        /// What it got.
        found: String,
    },
    /// The component needs a service the factory was created without.
    #[error("component '{component}' requires {resource}")]
    MissingResource {
        /// Component name.
        component: String,
        /// The missing service.
        resource: &'static str,
    },
}

/// Services that some components need at construction time.
#[derive(Clone, Default)]
pub struct FactoryContext {
    /// Bus cameras subscribe to for viewport resizes.
    pub bus: Option<EventBus>,
    /// Spectrum audio-reactive components poll.
    pub frequency_source: Option<Arc<dyn FrequencySource>>,
}

impl FactoryContext {
    /// A context without any services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the event bus.
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Adds the frequency source.
    pub fn with_frequency_source(mut self, source: Arc<dyn FrequencySource>) -> Self {
        self.frequency_source = Some(source);
        self
    }
}

impl fmt::Debug for FactoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryContext")
            .field("bus", &self.bus.is_some())
            .field("frequency_source", &self.frequency_source.is_some())
            .finish()
    }
}

/// Positional arguments for one component, with typed accessors that produce
/// [`FactoryError`]s naming the component.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    component: &'a str,
    values: &'a [ArgValue],
}

impl<'a> Args<'a> {
    /// Wraps `values` passed to `component`.
    pub fn new(component: &'a str, values: &'a [ArgValue]) -> Self {
        Self { component, values }
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails unless between `min` and `max` arguments were supplied.
    pub fn expect_count(&self, min: usize, max: usize) -> Result<(), FactoryError> {
        if (min..=max).contains(&self.values.len()) {
            Ok(())
        } else {
            Err(FactoryError::WrongArgumentCount {
                component: self.component.to_owned(),
                min,
                max,
                found: self.values.len(),
            })
        }
    }

    /// The number at `index`.
    pub fn number(&self, index: usize) -> Result<f32, FactoryError> {
        match self.values.get(index) {
            Some(ArgValue::Number(n)) => Ok(*n),
            other => Err(self.invalid(index, "number", other)),
        }
    }

    /// The number at `index`, or `default` when the argument was omitted.
    pub fn number_or(&self, index: usize, default: f32) -> Result<f32, FactoryError> {
        if index < self.values.len() {
            self.number(index)
        } else {
            Ok(default)
        }
    }

    /// The non-negative whole number at `index`.
    pub fn count(&self, index: usize) -> Result<usize, FactoryError> {
        match self.values.get(index) {
            Some(ArgValue::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => Ok(*n as usize),
            other => Err(self.invalid(index, "non-negative integer", other)),
        }
    }

    /// The non-negative whole number at `index`, or `default` when omitted.
    pub fn count_or(&self, index: usize, default: usize) -> Result<usize, FactoryError> {
        if index < self.values.len() {
            self.count(index)
        } else {
            Ok(default)
        }
    }

    /// The vector at `index`.
    pub fn vec3(&self, index: usize) -> Result<Vec3, FactoryError> {
        match self.values.get(index) {
            Some(ArgValue::Vec3(v)) => Ok(Vec3::from_array(*v)),
            other => Err(self.invalid(index, "vec3", other)),
        }
    }

    fn invalid(&self, index: usize, expected: &'static str, found: Option<&ArgValue>) -> FactoryError {
        FactoryError::InvalidArgument {
            component: self.component.to_owned(),
            index,
            expected,
            found: match found {
                Some(ArgValue::Number(n)) => format!("number {n}"),
                Some(value) => value.kind().to_owned(),
                None => "nothing".to_owned(),
            },
        }
    }
}

/// Builds a component from arguments and attaches it to an entity.
pub type ComponentBuilder =
    Box<dyn Fn(&Rc<Entity>, Args<'_>, &FactoryContext) -> Result<(), FactoryError>>;

/// Registry of named component builders.
pub struct ComponentFactory {
    builders: BTreeMap<String, ComponentBuilder>,
    context: FactoryContext,
}

impl ComponentFactory {
    /// An empty factory.
    pub fn new(context: FactoryContext) -> Self {
        Self {
            builders: BTreeMap::new(),
            context,
        }
    }

    /// A factory that knows every built-in component.
    ///
    /// | Name               | Arguments                                     |
    /// |--------------------|-----------------------------------------------|
    /// | `Camera`           | `[fov_degrees, near, far]`                    |
    /// | `Rotation`         | `axis, degrees_per_second`                    |
    /// | `RotationAnimator` | `axis, degrees_per_second`                    |
    /// | `BobbingAnimator`  | `direction, speed, distance`                  |
    /// | `ScaleAnimator`    | `min_scale, max_scale, speed`                 |
    /// | `AudioReactive`    | `start_bin, end_bin, sensitivity`             |
    /// | `Phyllotaxis`      | `[num_points, radius]`                        |
    /// | `Fractal`          | `[depth, scale_multiplier, amplitude, speed]` |
    ///
    /// Bracketed arguments are optional and fall back to the component's
    /// defaults. Generator sizes are bounded by [`MAX_POINTS`] and
    /// [`MAX_RECURSION_DEPTH`]; larger values are rejected.
    pub fn with_builtins(context: FactoryContext) -> Self {
        let mut factory = Self::new(context);

        factory.register("Camera", |entity, args, ctx| {
            args.expect_count(0, 3)?;
            let defaults = Camera::default();
            let mut camera = Camera::new(
                args.number_or(0, defaults.fov_degrees)?,
                args.number_or(1, defaults.near)?,
                args.number_or(2, defaults.far)?,
            );
            if let Some(bus) = &ctx.bus {
                camera.track_viewport(bus);
            }
            entity.add_component(camera);
            Ok(())
        });

        factory.register("Rotation", |entity, args, _| {
            args.expect_count(2, 2)?;
            entity.add_component(Rotation::new(args.vec3(0)?, args.number(1)?));
            Ok(())
        });

        factory.register("RotationAnimator", |entity, args, _| {
            args.expect_count(2, 2)?;
            entity.add_component(PropertyAnimator::rotation(args.vec3(0)?, args.number(1)?));
            Ok(())
        });

        factory.register("BobbingAnimator", |entity, args, _| {
            args.expect_count(3, 3)?;
            entity.add_component(PropertyAnimator::bobbing(
                args.vec3(0)?,
                args.number(1)?,
                args.number(2)?,
            ));
            Ok(())
        });

        factory.register("ScaleAnimator", |entity, args, _| {
            args.expect_count(3, 3)?;
            entity.add_component(PropertyAnimator::pulsing(
                args.number(0)?,
                args.number(1)?,
                args.number(2)?,
            ));
            Ok(())
        });

        factory.register("AudioReactive", |entity, args, ctx| {
            args.expect_count(3, 3)?;
            let source = ctx
                .frequency_source
                .clone()
                .ok_or_else(|| FactoryError::MissingResource {
                    component: "AudioReactive".to_owned(),
                    resource: "a frequency source",
                })?;
            entity.add_component(AudioReactive::new(
                source,
                args.count(0)?,
                args.count(1)?,
                args.number(2)?,
            ));
            Ok(())
        });

        factory.register("Phyllotaxis", |entity, args, _| {
            args.expect_count(0, 2)?;
            let defaults = Phyllotaxis::default();
            let num_points = args.count_or(0, defaults.num_points)?;
            if num_points > MAX_POINTS {
                return Err(FactoryError::InvalidArgument {
                    component: "Phyllotaxis".to_owned(),
                    index: 0,
                    expected: "at most 100000 points",
                    found: num_points.to_string(),
                });
            }
            entity.add_component(Phyllotaxis::new(num_points, args.number_or(1, defaults.radius)?));
            Ok(())
        });

        factory.register("Fractal", |entity, args, _| {
            args.expect_count(0, 4)?;
            let defaults = Fractal::default();
            let depth = args.count_or(0, defaults.recursion_depth as usize)?;
            let depth = u32::try_from(depth)
                .ok()
                .filter(|&d| d <= MAX_RECURSION_DEPTH)
                .ok_or_else(|| FactoryError::InvalidArgument {
                    component: "Fractal".to_owned(),
                    index: 0,
                    expected: "a recursion depth of at most 4",
                    found: depth.to_string(),
                })?;
            entity.add_component(Fractal::new(
                depth,
                args.number_or(1, defaults.scale_multiplier)?,
                args.number_or(2, defaults.vibration_amplitude)?,
                args.number_or(3, defaults.vibration_speed)?,
            ));
            Ok(())
        });

        log::debug!("ComponentFactory registered {} built-in components.", factory.builders.len());
        factory
    }

    /// Registers `builder` under `name`, replacing any previous builder.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(&Rc<Entity>, Args<'_>, &FactoryContext) -> Result<(), FactoryError> + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    /// Whether a builder is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered component names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }

    /// The services handed to builders.
    pub fn context(&self) -> &FactoryContext {
        &self.context
    }

    /// Builds the component called `name` from `args` and attaches it to
    /// `entity`.
    pub fn attach(&self, entity: &Rc<Entity>, name: &str, args: &[ArgValue]) -> Result<(), FactoryError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| FactoryError::UnknownComponent(name.to_owned()))?;
        builder(entity, Args::new(name, args), &self.context)
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("components", &self.builders.keys().collect::<Vec<_>>())
            .field("context", &self.context)
            .finish()
    }
}

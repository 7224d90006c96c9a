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

use anyhow::{Context, Result};
use lumina_infra::platform::{translate_winit_event, PlatformEvent, WinitWindow};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

use crate::{FrameClock, Runtime, Settings};

/// User logic driven by the engine's frame loop.
pub trait Application: Sized + 'static {
    /// Called once, after the window exists, to create the application state.
    /// Typically populates `runtime`'s scene and subscribes to events.
    fn build(runtime: &mut Runtime) -> Result<Self>;

    /// Called every frame after events are dispatched and the scene updated.
    fn update(&mut self, _runtime: &mut Runtime, _delta_time: f32) {}

    /// Polled after every frame; returning `true` stops the loop.
    fn should_exit(&self) -> bool {
        false
    }
}

/// Runs one frame in the fixed order shared by the windowed and headless
/// loops. Returns `true` when the loop should stop.
fn run_frame<A: Application>(app: &mut A, runtime: &mut Runtime, delta_time: f32) -> bool {
    runtime.frame(delta_time);
    app.update(runtime, delta_time);
    runtime.end_frame();
    runtime.exit_requested() || app.should_exit()
}

/// The internal state of the running engine, managed by the winit event loop.
struct EngineState<A: Application> {
    settings: Settings,
    window: Option<WinitWindow>,
    runtime: Runtime,
    app: Option<A>,
    clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl<A: Application> EngineState<A> {
    fn new(settings: Settings) -> Self {
        let clock = FrameClock::new(settings.performance.fps);
        Self {
            settings,
            window: None,
            runtime: Runtime::new(),
            app: None,
            clock,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let delta_time = self.clock.begin_frame();
        if run_frame(app, &mut self.runtime, delta_time) {
            event_loop.exit();
            return;
        }
        self.clock.end_frame();
    }
}

impl<A: Application> Drop for EngineState<A> {
    fn drop(&mut self) {
        log::info!("EngineState is being dropped. Performing controlled shutdown...");
        // The application may hold subscriptions on the runtime's bus.
        self.app.take();
        self.runtime.scene_mut().clear();
        self.runtime.bus().clear_queue();
        log::info!("Engine systems shutdown complete.");
    }
}

impl<A: Application> ApplicationHandler for EngineState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Application resumed. Initializing window and engine systems...");

        let window = match self
            .settings
            .window_builder()
            .build(event_loop)
            .context("failed to create the main window")
        {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, e),
        };

        match A::build(&mut self.runtime).context("failed to build the application") {
            Ok(app) => self.app = Some(app),
            Err(e) => return self.fail(event_loop, e),
        }

        // Let viewport-tracking components see the initial size.
        let (width, height) = window.inner_size();
        self.runtime
            .handle_platform_event(PlatformEvent::Resized { width, height });

        self.window = Some(window);
        self.clock = FrameClock::new(self.settings.performance.fps);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(WinitWindow::id) != Some(id) {
            return;
        }

        match event {
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(platform_event) = translate_winit_event(&other) {
                    self.runtime.handle_platform_event(platform_event);
                }
            }
        }
    }

    /// Requests a redraw for continuous rendering.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// An application driven without a window, one explicit frame at a time.
pub struct HeadlessRun<A: Application> {
    /// The user's application state.
    pub app: A,
    /// The runtime the application was built against.
    pub runtime: Runtime,
    /// Frames run so far.
    pub frames: u32,
}

impl<A: Application> HeadlessRun<A> {
    /// Runs one frame. Returns `false` once an exit has been requested.
    pub fn frame(&mut self, delta_time: f32) -> bool {
        self.frames += 1;
        !run_frame(&mut self.app, &mut self.runtime, delta_time)
    }

    /// Runs up to `frames` frames, stopping early on an exit request.
    /// Returns the number of frames run by this call.
    pub fn run_frames(&mut self, frames: u32, delta_time: f32) -> u32 {
        let mut run = 0;
        while run < frames {
            run += 1;
            if !self.frame(delta_time) {
                break;
            }
        }
        run
    }
}

/// The public entry point for Lumina.
pub struct Engine;

impl Engine {
    /// Creates the window, builds `A` and runs the frame loop, blocking the
    /// current thread until the application exits.
    pub fn run<A: Application>(settings: Settings) -> Result<()> {
        log::info!("Lumina SDK: Starting...");
        let event_loop = EventLoop::new()?;

        let mut state = EngineState::<A>::new(settings);
        event_loop.run_app(&mut state)?;

        match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Builds `A` against a fresh runtime without creating a window.
    pub fn build_headless<A: Application>() -> Result<HeadlessRun<A>> {
        let mut runtime = Runtime::new();
        let app = A::build(&mut runtime)?;
        Ok(HeadlessRun {
            app,
            runtime,
            frames: 0,
        })
    }

    /// Builds `A` headlessly and runs up to `frames` frames of `delta_time`
    /// seconds each.
    pub fn run_headless<A: Application>(frames: u32, delta_time: f32) -> Result<HeadlessRun<A>> {
        let mut run = Self::build_headless::<A>()?;
        run.run_frames(frames, delta_time);
        Ok(run)
    }
}

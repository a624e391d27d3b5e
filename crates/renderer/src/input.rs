use std::collections::HashSet;
use std::time::Instant;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::camera::{Camera, CameraMovement};

/// Pixels per scroll "line" when a touchpad reports pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Cursor bookkeeping for turning absolute positions into offsets.
#[derive(Debug, Default, Clone, Copy)]
pub struct MouseTracker {
    last: Option<PhysicalPosition<f64>>,
}

impl MouseTracker {
    /// Returns the `(x, y)` offset since the previous event, with `y` growing
    /// upwards. The first event only primes the tracker.
    pub fn offset(&mut self, position: PhysicalPosition<f64>) -> Option<(f32, f32)> {
        let previous = self.last.replace(position)?;
        Some((
            (position.x - previous.x) as f32,
            (previous.y - position.y) as f32,
        ))
    }
}

/// Measures the time between frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_frame: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last_frame: now }
    }

    /// Advances to `now` and returns the elapsed seconds.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        delta
    }
}

/// What the event loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    Exit,
}

/// Camera plus all input state the render loop mutates.
///
/// Window callbacks and the per-frame update both go through this struct.
#[derive(Debug, Clone)]
pub struct AppState {
    pub camera: Camera,
    pressed: HashSet<KeyCode>,
    mouse: MouseTracker,
    mouse_scale: f32,
    clock: FrameClock,
}

impl AppState {
    pub fn new(camera: Camera, mouse_scale: f32, now: Instant) -> Self {
        Self {
            camera,
            pressed: HashSet::new(),
            mouse: MouseTracker::default(),
            mouse_scale,
            clock: FrameClock::new(now),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> InputOutcome {
        if key == KeyCode::Escape && state == ElementState::Pressed {
            return InputOutcome::Exit;
        }
        match state {
            ElementState::Pressed => {
                self.pressed.insert(key);
            }
            ElementState::Released => {
                self.pressed.remove(&key);
            }
        }
        InputOutcome::Continue
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if let Some((x, y)) = self.mouse.offset(position) {
            self.camera
                .process_mouse_movement(x * self.mouse_scale, y * self.mouse_scale);
        }
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
        };
        self.camera.process_mouse_scroll(lines);
    }

    /// Ticks the frame clock and applies held movement keys.
    pub fn begin_frame(&mut self, now: Instant) -> f32 {
        let delta = self.clock.tick(now);
        for (key, movement) in MOVEMENT_KEYS {
            if self.pressed.contains(&key) {
                self.camera.process_keyboard(movement, delta);
            }
        }
        delta
    }
}

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
];

use std::collections::HashSet;

use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

pub struct InputState {
    held: HashSet<Scancode>,
    pressed: HashSet<Scancode>,
    /// Cursor in logical window coordinates, y-down.
    pub mouse: Vec2,
    /// Wheel ticks this frame, positive away from the user.
    pub scroll: f32,
    /// Latest logical size if the window was resized this frame.
    pub resized: Option<(u32, u32)>,
    pub quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            mouse: Vec2::ZERO,
            scroll: 0.0,
            resized: None,
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.pressed.clear();
        self.scroll = 0.0;
        self.resized = None;

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat,
                    ..
                } => {
                    if !repeat {
                        self.pressed.insert(sc);
                    }
                    self.held.insert(sc);
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    self.held.remove(&sc);
                }
                Event::MouseMotion { x, y, .. } => {
                    self.mouse = Vec2::new(x as f32, y as f32);
                }
                Event::MouseWheel { y, .. } => {
                    self.scroll += y as f32;
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => {
                    self.resized = Some((w.max(1) as u32, h.max(1) as u32));
                }
                _ => {}
            }
        }
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.held.contains(&sc)
    }

    pub fn was_key_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }

    /// +1 while `up` is held, -1 while `down` is held, 0 for both or neither.
    pub fn axis(&self, up: Scancode, down: Scancode) -> f32 {
        self.is_key_held(up) as i32 as f32 - self.is_key_held(down) as i32 as f32
    }
}

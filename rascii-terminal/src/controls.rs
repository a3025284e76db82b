//! Keyboard controls
//!
//! [`Controls`] is an explicit context owned by the application. Named
//! buttons follow a pressed / held / released cycle, named axes turn four
//! keys into a [`Vector2`]. State only changes in [`Controls::update`], once
//! per frame.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use nalgebra::Vector2;
use tracing::debug;

use crate::error::Result;

pub const QUIT: &str = "quit";
pub const TOGGLE_MODE: &str = "toggle_mode";
pub const RESET: &str = "reset";
pub const MOVE: &str = "move";
pub const LOOK: &str = "look";

/// Per-frame state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    /// Went down this frame
    Pressed,
    /// Down this frame and the one before
    Held,
    /// Went up this frame
    Released,
}

impl ButtonState {
    fn next(self, down: bool) -> Self {
        match (self, down) {
            (ButtonState::Up | ButtonState::Released, true) => ButtonState::Pressed,
            (ButtonState::Pressed | ButtonState::Held, true) => ButtonState::Held,
            (ButtonState::Pressed | ButtonState::Held, false) => ButtonState::Released,
            (ButtonState::Up | ButtonState::Released, false) => ButtonState::Up,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Held)
    }
}

#[derive(Debug, Clone)]
struct Button {
    keys: Vec<KeyCode>,
    state: ButtonState,
}

#[derive(Debug, Clone)]
struct Axis {
    up: KeyCode,
    down: KeyCode,
    left: KeyCode,
    right: KeyCode,
    value: Vector2<f32>,
}

/// Input context: bindings plus the state of the current frame
#[derive(Debug, Clone, Default)]
pub struct Controls {
    buttons: HashMap<String, Button>,
    axes: HashMap<String, Axis>,
    initialized: bool,
    interrupted: bool,
}

impl Controls {
    /// No bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// `quit` on q / Esc, `toggle_mode` on m, `reset` on r, the `move`
    /// axis on WASD and the `look` axis on the arrow keys.
    pub fn with_defaults() -> Self {
        let mut controls = Self::new();
        controls.bind_button(QUIT, &[KeyCode::Char('q'), KeyCode::Esc]);
        controls.bind_button(TOGGLE_MODE, &[KeyCode::Char('m')]);
        controls.bind_button(RESET, &[KeyCode::Char('r')]);
        controls.bind_axis(
            MOVE,
            KeyCode::Char('w'),
            KeyCode::Char('s'),
            KeyCode::Char('a'),
            KeyCode::Char('d'),
        );
        controls.bind_axis(LOOK, KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right);
        controls
    }

    /// Bind (or rebind) a button to any of `keys`.
    pub fn bind_button(&mut self, name: &str, keys: &[KeyCode]) {
        self.buttons.insert(
            name.to_string(),
            Button {
                keys: keys.to_vec(),
                state: ButtonState::Up,
            },
        );
    }

    /// Bind an axis. `up`/`right` give +1 on y/x, `down`/`left` give -1.
    pub fn bind_axis(
        &mut self,
        name: &str,
        up: KeyCode,
        down: KeyCode,
        left: KeyCode,
        right: KeyCode,
    ) {
        self.axes.insert(
            name.to_string(),
            Axis {
                up,
                down,
                left,
                right,
                value: Vector2::zeros(),
            },
        );
    }

    /// Put the terminal into raw mode so single key presses arrive unbuffered.
    pub fn init(&mut self) -> Result<()> {
        if !self.initialized {
            terminal::enable_raw_mode()?;
            self.initialized = true;
            debug!("controls initialized");
        }
        Ok(())
    }

    /// Leave raw mode. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.initialized {
            terminal::disable_raw_mode()?;
            self.initialized = false;
            debug!("controls shut down");
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drain pending terminal events and advance one frame.
    ///
    /// Terminals report presses and auto-repeat but rarely releases, so a
    /// key counts as down for the frames in which it produced an event.
    pub fn poll(&mut self) -> Result<()> {
        let mut down = HashSet::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(code) = self.accept(key) {
                    down.insert(code);
                }
            }
        }
        self.update(&down);
        Ok(())
    }

    /// Advance one frame given the set of keys that are down.
    pub fn update(&mut self, down: &HashSet<KeyCode>) {
        for button in self.buttons.values_mut() {
            let is_down = button.keys.iter().any(|key| down.contains(key));
            button.state = button.state.next(is_down);
        }

        let value = |key: &KeyCode| if down.contains(key) { 1.0 } else { 0.0 };
        for axis in self.axes.values_mut() {
            axis.value = Vector2::new(
                value(&axis.right) - value(&axis.left),
                value(&axis.up) - value(&axis.down),
            );
        }
    }

    /// State of a button, `Up` when the name is not bound.
    pub fn button(&self, name: &str) -> ButtonState {
        self.buttons
            .get(name)
            .map_or(ButtonState::Up, |button| button.state)
    }

    pub fn pressed(&self, name: &str) -> bool {
        self.button(name) == ButtonState::Pressed
    }

    pub fn held(&self, name: &str) -> bool {
        self.button(name) == ButtonState::Held
    }

    pub fn released(&self, name: &str) -> bool {
        self.button(name) == ButtonState::Released
    }

    /// Value of an axis this frame, zero when the name is not bound.
    pub fn axis(&self, name: &str) -> Vector2<f32> {
        self.axes.get(name).map_or(Vector2::zeros(), |axis| axis.value)
    }

    /// Ctrl-C was seen. Raw mode swallows the signal, so it arrives as a key.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    fn accept(&mut self, key: KeyEvent) -> Option<KeyCode> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.interrupted = true;
                None
            }
            KeyCode::Char(c) => Some(KeyCode::Char(c.to_ascii_lowercase())),
            code => Some(code),
        }
    }
}

use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};

/// Input events the editor reacts to.
///
/// Positions are in canvas-local screen pixels: the canvas's top-left corner
/// is (0, 0), and the editor's viewport maps these to scene units.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed over the canvas
    PointerDown {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
        /// Seconds on a monotonic clock, used for double-tap detection
        time: f64,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { pos: Pos2, modifiers: Modifiers },
    /// Mouse button was released
    PointerUp {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Scroll wheel over the canvas; positive `delta` scrolls down (zoom out)
    Scroll { pos: Pos2, delta: f32 },
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    /// Committed text input (typed characters)
    Text(String),
}

/// Handles converting raw egui input into editor `InputEvent`s
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Whether the last primary press started on the canvas
    pressed_on_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's input for a canvas occupying `canvas_rect`.
    ///
    /// Pointer presses outside the canvas are ignored; releases are always
    /// forwarded if the press started on the canvas so drags end cleanly.
    /// Keyboard events are only forwarded when `keyboard_focus` is set.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, keyboard_focus: bool) -> Vec<InputEvent> {
        let origin = canvas_rect.min.to_vec2();
        let mut events = Vec::new();

        ctx.input(|input| {
            for event in &input.events {
                match event {
                    Event::PointerButton {
                        pos,
                        button,
                        pressed: true,
                        modifiers,
                    } => {
                        if canvas_rect.contains(*pos) {
                            self.pressed_on_canvas = true;
                            events.push(InputEvent::PointerDown {
                                pos: *pos - origin,
                                button: *button,
                                modifiers: *modifiers,
                                time: input.time,
                            });
                        }
                    }
                    Event::PointerButton {
                        pos,
                        button,
                        pressed: false,
                        modifiers,
                    } => {
                        if self.pressed_on_canvas {
                            self.pressed_on_canvas = false;
                            events.push(InputEvent::PointerUp {
                                pos: *pos - origin,
                                button: *button,
                                modifiers: *modifiers,
                            });
                        }
                    }
                    Event::PointerMoved(pos) => {
                        if self.pressed_on_canvas || canvas_rect.contains(*pos) {
                            events.push(InputEvent::PointerMove {
                                pos: *pos - origin,
                                modifiers: input.modifiers,
                            });
                        }
                    }
                    Event::Key {
                        key,
                        pressed,
                        modifiers,
                        ..
                    } if keyboard_focus => {
                        let key = *key;
                        let modifiers = *modifiers;
                        events.push(if *pressed {
                            InputEvent::KeyDown { key, modifiers }
                        } else {
                            InputEvent::KeyUp { key, modifiers }
                        });
                    }
                    Event::Text(text) if keyboard_focus => {
                        events.push(InputEvent::Text(text.clone()));
                    }
                    _ => {}
                }
            }

            if let Some(pos) = input.pointer.hover_pos() {
                let scroll: Vec2 = input.raw_scroll_delta;
                if scroll.y != 0.0 && canvas_rect.contains(pos) {
                    events.push(InputEvent::Scroll {
                        pos: pos - origin,
                        delta: -scroll.y,
                    });
                }
            }
        });

        events
    }
}

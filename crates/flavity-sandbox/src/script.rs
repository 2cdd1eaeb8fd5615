//! Scripted keyboard and mouse timeline standing in for a window's event loop.

use bevy_ecs::prelude::*;
use flavity_input::{CursorMode, InputMap, KeyboardState, MouseState, PlayerInput, RawKeyEvent};
use flavity_player::{CharacterInput, FixedTick};
use glam::Vec2;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys held and raw mouse motion over `[start, end)` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: u64,
    pub end: u64,
    pub keys: Vec<KeyCode>,
    /// Raw device motion per tick, screen orientation (y down).
    pub motion: Vec2,
}

impl Cue {
    pub fn keys(start: u64, end: u64, keys: &[KeyCode]) -> Self {
        Self {
            start,
            end,
            keys: keys.to_vec(),
            motion: Vec2::ZERO,
        }
    }

    pub fn tap(tick: u64, key: KeyCode) -> Self {
        Self::keys(tick, tick + 1, &[key])
    }

    pub fn motion(start: u64, end: u64, motion: Vec2) -> Self {
        Self {
            start,
            end,
            keys: Vec::new(),
            motion,
        }
    }

    fn active(&self, tick: u64) -> bool {
        (self.start..self.end).contains(&tick)
    }
}

/// A tour of the room: walk, sprint, jump, every gravity direction, a view
/// roll with look input, and a pause in the middle that swallows movement.
pub fn default_timeline() -> Vec<Cue> {
    use KeyCode::*;
    vec![
        Cue::keys(60, 180, &[KeyW]),
        Cue::keys(180, 240, &[KeyW, ShiftLeft]),
        Cue::keys(240, 260, &[Space]),
        Cue::tap(300, ArrowLeft),
        Cue::tap(420, KeyE),
        Cue::motion(420, 440, Vec2::new(5.0, 0.0)),
        Cue::tap(450, ArrowUp),
        Cue::tap(560, Escape),
        Cue::keys(570, 610, &[KeyW]),
        Cue::tap(620, Escape),
        Cue::tap(640, ArrowRight),
        Cue::tap(760, ArrowUp),
        Cue::keys(860, 890, &[KeyD]),
        Cue::tap(870, KeyQ),
        Cue::motion(870, 890, Vec2::new(0.0, -4.0)),
    ]
}

/// Device state driven by the timeline, resolved through the regular input
/// front end.
#[derive(Resource)]
pub struct ScriptedDevices {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    pub input: PlayerInput,
    timeline: Vec<Cue>,
    held: Vec<KeyCode>,
}

impl ScriptedDevices {
    pub fn new(timeline: Vec<Cue>) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            input: PlayerInput::new(InputMap::default_bindings()),
            timeline,
            held: Vec::new(),
        }
    }

    /// Feed `tick`'s device events and return the resulting snapshot.
    pub fn step(&mut self, tick: u64) -> flavity_input::InputSnapshot {
        let mut wanted: Vec<KeyCode> = Vec::new();
        let mut motion = Vec2::ZERO;
        for cue in self.timeline.iter().filter(|cue| cue.active(tick)) {
            for key in &cue.keys {
                if !wanted.contains(key) {
                    wanted.push(*key);
                }
            }
            motion += cue.motion;
        }

        for key in self.held.iter().filter(|key| !wanted.contains(key)) {
            self.keyboard.process_raw(raw(*key, ElementState::Released));
        }
        for key in wanted.iter().filter(|key| !self.held.contains(key)) {
            self.keyboard.process_raw(raw(*key, ElementState::Pressed));
        }
        self.held = wanted;

        self.mouse
            .set_captured(self.input.cursor_mode() == CursorMode::Captured);
        if motion != Vec2::ZERO {
            self.mouse
                .on_raw_motion(f64::from(motion.x), f64::from(motion.y));
        }

        let previous_mode = self.input.mode();
        let snapshot = self.input.snapshot(&self.keyboard, &self.mouse);
        if self.input.mode() != previous_mode {
            tracing::info!("Tick {}: input mode {:?}", tick, self.input.mode());
        }

        self.keyboard.clear_transients();
        self.mouse.clear_transients();
        snapshot
    }
}

fn raw(key: KeyCode, state: ElementState) -> RawKeyEvent {
    RawKeyEvent {
        key: PhysicalKey::Code(key),
        state,
        repeat: false,
    }
}

/// Writes this tick's scripted snapshot into every character's input.
pub fn script_input_system(
    clock: Res<FixedTick>,
    mut devices: ResMut<ScriptedDevices>,
    mut inputs: Query<&mut CharacterInput>,
) {
    let snapshot = devices.step(clock.tick);
    for mut input in &mut inputs {
        input.0 = snapshot;
    }
}

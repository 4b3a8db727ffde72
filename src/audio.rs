//! Sound cues
//!
//! The simulation only raises [`GameEvent`]s. This module maps them to
//! procedural tone descriptors and hands those to a host-provided
//! [`AudioSink`]; nothing here touches an audio device.

use crate::sim::{GameEvent, GameState};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a brick that survives
    BrickDamaged,
    /// Normal brick destroyed (silent by default; hosts may add their own)
    BrickDestroyed,
    /// Bomb chain reaction, once per triggering bomb
    Explosion,
    /// Pickup collected
    PowerUp,
}

/// A single sine beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub duration_ms: u32,
    /// 0.0 - 1.0
    pub volume: f32,
}

impl Tone {
    const fn new(freq_hz: f32, duration_ms: u32, volume: f32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            volume,
        }
    }
}

const PADDLE_TONES: [Tone; 1] = [Tone::new(880.0, 70, 0.4)];
const DAMAGED_TONES: [Tone; 1] = [Tone::new(650.0, 60, 0.35)];
const POWERUP_TONES: [Tone; 1] = [Tone::new(1000.0, 90, 0.45)];
/// Low thump followed by a higher crack
const EXPLOSION_TONES: [Tone; 2] = [Tone::new(200.0, 120, 0.6), Tone::new(420.0, 160, 0.5)];

impl SoundEffect {
    /// Which cue (if any) an event triggers
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BrickDamaged => Some(SoundEffect::BrickDamaged),
            GameEvent::BrickDestroyed => Some(SoundEffect::BrickDestroyed),
            GameEvent::BombExploded { .. } => Some(SoundEffect::Explosion),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::LifeLost | GameEvent::LevelCleared { .. } | GameEvent::GameOver => None,
        }
    }

    /// Tones to play in sequence
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::PaddleHit => &PADDLE_TONES,
            SoundEffect::BrickDamaged => &DAMAGED_TONES,
            SoundEffect::BrickDestroyed => &[],
            SoundEffect::Explosion => &EXPLOSION_TONES,
            SoundEffect::PowerUp => &POWERUP_TONES,
        }
    }
}

/// Host audio backend
pub trait AudioSink {
    /// Play `tones` back to back for `effect`. `tones` may be empty.
    fn play(&mut self, effect: SoundEffect, tones: &[Tone]);
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, tones: &[Tone]) {
        log::trace!("sfx {:?} ({} tones)", effect, tones.len());
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect at the current volume. Returns false when silenced.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }
        let tones: Vec<Tone> = effect
            .tones()
            .iter()
            .map(|t| Tone {
                volume: t.volume * vol,
                ..*t
            })
            .collect();
        self.sink.play(effect, &tones);
        true
    }

    /// Forward the cues raised by the last tick; nothing plays while the
    /// session's sound setting is off. Returns how many cues were played.
    pub fn play_events(&mut self, state: &GameState) -> usize {
        if !state.sound_on() {
            return 0;
        }
        let mut played = 0;
        for event in state.events() {
            if let Some(effect) = SoundEffect::for_event(event) {
                if self.play(effect) {
                    played += 1;
                }
            }
        }
        played
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

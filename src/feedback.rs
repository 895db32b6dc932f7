//! Audio/haptic feedback boundary
//!
//! The simulation only emits [`GameEvent`]s. This module maps them onto
//! sound effects and vibration pulses and hands them to a sink. Sinks are
//! fire-and-forget: they return nothing and must not fail back into the game.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball picked up
    Collect,
    /// Time bonus picked up
    BonusCollect,
    /// Balls dropped in the basket
    Deposit,
    /// Player bitten
    Hit,
    /// Level cleared
    LevelComplete,
    /// Time's up
    GameOver,
}

impl SoundEffect {
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Collect => SoundEffect::Collect,
            GameEvent::BonusCollect => SoundEffect::BonusCollect,
            GameEvent::Deposit { .. } => SoundEffect::Deposit,
            GameEvent::Hit { .. } => SoundEffect::Hit,
            GameEvent::LevelComplete { .. } => SoundEffect::LevelComplete,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }

    /// Vibration pulse length in milliseconds (0 = none)
    pub fn haptic_ms(&self) -> u32 {
        match self {
            SoundEffect::Collect | SoundEffect::BonusCollect => 0,
            SoundEffect::Deposit => 20,
            SoundEffect::Hit => 80,
            SoundEffect::LevelComplete => 40,
            SoundEffect::GameOver => 120,
        }
    }
}

/// Something that can make noise or buzz
pub trait FeedbackSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn vibrate(&mut self, _ms: u32) {}
}

/// Volume/mute front end over a sink
pub struct FeedbackMixer<S: FeedbackSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    haptics: bool,
}

impl<S: FeedbackSink> FeedbackMixer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics: true,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn set_haptics(&mut self, enabled: bool) {
        self.haptics = enabled;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Forward a batch of simulation events
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        let vol = self.effective_volume();
        for event in events {
            let effect = SoundEffect::for_event(event);
            if vol > 0.0 {
                self.sink.play(effect, vol);
            }
            let ms = effect.haptic_ms();
            if self.haptics && ms > 0 {
                self.sink.vibrate(ms);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Sink that writes events to the log (headless builds)
#[derive(Debug, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {effect:?} @ {volume:.2}");
    }

    fn vibrate(&mut self, ms: u32) {
        log::trace!("haptic {ms}ms");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundEffect>,
        buzzed: Vec<u32>,
    }

    impl FeedbackSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.played.push(effect);
        }

        fn vibrate(&mut self, ms: u32) {
            self.buzzed.push(ms);
        }
    }

    fn events() -> Vec<GameEvent> {
        vec![
            GameEvent::Collect,
            GameEvent::Hit { dropped: 1 },
            GameEvent::GameOver { level: 2 },
        ]
    }

    #[test]
    fn test_dispatch_maps_events() {
        let mut mixer = FeedbackMixer::new(Recorder::default());
        mixer.dispatch(&events());
        assert_eq!(
            mixer.sink().played,
            vec![SoundEffect::Collect, SoundEffect::Hit, SoundEffect::GameOver]
        );
        assert_eq!(mixer.sink().buzzed, vec![80, 120]);
    }

    #[test]
    fn test_muted_still_buzzes() {
        let mut mixer = FeedbackMixer::new(Recorder::default());
        mixer.set_muted(true);
        mixer.dispatch(&events());
        assert!(mixer.sink().played.is_empty());
        assert_eq!(mixer.sink().buzzed.len(), 2);

        mixer.set_haptics(false);
        mixer.dispatch(&events());
        assert_eq!(mixer.sink().buzzed.len(), 2);
    }

    #[test]
    fn test_zero_volume_is_silent() {
        let mut mixer = FeedbackMixer::new(Recorder::default());
        mixer.set_sfx_volume(0.0);
        mixer.dispatch(&[GameEvent::Deposit { count: 3 }]);
        assert!(mixer.sink().played.is_empty());
    }
}

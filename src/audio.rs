//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// UI button press
    Click,
    /// Countdown number shown (0 = first)
    CountdownBeep(u8),
    /// Countdown finished
    Go,
    /// Player took an arrow
    Hit,
    /// Diamond collected
    Pickup,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CountdownStep(n) => {
                Some(SoundEffect::CountdownBeep(crate::consts::COUNTDOWN_FROM.saturating_sub(*n)))
            }
            GameEvent::SessionStarted => Some(SoundEffect::Go),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::PickupCollected { .. } => Some(SoundEffect::Pickup),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: !enabled,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.volume;
        match effect {
            SoundEffect::Click => self.tone(ctx, 1800.0, 0.03, OscillatorType::Square, vol * 0.15, 0.0),
            SoundEffect::CountdownBeep(step) => {
                let freq = 420.0 + step as f32 * 120.0;
                self.tone(ctx, freq, 0.28, OscillatorType::Sine, vol * 0.28, 0.0);
            }
            SoundEffect::Go => {
                self.tone(ctx, 880.0, 0.12, OscillatorType::Square, vol * 0.25, 0.0);
                self.tone(ctx, 1200.0, 0.18, OscillatorType::Square, vol * 0.2, 0.09);
            }
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::Pickup => {
                self.tone(ctx, 1046.0, 0.08, OscillatorType::Triangle, vol * 0.2, 0.0);
                self.tone(ctx, 1568.0, 0.12, OscillatorType::Triangle, vol * 0.2, 0.06);
            }
            SoundEffect::GameOver => {
                for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                    self.tone(ctx, *freq, 0.3, OscillatorType::Sine, vol * 0.3, i as f64 * 0.2);
                }
            }
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single enveloped tone starting `delay` seconds from now
    fn tone(
        &self,
        ctx: &AudioContext,
        freq: f32,
        dur: f64,
        osc_type: OscillatorType,
        peak: f32,
        delay: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(peak.max(0.0001), t + 0.02)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + dur)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + dur + 0.05).ok();
    }

    /// Hit - one second gritty downward sweep through a closing low-pass
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let dur = 1.0;

        let Ok(filter) = ctx.create_biquad_filter() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value_at_time(2400.0, t).ok();
        filter
            .frequency()
            .exponential_ramp_to_value_at_time(900.0, t + dur)
            .ok();

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.35, t + 0.02)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + dur)
            .ok();

        if gain.connect_with_audio_node(&filter).is_err()
            || filter.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }

        // Body + grit
        for (osc_type, from, to) in [
            (OscillatorType::Sawtooth, 820.0, 150.0),
            (OscillatorType::Square, 420.0, 120.0),
        ] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.55)
                .ok();
            if osc.connect_with_audio_node(&gain).is_err() {
                continue;
            }
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + dur + 0.05).ok();
        }
    }
}

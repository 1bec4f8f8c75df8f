//! Fade-out / switch / fade-in scene changes, advanced by elapsed time.

/// The three scene changes the museum supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    OutsideToMuseum,
    MuseumToSecretRoom,
    SecretRoomToMuseum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    Idle,
    FadingOut { kind: TransitionKind, elapsed_ms: f32 },
    /// Screen is fully black; the scene switch happens on the next advance
    Mutating { kind: TransitionKind },
    FadingIn { elapsed_ms: f32 },
}

/// Returned by `advance` when the scene switch must be applied now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchScene(pub TransitionKind);

pub struct Transition {
    pub phase: TransitionPhase,
    fade_ms: f32,
}

impl Transition {
    pub fn new(fade_ms: f32) -> Self {
        Self { phase: TransitionPhase::Idle, fade_ms: fade_ms.max(0.0) }
    }

    /// The transition lock
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, TransitionPhase::Idle)
    }

    /// Start a transition. Ignored (returns false) while another is running.
    pub fn begin(&mut self, kind: TransitionKind) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = TransitionPhase::FadingOut { kind, elapsed_ms: 0.0 };
        true
    }

    /// Advance by `dt_ms`. Yields the pending switch exactly once, at full black.
    pub fn advance(&mut self, dt_ms: f32) -> Option<SwitchScene> {
        match self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::FadingOut { kind, elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                self.phase = if elapsed_ms >= self.fade_ms {
                    TransitionPhase::Mutating { kind }
                } else {
                    TransitionPhase::FadingOut { kind, elapsed_ms }
                };
                None
            }
            TransitionPhase::Mutating { kind } => {
                self.phase = TransitionPhase::FadingIn { elapsed_ms: 0.0 };
                Some(SwitchScene(kind))
            }
            TransitionPhase::FadingIn { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                self.phase = if elapsed_ms >= self.fade_ms {
                    TransitionPhase::Idle
                } else {
                    TransitionPhase::FadingIn { elapsed_ms }
                };
                None
            }
        }
    }

    /// Black overlay opacity
    pub fn fade_level(&self) -> f32 {
        let ratio = |elapsed: f32| if self.fade_ms > 0.0 { (elapsed / self.fade_ms).clamp(0.0, 1.0) } else { 1.0 };
        match self.phase {
            TransitionPhase::Idle => 0.0,
            TransitionPhase::FadingOut { elapsed_ms, .. } => ratio(elapsed_ms),
            TransitionPhase::Mutating { .. } => 1.0,
            TransitionPhase::FadingIn { elapsed_ms } => 1.0 - ratio(elapsed_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_through_every_phase_once() {
        let mut t = Transition::new(800.0);
        assert!(t.begin(TransitionKind::OutsideToMuseum));
        assert!(t.is_active());

        let mut switches = Vec::new();
        let mut frames = 0;
        while t.is_active() {
            if let Some(s) = t.advance(16.0) {
                switches.push(s);
            }
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(switches, vec![SwitchScene(TransitionKind::OutsideToMuseum)]);
        // 800 ms out + switch frame + 800 ms in at 16 ms per frame
        assert_eq!(frames, 50 + 1 + 50);
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut t = Transition::new(800.0);
        t.begin(TransitionKind::MuseumToSecretRoom);
        t.advance(100.0);
        assert!(!t.begin(TransitionKind::SecretRoomToMuseum));
        assert_eq!(
            t.phase,
            TransitionPhase::FadingOut { kind: TransitionKind::MuseumToSecretRoom, elapsed_ms: 100.0 }
        );
    }

    #[test]
    fn fade_ramps_up_and_down() {
        let mut t = Transition::new(800.0);
        assert_eq!(t.fade_level(), 0.0);
        t.begin(TransitionKind::OutsideToMuseum);
        t.advance(400.0);
        assert!((t.fade_level() - 0.5).abs() < 1e-6);
        t.advance(400.0);
        assert_eq!(t.fade_level(), 1.0);
        t.advance(16.0);
        assert_eq!(t.fade_level(), 1.0);
        t.advance(200.0);
        assert!((t.fade_level() - 0.75).abs() < 1e-6);
    }
}

use crate::config::LEAD_TIME;
use crate::volume::Volume;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Triggered(Instant),
    WaitingForStart,
    Playing,
    Finishing(Instant),
    Done,
}

/// What the caller must do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartBlink,
    StopBlink,
    Play { clip: u16, device_volume: u8 },
}

/// The clip to announce next and whether one is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRequest {
    pub clip: u16,
    pub pending: bool,
}

/// Sequences one announcement: lead-in, play, wait on the busy line, lead-out.
#[derive(Debug)]
pub struct PlaybackController {
    state: PlaybackState,
    request: ClipRequest,
    last_played: Option<Instant>,
}

impl PlaybackController {
    pub fn new(initial_clip: u16) -> Self {
        Self {
            state: PlaybackState::Idle,
            request: ClipRequest {
                clip: initial_clip,
                pending: false,
            },
            last_played: None,
        }
    }

    /// Selects `clip` and asks for it to be played. The last submission wins.
    pub fn submit(&mut self, clip: u16) {
        self.request.clip = clip;
        self.request.pending = true;
    }

    /// Asks for the currently selected clip again.
    pub fn replay(&mut self) {
        self.request.pending = true;
    }

    pub fn request(&self) -> ClipRequest {
        self.request
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn last_played(&self) -> Option<Instant> {
        self.last_played
    }

    pub fn poll(&mut self, now: Instant, device_busy: bool, volume: Volume) -> Option<Effect> {
        let (next, effect) = match self.state {
            PlaybackState::Idle if !device_busy && self.request.pending => {
                (PlaybackState::Triggered(now), Some(Effect::StartBlink))
            }
            PlaybackState::Idle => (PlaybackState::Idle, None),
            PlaybackState::Triggered(since) if now.saturating_duration_since(since) >= LEAD_TIME => {
                self.last_played = Some(now);
                let play = Effect::Play {
                    clip: self.request.clip,
                    device_volume: volume.device_level(),
                };
                (PlaybackState::WaitingForStart, Some(play))
            }
            PlaybackState::Triggered(since) => (PlaybackState::Triggered(since), None),
            // no timeout: the busy line is the only word on progress
            PlaybackState::WaitingForStart if device_busy => (PlaybackState::Playing, None),
            PlaybackState::WaitingForStart => (PlaybackState::WaitingForStart, None),
            PlaybackState::Playing if device_busy => (PlaybackState::Playing, None),
            PlaybackState::Playing => (PlaybackState::Finishing(now), None),
            PlaybackState::Finishing(since) if now.saturating_duration_since(since) >= LEAD_TIME => {
                (PlaybackState::Done, Some(Effect::StopBlink))
            }
            PlaybackState::Finishing(since) => (PlaybackState::Finishing(since), None),
            PlaybackState::Done => {
                self.request.pending = false;
                (PlaybackState::Idle, None)
            }
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, clip = self.request.clip, "playback state");
            self.state = next;
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn volume() -> Volume {
        Volume::clamped(50)
    }

    #[test]
    fn stays_idle_without_request() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(5);
        for n in 0..100 {
            assert_eq!(ctl.poll(t0 + ms(n), false, volume()), None);
        }
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }

    #[test]
    fn waits_for_device_to_be_free() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(5);
        ctl.submit(12);
        assert_eq!(ctl.poll(t0, true, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.poll(t0 + ms(1), false, volume()), Some(Effect::StartBlink));
    }

    #[test]
    fn full_cycle_plays_once() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(5);
        ctl.submit(12);

        assert_eq!(ctl.poll(t0, false, volume()), Some(Effect::StartBlink));
        assert_eq!(ctl.state(), PlaybackState::Triggered(t0));

        // lead-in holds
        for n in 1..1000 {
            assert_eq!(ctl.poll(t0 + ms(n), false, volume()), None);
        }
        assert_eq!(
            ctl.poll(t0 + ms(1000), false, volume()),
            Some(Effect::Play { clip: 12, device_volume: 15 })
        );
        assert_eq!(ctl.last_played(), Some(t0 + ms(1000)));
        assert_eq!(ctl.state(), PlaybackState::WaitingForStart);

        // device has not picked up the command yet
        assert_eq!(ctl.poll(t0 + ms(1001), false, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::WaitingForStart);

        assert_eq!(ctl.poll(t0 + ms(1050), true, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::Playing);
        assert_eq!(ctl.poll(t0 + ms(3000), true, volume()), None);
        assert!(ctl.request().pending);

        assert_eq!(ctl.poll(t0 + ms(4000), false, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::Finishing(t0 + ms(4000)));
        assert_eq!(ctl.poll(t0 + ms(4999), false, volume()), None);
        assert_eq!(ctl.poll(t0 + ms(5000), false, volume()), Some(Effect::StopBlink));
        assert_eq!(ctl.state(), PlaybackState::Done);

        assert_eq!(ctl.poll(t0 + ms(5001), false, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert!(!ctl.request().pending);

        // nothing further to play
        assert_eq!(ctl.poll(t0 + ms(6000), false, volume()), None);
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }

    #[test]
    fn last_submission_wins_before_play() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(5);
        ctl.submit(12);
        ctl.poll(t0, false, volume());
        ctl.submit(14);
        assert_eq!(
            ctl.poll(t0 + ms(1000), false, volume()),
            Some(Effect::Play { clip: 14, device_volume: 15 })
        );
    }

    #[test]
    fn waits_unbounded_for_busy() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(5);
        ctl.submit(12);
        ctl.poll(t0, false, volume());
        ctl.poll(t0 + ms(1000), false, volume());
        ctl.poll(t0 + Duration::from_secs(3600), false, volume());
        assert_eq!(ctl.state(), PlaybackState::WaitingForStart);
    }

    #[test]
    fn replay_keeps_selected_clip() {
        let t0 = Instant::now();
        let mut ctl = PlaybackController::new(7);
        ctl.replay();
        ctl.poll(t0, false, volume());
        assert_eq!(
            ctl.poll(t0 + ms(1000), false, volume()),
            Some(Effect::Play { clip: 7, device_volume: 15 })
        );
    }
}

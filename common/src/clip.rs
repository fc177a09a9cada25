//! Animation clip playback with analytic segment stops
//!
//! A clip's time is advanced from the frame delta. Playing a segment stops
//! exactly at the segment end on the frame that crosses it; there is no
//! polling timer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
}

#[derive(Debug, Clone)]
pub struct ClipPlayer {
    duration: f32,
    time: f32,
    speed: f32,
    playing: bool,
    loop_mode: LoopMode,
    /// Hold the last frame instead of rewinding when a one-shot finishes
    clamp_when_finished: bool,
    stop_at: Option<f32>,
}

impl ClipPlayer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            time: 0.0,
            speed: 1.0,
            playing: false,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            stop_at: None,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Normalized position in the clip
    pub fn phase(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            self.time / self.duration
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_loop(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    pub fn set_clamp_when_finished(&mut self, clamp: bool) {
        self.clamp_when_finished = clamp;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
        self.stop_at = None;
    }

    pub fn seek(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.duration);
    }

    /// Play from `from` and pause when `to` is reached
    pub fn play_segment(&mut self, from: f32, to: f32) {
        self.seek(from);
        self.stop_at = Some(to.clamp(0.0, self.duration));
        self.loop_mode = LoopMode::Once;
        self.clamp_when_finished = true;
        self.playing = true;
    }

    /// Advance clip time. Returns true on the frame playback stops on its own.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.playing || self.duration <= 0.0 {
            return false;
        }

        let next = self.time + dt * self.speed;

        if let Some(stop) = self.stop_at {
            if next >= stop {
                self.time = stop;
                self.playing = false;
                self.stop_at = None;
                return true;
            }
        }

        if next < self.duration {
            self.time = next;
            return false;
        }

        match self.loop_mode {
            LoopMode::Repeat => {
                self.time = next % self.duration;
                false
            }
            LoopMode::Once => {
                self.time = if self.clamp_when_finished { self.duration } else { 0.0 };
                self.playing = false;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_pauses_at_half() {
        let mut clip = ClipPlayer::new(2.0);
        clip.play_segment(0.0, 1.0);
        let mut stopped = false;
        for _ in 0..100 {
            stopped |= clip.advance(1.0 / 60.0);
        }
        assert!(stopped);
        assert_eq!(clip.time(), 1.0);
        assert!(!clip.is_playing());
    }

    #[test]
    fn test_second_half_segment() {
        let mut clip = ClipPlayer::new(2.0);
        clip.play_segment(1.0, 2.0);
        assert_eq!(clip.time(), 1.0);
        while !clip.advance(0.1) {}
        assert_eq!(clip.time(), 2.0);
    }

    #[test]
    fn test_repeat_wraps() {
        let mut clip = ClipPlayer::new(1.0);
        clip.play();
        clip.advance(2.5);
        assert!((clip.time() - 0.5).abs() < 1e-5);
        assert!(clip.is_playing());
    }

    #[test]
    fn test_once_without_clamp_rewinds() {
        let mut clip = ClipPlayer::new(1.0);
        clip.set_loop(LoopMode::Once);
        clip.play();
        assert!(clip.advance(1.5));
        assert_eq!(clip.time(), 0.0);
    }

    #[test]
    fn test_stop_and_seek() {
        let mut clip = ClipPlayer::new(3.0);
        clip.seek(5.0);
        assert_eq!(clip.time(), 3.0);
        clip.stop();
        assert_eq!(clip.time(), 0.0);
        assert!(!clip.advance(1.0));
    }
}

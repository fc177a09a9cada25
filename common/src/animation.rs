//! Time-driven effects advanced by the render loop's frame delta
//!
//! Everything here is a plain owned value: a scene stops its effects by
//! clearing or dropping them, so nothing keeps mutating state after the
//! scene that started it is gone.

use std::collections::HashMap;
use std::hash::Hash;

/// Quadratic ease-in-out on [0, 1]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Move `current` toward `target` by `rate * dt` of the remaining gap.
/// Snaps to the target once within `snap`. Returns the new value and whether
/// it has arrived.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32, snap: f32) -> (f32, bool) {
    let next = current + (target - current) * (rate * dt).min(1.0);
    if (next - target).abs() < snap {
        (target, true)
    } else {
        (next, false)
    }
}

/// Fires once after a fixed delay
#[derive(Debug, Clone)]
pub struct Delay {
    remaining: f32,
    fired: bool,
}

impl Delay {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            fired: false,
        }
    }

    /// Returns true exactly once, on the tick the delay elapses
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.fired = true;
            true
        } else {
            false
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// State reported by [`FadeEffect::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeProgress {
    /// Still decaying; carries the current value
    Running(f32),
    /// Reached zero on this call. Reported exactly once.
    Completed,
    /// Already finished earlier
    Done,
}

/// A one-shot linear decay of an opacity-like scalar.
///
/// Every `interval` seconds the value drops by `step` until it reaches
/// exactly zero. There is no pause and no restart. A fade that starts at
/// zero completes on its first tick or advance.
#[derive(Debug, Clone)]
pub struct FadeEffect {
    initial: f32,
    step: f32,
    interval: f32,
    accumulator: f32,
    ticks: u32,
    total_ticks: u32,
    completed: bool,
}

impl FadeEffect {
    pub fn new(initial: f32, step: f32, interval: f32) -> Self {
        let step = step.max(f32::EPSILON);
        let initial = initial.max(0.0);
        // Tolerate float error so that 1.0 / 0.02 takes 50 ticks, not 51.
        let total_ticks = ((initial / step) - 1e-4).ceil().max(0.0) as u32;

        Self {
            initial,
            step,
            interval: interval.max(f32::EPSILON),
            accumulator: 0.0,
            ticks: 0,
            total_ticks,
            completed: false,
        }
    }

    pub fn value(&self) -> f32 {
        if self.ticks >= self.total_ticks {
            0.0
        } else {
            self.initial - self.step * self.ticks as f32
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn is_finished(&self) -> bool {
        self.completed
    }

    /// Apply a single decrement regardless of elapsed time
    pub fn tick(&mut self) -> FadeProgress {
        if self.completed {
            return FadeProgress::Done;
        }
        if self.ticks < self.total_ticks {
            self.ticks += 1;
        }
        if self.ticks >= self.total_ticks {
            self.completed = true;
            FadeProgress::Completed
        } else {
            FadeProgress::Running(self.value())
        }
    }

    /// Advance by frame time, applying as many decrements as intervals elapsed
    pub fn advance(&mut self, dt: f32) -> FadeProgress {
        if self.completed {
            return FadeProgress::Done;
        }
        if self.total_ticks == 0 {
            return self.tick();
        }
        self.accumulator += dt;
        let mut progress = FadeProgress::Running(self.value());
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            progress = self.tick();
            if progress == FadeProgress::Completed {
                break;
            }
        }
        progress
    }
}

#[derive(Debug, Clone)]
enum Timer {
    Delay(Delay),
    Fade(FadeEffect),
}

/// Something a [`Timeline`] produced during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent<K> {
    DelayElapsed(K),
    FadeValue(K, f32),
    FadeCompleted(K),
}

/// Keyed set of running delays and fades owned by one scene.
///
/// Starting a timer under a key that is already running replaces it.
#[derive(Debug, Clone)]
pub struct Timeline<K> {
    timers: HashMap<K, Timer>,
}

impl<K: Copy + Eq + Hash + std::fmt::Debug> Timeline<K> {
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }

    pub fn start_delay(&mut self, key: K, seconds: f32) {
        log::debug!("timer {:?}: delay {:.2}s", key, seconds);
        self.timers.insert(key, Timer::Delay(Delay::new(seconds)));
    }

    pub fn start_fade(&mut self, key: K, fade: FadeEffect) {
        log::debug!("timer {:?}: fade over {} ticks", key, fade.total_ticks());
        self.timers.insert(key, Timer::Fade(fade));
    }

    pub fn cancel(&mut self, key: K) {
        self.timers.remove(&key);
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_running(&self, key: K) -> bool {
        self.timers.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance all timers; finished ones are removed
    pub fn advance(&mut self, dt: f32) -> Vec<TimerEvent<K>> {
        let mut events = Vec::new();
        let mut finished = Vec::new();

        for (key, timer) in self.timers.iter_mut() {
            match timer {
                Timer::Delay(delay) => {
                    if delay.tick(dt) {
                        events.push(TimerEvent::DelayElapsed(*key));
                        finished.push(*key);
                    }
                }
                Timer::Fade(fade) => match fade.advance(dt) {
                    FadeProgress::Running(value) => events.push(TimerEvent::FadeValue(*key, value)),
                    FadeProgress::Completed => {
                        events.push(TimerEvent::FadeValue(*key, 0.0));
                        events.push(TimerEvent::FadeCompleted(*key));
                        finished.push(*key);
                    }
                    FadeProgress::Done => finished.push(*key),
                },
            }
        }

        for key in finished {
            self.timers.remove(&key);
        }
        events
    }
}

impl<K: Copy + Eq + Hash + std::fmt::Debug> Default for Timeline<K> {
    fn default() -> Self {
        Self::new()
    }
}

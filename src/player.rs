//! Playback clock for the active video.
//!
//! A terminal cannot decode video, so "playing" a clip is modeled as a
//! progress clock over its known duration. The clock drives the on-card
//! progress bar and fires a one-shot finished signal that the event loop
//! turns into an advance-to-next navigation, the same way the web player's
//! `ended` event does.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks playback progress of whichever video is active.
///
/// Restarted from zero whenever the active index changes. Videos with an
/// unknown duration show an indeterminate bar and never finish.
pub struct PlaybackClock {
    duration: Option<Duration>,
    /// Start of the current playing stretch; `None` when idle or paused.
    started_at: Option<Instant>,
    /// Elapsed time accumulated across previous playing stretches.
    accumulated: Duration,
    paused: bool,
    /// Latched once the finished signal has been emitted, so a clip ends
    /// exactly once.
    finished: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            duration: None,
            started_at: None,
            accumulated: Duration::ZERO,
            paused: false,
            finished: false,
        }
    }

    /// Start watching a new video from the beginning.
    pub fn watch(&mut self, duration: Option<Duration>) {
        self.duration = duration;
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        self.paused = false;
        self.finished = false;
    }

    /// Stop the clock entirely (empty feed, teardown).
    pub fn stop(&mut self) {
        self.started_at = None;
        self.duration = None;
        self.paused = false;
        self.finished = false;
        self.accumulated = Duration::ZERO;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume. No-op when idle.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.started_at = Some(Instant::now());
            self.paused = false;
        } else if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
            self.paused = true;
        }
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or(Duration::ZERO);
        self.accumulated + running
    }

    /// Elapsed and total time for the progress bar. `None` when idle or
    /// when the duration is unknown (indeterminate playback).
    pub fn progress(&self) -> Option<(Duration, Duration)> {
        if self.started_at.is_none() && !self.paused {
            return None;
        }
        let duration = self.duration?;
        Some((self.elapsed().min(duration), duration))
    }

    /// Returns true exactly once, the first time elapsed playback reaches
    /// the clip duration. Polled from the event-loop tick.
    pub fn poll_finished(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let Some(duration) = self.duration else {
            return false;
        };
        if self.started_at.is_none() && !self.paused {
            return false; // Idle
        }
        if self.elapsed() >= duration {
            self.finished = true;
            return true;
        }
        false
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_finishes_once_after_duration() {
        let mut clock = PlaybackClock::new();
        clock.watch(Some(Duration::from_secs(10)));

        time::advance(Duration::from_secs(9)).await;
        assert!(!clock.poll_finished());

        time::advance(Duration::from_secs(2)).await;
        assert!(clock.poll_finished());
        assert!(!clock.poll_finished()); // Latched, fires only once
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_elapsed_time() {
        let mut clock = PlaybackClock::new();
        clock.watch(Some(Duration::from_secs(10)));

        time::advance(Duration::from_secs(4)).await;
        clock.toggle_pause();
        time::advance(Duration::from_secs(60)).await;
        assert!(!clock.poll_finished()); // Paused clips never finish

        let (elapsed, total) = clock.progress().unwrap();
        assert_eq!(elapsed, Duration::from_secs(4));
        assert_eq!(total, Duration::from_secs(10));

        clock.toggle_pause();
        time::advance(Duration::from_secs(7)).await;
        assert!(clock.poll_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_duration_never_finishes() {
        let mut clock = PlaybackClock::new();
        clock.watch(None);
        time::advance(Duration::from_secs(3600)).await;
        assert!(!clock.poll_finished());
        assert!(clock.progress().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_restarts_from_zero() {
        let mut clock = PlaybackClock::new();
        clock.watch(Some(Duration::from_secs(5)));
        time::advance(Duration::from_secs(4)).await;

        clock.watch(Some(Duration::from_secs(5)));
        time::advance(Duration::from_secs(2)).await;
        let (elapsed, _) = clock.progress().unwrap();
        assert_eq!(elapsed, Duration::from_secs(2));
    }

    #[test]
    fn test_idle_clock_reports_nothing() {
        let mut clock = PlaybackClock::new();
        assert!(clock.progress().is_none());
        assert!(!clock.poll_finished());
        clock.toggle_pause(); // No-op when idle
        assert!(!clock.is_paused());
    }
}

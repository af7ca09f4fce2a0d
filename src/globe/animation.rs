use std::time::{Duration, Instant};

use super::geometry::{ease_in_out_quad, Orientation};

/// Scripted rotation toward a target orientation.
///
/// Ticked once per frame with the caller's notion of "now", so tests drive it
/// with synthetic instants instead of a live frame callback.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FlyTo {
    #[default]
    Idle,
    Animating {
        from: Orientation,
        to: Orientation,
        started: Instant,
        duration: Duration,
    },
}

impl FlyTo {
    /// Begin (or restart) a flight from the current orientation.
    pub fn start(&mut self, from: Orientation, to: Orientation, now: Instant, duration: Duration) {
        *self = FlyTo::Animating {
            from,
            to,
            started: now,
            duration,
        };
    }

    pub fn cancel(&mut self) {
        *self = FlyTo::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FlyTo::Animating { .. })
    }

    /// Orientation for this frame, or `None` when idle. Returns to idle after
    /// emitting the exact target on the final frame.
    pub fn tick(&mut self, now: Instant) -> Option<Orientation> {
        let FlyTo::Animating {
            from,
            to,
            started,
            duration,
        } = *self
        else {
            return None;
        };

        let elapsed = now.saturating_duration_since(started);
        let progress = if duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            *self = FlyTo::Idle;
            return Some(to);
        }
        Some(from.lerp(to, ease_in_out_quad(progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(1500);

    #[test]
    fn test_idle_tick_is_none() {
        let mut fly = FlyTo::default();
        assert_eq!(fly.tick(Instant::now()), None);
    }

    #[test]
    fn test_reaches_target_after_duration() {
        let t0 = Instant::now();
        let mut fly = FlyTo::Idle;
        let from = Orientation::new(2.1, -0.7);
        let to = Orientation::new(0.0, 0.0);
        fly.start(from, to, t0, DURATION);

        let o = fly.tick(t0 + DURATION).unwrap();
        assert!(o.yaw.abs() < 1e-12 && o.pitch.abs() < 1e-12);
        assert!(!fly.is_active());
        assert_eq!(fly.tick(t0 + DURATION * 2), None);
    }

    #[test]
    fn test_midpoint_is_halfway() {
        let t0 = Instant::now();
        let mut fly = FlyTo::Idle;
        fly.start(Orientation::new(0.0, 0.0), Orientation::new(1.0, -1.0), t0, DURATION);
        let o = fly.tick(t0 + DURATION / 2).unwrap();
        assert!((o.yaw - 0.5).abs() < 1e-9);
        assert!((o.pitch + 0.5).abs() < 1e-9);
        assert!(fly.is_active());
    }

    #[test]
    fn test_early_frames_ease_in() {
        let t0 = Instant::now();
        let mut fly = FlyTo::Idle;
        fly.start(Orientation::new(0.0, 0.0), Orientation::new(1.0, 0.0), t0, DURATION);
        // 25% of the time covers 12.5% of the distance
        let o = fly.tick(t0 + DURATION / 4).unwrap();
        assert!((o.yaw - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_restart_uses_new_origin() {
        let t0 = Instant::now();
        let mut fly = FlyTo::Idle;
        fly.start(Orientation::new(0.0, 0.0), Orientation::new(1.0, 0.0), t0, DURATION);
        let mid = fly.tick(t0 + DURATION / 2).unwrap();

        let t1 = t0 + DURATION / 2;
        fly.start(mid, Orientation::new(-1.0, 0.3), t1, DURATION);
        let o = fly.tick(t1).unwrap();
        assert!((o.yaw - mid.yaw).abs() < 1e-12);
        let o = fly.tick(t1 + DURATION).unwrap();
        assert!((o.yaw + 1.0).abs() < 1e-12 && (o.pitch - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_goes_idle() {
        let t0 = Instant::now();
        let mut fly = FlyTo::Idle;
        fly.start(Orientation::default(), Orientation::new(1.0, 1.0), t0, DURATION);
        fly.cancel();
        assert_eq!(fly.tick(t0 + DURATION / 3), None);
    }
}

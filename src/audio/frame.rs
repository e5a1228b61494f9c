//! Frame acquisition: one window of N consecutive samples per pipeline pass.

use std::thread;
use std::time::{Duration, Instant};

use super::source::{Sample, SampleSource};
use crate::error::ReadError;

/// Running target timestamp for the next sample.
///
/// Advanced by one sample period per read. When the pipeline is ahead of
/// the target it sleeps; when it is behind it reads straight on and
/// catches up.
#[derive(Debug, Clone)]
pub struct SampleClock {
    period: Duration,
    next: Instant,
}

impl SampleClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now(),
        }
    }

    /// Restart the schedule from now (start of every frame)
    pub fn restart(&mut self) {
        self.next = Instant::now();
    }

    /// Sleep until the current target, then advance it by one period
    pub fn wait_and_advance(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }
        self.next += self.period;
    }

    /// Advance the target without waiting
    pub fn advance(&mut self) {
        self.next += self.period;
    }

    pub fn next_target(&self) -> Instant {
        self.next
    }
}

/// How a frame fill went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Slots that reused the previous sample because the read timed out
    pub timeouts: usize,
    /// Slots that reused the previous sample because the source went away
    pub disconnects: usize,
}

impl FillReport {
    pub fn stale_slots(&self) -> usize {
        self.timeouts + self.disconnects
    }

    pub fn is_clean(&self) -> bool {
        self.stale_slots() == 0
    }
}

/// Exactly N samples, rebuilt from scratch for every transform
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    samples: Vec<f32>,
    /// Last good sample, reused for slots whose read failed
    last: Sample,
}

impl FrameBuffer {
    pub fn new(frame_size: usize) -> Self {
        Self {
            samples: vec![0.0; frame_size],
            last: Sample::SILENCE,
        }
    }

    /// Build a frame from ready-made amplitudes (test signals, offline analysis)
    pub fn from_amplitudes(amplitudes: &[f32]) -> Self {
        Self {
            samples: amplitudes.to_vec(),
            last: Sample::SILENCE,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Read every slot of the frame from `source`.
    ///
    /// A failed read never aborts the frame: the slot takes the last good
    /// sample instead. Unclocked sources are paced with `clock`.
    pub fn fill<S: SampleSource + ?Sized>(
        &mut self,
        source: &mut S,
        timeout: Duration,
        clock: &mut SampleClock,
    ) -> FillReport {
        let paced = !source.is_clocked();
        let mut report = FillReport::default();
        clock.restart();

        for slot in self.samples.iter_mut() {
            if paced {
                clock.wait_and_advance();
            } else {
                clock.advance();
            }

            match source.read_sample(timeout) {
                Ok(sample) => self.last = sample,
                Err(ReadError::Timeout) => report.timeouts += 1,
                Err(ReadError::Disconnected) => report.disconnects += 1,
            }
            *slot = self.last.amplitude();
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed script of read results
    struct Scripted(VecDeque<Result<Sample, ReadError>>);

    impl SampleSource for Scripted {
        fn read_sample(&mut self, _timeout: Duration) -> Result<Sample, ReadError> {
            self.0.pop_front().unwrap_or(Err(ReadError::Disconnected))
        }
    }

    #[test]
    fn test_fill_reads_every_slot() {
        let mut source = Scripted((1..=8).map(|v| Ok(Sample(v))).collect());
        let mut frame = FrameBuffer::new(8);
        let mut clock = SampleClock::new(Duration::from_micros(98));

        let report = frame.fill(&mut source, Duration::from_millis(1), &mut clock);

        assert!(report.is_clean());
        assert_eq!(frame.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_failed_reads_reuse_last_sample() {
        let script = vec![
            Err(ReadError::Timeout),
            Ok(Sample(5)),
            Err(ReadError::Timeout),
            Err(ReadError::Timeout),
            Ok(Sample(-3)),
            Err(ReadError::Disconnected),
        ];
        let mut source = Scripted(script.into_iter().collect());
        let mut frame = FrameBuffer::new(6);
        let mut clock = SampleClock::new(Duration::from_micros(98));

        let report = frame.fill(&mut source, Duration::from_millis(1), &mut clock);

        // Leading timeout falls back to silence
        assert_eq!(frame.as_slice(), &[0.0, 5.0, 5.0, 5.0, -3.0, -3.0]);
        assert_eq!(report.timeouts, 3);
        assert_eq!(report.disconnects, 1);
        assert_eq!(report.stale_slots(), 4);
    }

    #[test]
    fn test_stale_sample_carries_across_frames() {
        let mut source = Scripted(vec![Ok(Sample(9)), Ok(Sample(7))].into_iter().collect());
        let mut frame = FrameBuffer::new(2);
        let mut clock = SampleClock::new(Duration::from_micros(98));

        frame.fill(&mut source, Duration::from_millis(1), &mut clock);
        let report = frame.fill(&mut source, Duration::from_millis(1), &mut clock);

        assert_eq!(frame.as_slice(), &[7.0, 7.0]);
        assert_eq!(report.disconnects, 2);
    }

    #[test]
    fn test_clock_advances_by_period() {
        let period = Duration::from_micros(100);
        let mut clock = SampleClock::new(period);
        clock.restart();
        let start = clock.next_target();

        for _ in 0..10 {
            clock.advance();
        }
        assert_eq!(clock.next_target() - start, period * 10);
    }

    #[test]
    fn test_paced_fill_takes_real_time() {
        struct Unclocked;
        impl SampleSource for Unclocked {
            fn read_sample(&mut self, _timeout: Duration) -> Result<Sample, ReadError> {
                Ok(Sample(1))
            }
            fn is_clocked(&self) -> bool {
                false
            }
        }

        let mut frame = FrameBuffer::new(20);
        let mut clock = SampleClock::new(Duration::from_millis(1));
        let start = Instant::now();
        frame.fill(&mut Unclocked, Duration::from_millis(1), &mut clock);

        // 20 slots at 1 ms each, the first one is due immediately
        assert!(start.elapsed() >= Duration::from_millis(19));
    }
}

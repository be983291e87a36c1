//! The clock ticker: one recurring timer that samples the clock and pushes readings.
//!
//! States:
//! - `Idle`: no timer scheduled
//! - `Running`: exactly one timer scheduled on the run loop
//!
//! `start` always cancels the previous timer before scheduling a new one, so repeated
//! activation never produces overlapping tick streams. `stop` (or dropping the
//! ticker) invalidates the timer before returning.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::angles::HandAngles;
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::format::{digital_time_text, TextStyle};
use crate::run_loop::{RunLoop, TimerHandle};
use crate::time::{TimeSource, WallClockTime};

/// Everything one tick produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReading {
    pub time: WallClockTime,
    pub angles: HandAngles,
    pub text: String,
}

impl ClockReading {
    pub fn new(time: WallClockTime, style: TextStyle) -> Self {
        Self {
            time,
            angles: HandAngles::from_time(time),
            text: digital_time_text(time, style),
        }
    }
}

/// Receiver of clock readings (hand rotation + label text).
pub trait PresentationSink {
    /// Applies a fresh reading. Readings are absolute; none depends on the previous one.
    fn present(&mut self, reading: &ClockReading);

    /// Called instead of `present` when the clock could not be read this tick.
    fn clock_unavailable(&mut self, err: &ClockError) {
        log::warn!("clock tick skipped: {err}");
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickerState {
    Idle,
    Running,
}

/// Drives a [`PresentationSink`] from a recurring run loop timer.
pub struct ClockTicker<T: TimeSource + 'static> {
    run_loop: RunLoop,
    source: Rc<T>,
    config: ClockConfig,
    timer: Option<TimerHandle>,
}

impl<T: TimeSource + 'static> ClockTicker<T> {
    pub fn new(run_loop: RunLoop, source: T, config: ClockConfig) -> Self {
        Self::with_shared_source(run_loop, Rc::new(source), config)
    }

    /// Builds a ticker around a source the caller keeps a handle to.
    pub fn with_shared_source(run_loop: RunLoop, source: Rc<T>, config: ClockConfig) -> Self {
        Self {
            run_loop,
            source,
            config,
            timer: None,
        }
    }

    pub fn state(&self) -> TickerState {
        match &self.timer {
            Some(_) => TickerState::Running,
            None => TickerState::Idle,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Samples the clock once without touching the timer.
    pub fn sample(&self) -> Result<ClockReading, ClockError> {
        sample(&*self.source, self.config.text_style)
    }

    /// Starts ticking into `sink`, first fire one period from now.
    ///
    /// The sink receives one reading immediately so it never shows a stale face.
    pub fn start<S>(&mut self, sink: &Rc<RefCell<S>>) -> Result<(), ClockError>
    where
        S: PresentationSink + ?Sized + 'static,
    {
        self.start_at(Instant::now(), sink)
    }

    /// Like [`start`](Self::start) with an explicit timer origin.
    pub fn start_at<S>(&mut self, origin: Instant, sink: &Rc<RefCell<S>>) -> Result<(), ClockError>
    where
        S: PresentationSink + ?Sized + 'static,
    {
        self.stop();

        let weak = Rc::downgrade(sink);
        let source = self.source.clone();
        let style = self.config.text_style;

        let timer = self
            .run_loop
            .schedule_repeating_at(origin, self.config.tick_period, move || {
                // The sink owner may already be gone; nothing to update then.
                let Some(sink) = weak.upgrade() else { return };
                deliver(&*source, style, &sink);
            })?;

        self.timer = Some(timer);
        log::debug!("clock ticker started, period {:?}", self.config.tick_period);

        deliver(&*self.source, style, sink);
        Ok(())
    }

    /// Cancels the timer. No tick fires after this returns.
    pub fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            log::debug!("clock ticker stopped");
        }
    }
}

impl<T: TimeSource + 'static> Drop for ClockTicker<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample<T: TimeSource + ?Sized>(source: &T, style: TextStyle) -> Result<ClockReading, ClockError> {
    source.now().map(|time| ClockReading::new(time, style))
}

fn deliver<T, S>(source: &T, style: TextStyle, sink: &RefCell<S>)
where
    T: TimeSource + ?Sized,
    S: PresentationSink + ?Sized,
{
    let Ok(mut sink) = sink.try_borrow_mut() else {
        log::warn!("presentation sink busy; tick dropped");
        return;
    };

    match sample(source, style) {
        Ok(reading) => sink.present(&reading),
        Err(err) => sink.clock_unavailable(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedTimeSource;
    use std::cell::Cell;
    use std::f64::consts::PI;
    use std::time::Duration;

    const SEC: Duration = Duration::from_secs(1);

    #[derive(Default)]
    struct Recorder {
        readings: Vec<ClockReading>,
        failures: u32,
    }

    impl PresentationSink for Recorder {
        fn present(&mut self, reading: &ClockReading) {
            self.readings.push(reading.clone());
        }

        fn clock_unavailable(&mut self, _err: &ClockError) {
            self.failures += 1;
        }
    }

    /// Counts how many times the clock was sampled.
    struct CountingSource {
        inner: FixedTimeSource,
        samples: Cell<u32>,
    }

    impl CountingSource {
        fn at(h: u32, m: u32, s: u32) -> Self {
            Self {
                inner: FixedTimeSource::new(WallClockTime::new(h, m, s).unwrap()),
                samples: Cell::new(0),
            }
        }
    }

    impl TimeSource for CountingSource {
        fn now(&self) -> Result<WallClockTime, ClockError> {
            self.samples.set(self.samples.get() + 1);
            self.inner.now()
        }
    }

    fn setup() -> (RunLoop, Rc<CountingSource>, ClockTicker<CountingSource>, Rc<RefCell<Recorder>>) {
        let rl = RunLoop::new();
        let source = Rc::new(CountingSource::at(3, 30, 0));
        let ticker = ClockTicker::with_shared_source(rl.clone(), source.clone(), ClockConfig::default());
        (rl, source, ticker, Rc::new(RefCell::new(Recorder::default())))
    }

    #[test]
    fn reading_combines_angles_and_text() {
        let r = ClockReading::new(WallClockTime::new(0, 0, 30).unwrap(), TextStyle::Legacy);
        assert!((r.angles.second - PI).abs() < 1e-12);
        assert_eq!(r.text, "0 :0 :30 ");
    }

    #[test]
    fn start_presents_immediately() {
        let (rl, _source, mut ticker, sink) = setup();
        assert_eq!(ticker.state(), TickerState::Idle);

        ticker.start(&sink).unwrap();

        assert_eq!(ticker.state(), TickerState::Running);
        assert_eq!(rl.active_timers(), 1);
        let rec = sink.borrow();
        assert_eq!(rec.readings.len(), 1);
        assert_eq!(rec.readings[0].text, "3 :30 :0 ");
        assert!((rec.readings[0].angles.minute - PI).abs() < 1e-12);
    }

    #[test]
    fn each_fire_resamples_the_clock() {
        let (rl, source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();

        source.inner.set(WallClockTime::new(3, 30, 1).unwrap());
        assert_eq!(rl.run_due(t0 + SEC), 1);
        source.inner.set(WallClockTime::new(3, 30, 2).unwrap());
        assert_eq!(rl.run_due(t0 + 2 * SEC), 1);

        let texts: Vec<_> = sink.borrow().readings.iter().map(|r| r.text.clone()).collect();
        assert_eq!(texts, ["3 :30 :0 ", "3 :30 :1 ", "3 :30 :2 "]);
    }

    #[test]
    fn double_start_keeps_a_single_timer() {
        let (rl, _source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();
        ticker.start_at(t0, &sink).unwrap();
        assert_eq!(rl.active_timers(), 1);

        let mut fires = 0;
        for step in 1..=100u32 {
            fires += rl.run_due(t0 + Duration::from_millis(100) * step);
        }
        assert_eq!(fires, 10);
        // Two immediate readings (one per start) plus ten fires.
        assert_eq!(sink.borrow().readings.len(), 12);
    }

    #[test]
    fn stop_halts_all_computation() {
        let (rl, source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();
        for n in 1..=3u32 {
            rl.run_due(t0 + SEC * n);
        }
        let samples_before = source.samples.get();
        assert_eq!(samples_before, 4);

        ticker.stop();
        assert_eq!(ticker.state(), TickerState::Idle);
        assert_eq!(rl.run_due(t0 + 3600 * SEC), 0);
        assert_eq!(source.samples.get(), samples_before);
        assert_eq!(sink.borrow().readings.len(), 4);
    }

    #[test]
    fn dropping_ticker_cancels_timer() {
        let (rl, source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();
        drop(ticker);

        assert_eq!(rl.active_timers(), 0);
        assert_eq!(rl.run_due(t0 + 10 * SEC), 0);
        assert_eq!(source.samples.get(), 1);
    }

    #[test]
    fn dropped_sink_makes_fires_inert() {
        let (rl, source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();
        drop(sink);

        assert_eq!(rl.run_due(t0 + SEC), 1);
        assert_eq!(source.samples.get(), 1);
    }

    #[test]
    fn unavailable_clock_is_reported_and_ticking_continues() {
        let rl = RunLoop::new();
        let mut ticker = ClockTicker::new(rl.clone(), FixedTimeSource::unavailable(), ClockConfig::default());
        let sink = Rc::new(RefCell::new(Recorder::default()));
        let t0 = Instant::now();

        ticker.start_at(t0, &sink).unwrap();
        rl.run_due(t0 + SEC);

        assert_eq!(sink.borrow().failures, 2);
        assert!(sink.borrow().readings.is_empty());
        assert_eq!(ticker.state(), TickerState::Running);
    }

    #[test]
    fn zero_period_fails_to_start() {
        let config = ClockConfig { tick_period: Duration::ZERO, ..ClockConfig::default() };
        let source = FixedTimeSource::new(WallClockTime::new(1, 0, 0).unwrap());
        let mut ticker = ClockTicker::new(RunLoop::new(), source, config);
        let sink = Rc::new(RefCell::new(Recorder::default()));

        assert_eq!(ticker.start(&sink), Err(ClockError::InvalidPeriod));
        assert_eq!(ticker.state(), TickerState::Idle);
        assert!(sink.borrow().readings.is_empty());
    }

    #[test]
    fn busy_sink_drops_the_tick() {
        let (rl, _source, mut ticker, sink) = setup();
        let t0 = Instant::now();
        ticker.start_at(t0, &sink).unwrap();

        let guard = sink.borrow_mut();
        assert_eq!(rl.run_due(t0 + SEC), 1);
        drop(guard);

        assert_eq!(sink.borrow().readings.len(), 1);
    }

    #[test]
    fn trait_object_sinks_are_accepted() {
        let rl = RunLoop::new();
        let source = FixedTimeSource::new(WallClockTime::new(6, 0, 0).unwrap());
        let mut ticker = ClockTicker::new(rl, source, ClockConfig::default());
        let sink: Rc<RefCell<dyn PresentationSink>> = Rc::new(RefCell::new(Recorder::default()));
        ticker.start(&sink).unwrap();
        assert_eq!(ticker.state(), TickerState::Running);
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::{AppOp, Envelope};

enum PumpCtl {
    Start { interval_ms: u64, generation: usize },
    Stop,
    Quit,
}

/// Periodic sampler for one widget. A background thread posts
/// `AppOp::Pump` envelopes tagged with the pump id and the generation of the
/// run that produced them.
///
/// Starting a running pump and stopping a stopped one are no-ops. A sample
/// still in flight after `stop` carries an old generation and is rejected
/// by `accepts`, so stopping takes effect immediately.
///
/// At most one sample per run is queued at a time. Firings that happen while
/// a sample is still waiting are counted instead of sent, and `take_ticks`
/// hands the count to whoever handles the sample.
pub struct Pump {
    ctl: Sender<PumpCtl>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicUsize>,
    running: bool,
    generation: usize,
}

impl Pump {
    pub fn spawn(pump_id: usize, main: Sender<Envelope>) -> Self {
        let (ctl, ctl_rx) = mpsc::channel();
        let ticks = Arc::new(AtomicUsize::new(0));
        let thread_ticks = ticks.clone();
        let handle = std::thread::Builder::new()
            .name(format!("pump-{}", pump_id))
            .spawn(move || pump_thread(pump_id, ctl_rx, main, thread_ticks))
            .map_err(|e| log::error!("can't spawn pump {}: {}", pump_id, e))
            .ok();
        Self {
            ctl,
            handle,
            ticks,
            running: false,
            generation: 0,
        }
    }

    pub fn start(&mut self, interval_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        if self.ctl.send(PumpCtl::Start { interval_ms, generation }).is_err() {
            log::warn!("pump thread is gone; sampling unavailable");
        }
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.ctl.send(PumpCtl::Stop).ok();
        true
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[cfg(test)]
    pub fn record_ticks(&self, ticks: usize) {
        self.ticks.fetch_add(ticks, Ordering::AcqRel);
    }

    /// Firings since the last accepted sample; clears the count so the pump
    /// may queue its next sample.
    pub fn take_ticks(&self) -> usize {
        self.ticks.swap(0, Ordering::AcqRel)
    }

    pub fn accepts(&self, generation: usize) -> bool {
        self.running && generation == self.generation
    }

    pub fn shutdown(&mut self) {
        self.running = false;
        self.ctl.send(PumpCtl::Quit).ok();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump_thread(
    pump_id: usize,
    ctl: Receiver<PumpCtl>,
    main: Sender<Envelope>,
    ticks: Arc<AtomicUsize>,
) {
    // (interval, generation, next deadline) while running
    let mut schedule: Option<(Duration, usize, Instant)> = None;

    loop {
        // Block while stopped; wait for the next deadline while running.
        let msg = match schedule {
            Some((_, _, deadline)) => {
                match ctl.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(msg) => Some(msg),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match ctl.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            },
        };

        match msg {
            None => {
                if let Some((interval, generation, deadline)) = schedule.as_mut() {
                    // Missed deadlines are skipped, not replayed.
                    let now = Instant::now();
                    *deadline += *interval;
                    if *deadline <= now {
                        *deadline = now + *interval;
                    }
                    if ticks.fetch_add(1, Ordering::AcqRel) > 0 {
                        continue;
                    }
                    let sample = Envelope::new(AppOp::Pump, pump_id, *generation);
                    if main.send(sample).is_err() {
                        break;
                    }
                }
            }
            Some(PumpCtl::Start { interval_ms, generation }) => {
                let interval = Duration::from_millis(interval_ms.max(1));
                ticks.store(0, Ordering::Release);
                schedule = Some((interval, generation, Instant::now() + interval));
            }
            Some(PumpCtl::Stop) => schedule = None,
            Some(PumpCtl::Quit) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn start_and_stop_are_guarded() {
        let (tx, _rx) = mpsc::channel();
        let mut pump = Pump::spawn(7, tx);
        assert!(!pump.stop());
        assert!(pump.start(1000));
        assert!(!pump.start(10));
        assert_eq!(pump.generation(), 1);
        assert!(pump.stop());
        assert!(!pump.is_running());
    }

    #[test]
    fn samples_carry_id_and_generation() {
        let (tx, rx) = mpsc::channel();
        let mut pump = Pump::spawn(3, tx);
        pump.start(5);
        let sample = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(AppOp::from_usize(sample.id), Some(AppOp::Pump)));
        assert_eq!(sample.arg1, 3);
        assert!(pump.accepts(sample.arg2));

        pump.stop();
        assert!(!pump.accepts(sample.arg2));
        pump.start(5);
        assert!(!pump.accepts(sample.arg2)); // a new run, a new generation
        pump.shutdown();
    }

    #[test]
    fn slow_consumer_sees_one_sample_and_a_tick_count() {
        let (tx, rx) = mpsc::channel();
        let mut pump = Pump::spawn(1, tx);
        pump.start(5);
        std::thread::sleep(Duration::from_millis(300));

        let queued: Vec<Envelope> = rx.try_iter().collect();
        assert_eq!(queued.len(), 1);
        assert!(pump.accepts(queued[0].arg2));
        let ticks = pump.take_ticks();
        assert!(ticks > 1, "firings while stalled are counted, got {}", ticks);

        // once the count is taken the next firing is posted again
        let next = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(next.arg1, 1);
        pump.shutdown();
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration as StdDuration, Instant};

use embassy_futures::block_on;
use embassy_time::Duration;
use myrtio_light_channels::{
    AttributeCache, AttributeValue, ChannelConfig, ClusterId, DriverConfig, EffectJob,
    EffectSpawner, EffectTimings, FixtureDriver, LedStrip, Rgb, SpawnError, StripFactory,
};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

#[derive(Debug, Default)]
struct StripRecord {
    frames: Vec<Vec<Rgb>>,
}

/// Shared view of everything a [`MockStrip`] committed
#[derive(Debug, Clone, Default)]
pub struct StripProbe(Arc<Mutex<StripRecord>>);

impl StripProbe {
    pub fn commits(&self) -> usize {
        self.0.lock().unwrap().frames.len()
    }

    /// Last committed frame, empty if nothing was committed yet
    pub fn pixels(&self) -> Vec<Rgb> {
        self.0.lock().unwrap().frames.last().cloned().unwrap_or_default()
    }

    pub fn frames(&self) -> Vec<Vec<Rgb>> {
        self.0.lock().unwrap().frames.clone()
    }

    fn record(&self, frame: Vec<Rgb>) {
        self.0.lock().unwrap().frames.push(frame);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    OutOfRange(u16),
    BringUp(u8),
}

/// Strip that keeps every committed frame
pub struct MockStrip {
    buffer: Vec<Rgb>,
    probe: StripProbe,
}

impl LedStrip for MockStrip {
    type Error = MockError;

    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error> {
        let pixel = self
            .buffer
            .get_mut(usize::from(index))
            .ok_or(MockError::OutOfRange(index))?;
        *pixel = color;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), Self::Error> {
        self.probe.record(self.buffer.clone());
        Ok(())
    }
}

/// Hands out [`MockStrip`]s, failing bring-up for chosen addresses
#[derive(Default)]
pub struct MockFactory {
    failing: Vec<u8>,
    probes: HashMap<u8, StripProbe>,
    attempts: usize,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(addresses: &[u8]) -> Self {
        Self {
            failing: addresses.to_vec(),
            ..Self::default()
        }
    }

    /// Probe of the strip brought up at `address`
    pub fn probe(&self, address: u8) -> StripProbe {
        self.probes
            .get(&address)
            .cloned()
            .expect("no strip at address")
    }

    pub fn has_strip(&self, address: u8) -> bool {
        self.probes.contains_key(&address)
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl StripFactory for MockFactory {
    type Strip = MockStrip;
    type Error = MockError;

    fn bring_up(&mut self, config: &ChannelConfig) -> Result<MockStrip, MockError> {
        self.attempts += 1;
        if self.failing.contains(&config.address) {
            return Err(MockError::BringUp(config.address));
        }
        let probe = StripProbe::default();
        self.probes.insert(config.address, probe.clone());
        Ok(MockStrip {
            buffer: vec![BLACK; usize::from(config.led_count)],
            probe,
        })
    }
}

/// Runs every effect job on its own thread
#[derive(Default)]
pub struct ThreadSpawner {
    spawned: AtomicUsize,
    refuse: AtomicBool,
}

impl ThreadSpawner {
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Make the following spawns fail as if the task pool were exhausted
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

impl EffectSpawner<MockStrip> for ThreadSpawner {
    fn spawn(&self, job: EffectJob<MockStrip>) -> Result<(), SpawnError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SpawnError::Busy);
        }
        self.spawned.fetch_add(1, Ordering::SeqCst);
        std::thread::spawn(move || block_on(job.run()));
        Ok(())
    }
}

pub type TestDriver = FixtureDriver<MockStrip, ThreadSpawner>;

/// Short timings so effect tests finish quickly
pub const FAST_TIMINGS: EffectTimings = EffectTimings {
    blink: Duration::from_millis(5),
    breathe_step: Duration::from_millis(2),
    identify_pulse: Duration::from_millis(3),
    identify_pause: Duration::from_millis(8),
    random_color: Duration::from_millis(4),
    idle: Duration::from_millis(5),
};

pub fn leak_driver(config: DriverConfig) -> &'static TestDriver {
    Box::leak(Box::new(FixtureDriver::new(config, ThreadSpawner::default())))
}

/// Driver with fast effects, initialized with `configs`
pub fn driver_with(
    default_power: bool,
    configs: &[ChannelConfig],
) -> (&'static TestDriver, MockFactory) {
    let driver = leak_driver(DriverConfig::new(default_power).with_timings(FAST_TIMINGS));
    let mut factory = MockFactory::new();
    block_on(driver.init(&mut factory, configs));
    (driver, factory)
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: StdDuration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(StdDuration::from_millis(1));
    }
    condition()
}

pub fn is_lit(frame: &[Rgb]) -> bool {
    frame.iter().any(|pixel| *pixel != BLACK)
}

/// Attribute store standing in for the protocol stack
#[derive(Debug, Clone, Default)]
pub struct SharedCache(Arc<Mutex<HashMap<(u8, u16, u16), AttributeValue>>>);

impl SharedCache {
    pub fn set(&self, endpoint: u8, cluster: ClusterId, attribute: u16, value: AttributeValue) {
        self.0
            .lock()
            .unwrap()
            .insert((endpoint, cluster.raw(), attribute), value);
    }
}

impl AttributeCache for SharedCache {
    fn read(&self, endpoint: u8, cluster: ClusterId, attribute: u16) -> Option<AttributeValue> {
        self.0
            .lock()
            .unwrap()
            .get(&(endpoint, cluster.raw(), attribute))
            .copied()
    }
}

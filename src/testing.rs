//! Recording fakes shared by the unit tests.
//!
//! A single [`Recorder`] hands out a bus, an enable pin and a delay that all
//! append to one ordered event log, so tests can check what the bus saw
//! relative to the state of the enable line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c;

use crate::interface::Mma8491Interface;
use crate::registers::{REG_OUT_X_MSB, REG_STATUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    EnableHigh,
    EnableLow,
    StatusRead,
    BurstRead,
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    enabled: bool,
    status: VecDeque<Result<u8, i2c::ErrorKind>>,
    idle_status: u8,
    bursts: VecDeque<Result<[u8; 6], i2c::ErrorKind>>,
    fail_enable_high: bool,
    fail_enable_low: bool,
}

#[derive(Clone, Default)]
pub struct Recorder {
    state: Rc<RefCell<State>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> FakeBus {
        FakeBus {
            state: self.state.clone(),
        }
    }

    pub fn pin(&self) -> FakePin {
        FakePin {
            state: self.state.clone(),
        }
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            state: self.state.clone(),
        }
    }

    /// Queues responses for successive `STATUS` reads.
    pub fn push_status(&self, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.status.extend(values.iter().map(|&value| Ok(value)));
    }

    /// Value returned by `STATUS` reads once the queue is drained.
    pub fn set_idle_status(&self, value: u8) {
        self.state.borrow_mut().idle_status = value;
    }

    pub fn push_status_error(&self) {
        self.state
            .borrow_mut()
            .status
            .push_back(Err(i2c::ErrorKind::Other));
    }

    pub fn push_burst(&self, bytes: [u8; 6]) {
        self.state.borrow_mut().bursts.push_back(Ok(bytes));
    }

    pub fn push_burst_error(&self) {
        self.state
            .borrow_mut()
            .bursts
            .push_back(Err(i2c::ErrorKind::Other));
    }

    pub fn fail_next_enable_high(&self) {
        self.state.borrow_mut().fail_enable_high = true;
    }

    pub fn fail_next_enable_low(&self) {
        self.state.borrow_mut().fail_enable_low = true;
    }

    pub fn enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn count(&self, event: Event) -> usize {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|&&e| e == event)
            .count()
    }

    pub fn bus_reads(&self) -> usize {
        self.count(Event::StatusRead) + self.count(Event::BurstRead)
    }

    /// True when every bus read happened with the line high and the line
    /// dropped right after the last read.
    pub fn reads_were_powered(&self) -> bool {
        let events = self.events();
        let mut enabled = false;
        for event in &events {
            match event {
                Event::EnableHigh => enabled = true,
                Event::EnableLow => enabled = false,
                Event::StatusRead | Event::BurstRead if !enabled => return false,
                _ => {}
            }
        }

        let last_read = events
            .iter()
            .rposition(|e| matches!(e, Event::StatusRead | Event::BurstRead));
        match last_read {
            Some(index) => events.get(index + 1) == Some(&Event::EnableLow),
            None => true,
        }
    }
}

pub struct FakeBus {
    state: Rc<RefCell<State>>,
}

impl Mma8491Interface for FakeBus {
    type Error = i2c::ErrorKind;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        assert_eq!(register, REG_STATUS, "only STATUS is read byte-wise");
        let mut state = self.state.borrow_mut();
        state.events.push(Event::StatusRead);
        let idle = state.idle_status;
        state.status.pop_front().unwrap_or(Ok(idle))
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        assert_eq!(register, REG_OUT_X_MSB, "burst must start at OUT_X_MSB");
        assert_eq!(buf.len(), 6, "burst must cover all three axes");
        let mut state = self.state.borrow_mut();
        state.events.push(Event::BurstRead);
        let bytes = state.bursts.pop_front().expect("unexpected burst read")?;
        buf.copy_from_slice(&bytes);
        Ok(())
    }
}

pub struct FakePin {
    state: Rc<RefCell<State>>,
}

impl digital::ErrorType for FakePin {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if core::mem::take(&mut state.fail_enable_low) {
            return Err(digital::ErrorKind::Other);
        }
        state.enabled = false;
        state.events.push(Event::EnableLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if core::mem::take(&mut state.fail_enable_high) {
            return Err(digital::ErrorKind::Other);
        }
        state.enabled = true;
        state.events.push(Event::EnableHigh);
        Ok(())
    }
}

pub struct FakeDelay {
    state: Rc<RefCell<State>>,
}

impl FakeDelay {
    fn record(&mut self, event: Event) {
        self.state.borrow_mut().events.push(event);
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(Event::DelayMs(ms));
    }
}

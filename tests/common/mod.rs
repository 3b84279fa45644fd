//! Host doubles for the PWM port, delays, reset and the client stream.
//!
//! Every double writes into one shared [`Journal`] so tests can check the
//! order of side effects across them.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use embedded_hal_async::delay::DelayNs;
use embedded_io::ErrorKind;
use rgb_pwm_node::{
    core::net::http::Connection,
    domain::{
        entity::{Channel, DutyCycles},
        ports::{PwmError, PwmPort, SystemReset},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SetDuty(Channel, u16),
    Deinit(Channel),
    Init(Channel, u32, u16),
    Delay(u32),
    Closed,
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn pwm_events(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    Event::SetDuty(..) | Event::Deinit(_) | Event::Init(..)
                )
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, event: Event) -> Option<usize> {
        self.events().iter().position(|e| *e == event)
    }
}

fn slot(channel: Channel) -> usize {
    match channel {
        Channel::Red => 0,
        Channel::Green => 1,
        Channel::Blue => 2,
    }
}

/// PWM port keeping per-channel duty and frequency
pub struct MockPwm {
    journal: Journal,
    duty: [u16; 3],
    frequency: [Option<u32>; 3],
}

impl MockPwm {
    pub fn new(journal: &Journal, frequency: u32) -> Self {
        Self::with_duty(journal, frequency, DutyCycles::OFF)
    }

    pub fn with_duty(
        journal: &Journal,
        frequency: u32,
        duty: DutyCycles,
    ) -> Self {
        Self {
            journal: journal.clone(),
            duty: [duty.red, duty.green, duty.blue],
            frequency: [Some(frequency); 3],
        }
    }

    pub fn duty_cycles(&self) -> DutyCycles {
        DutyCycles::new(self.duty[0], self.duty[1], self.duty[2])
    }
}

impl PwmPort for MockPwm {
    fn duty(&self, channel: Channel) -> u16 {
        self.duty[slot(channel)]
    }

    fn set_duty(
        &mut self,
        channel: Channel,
        duty: u16,
    ) -> Result<(), PwmError> {
        if self.frequency[slot(channel)].is_none() {
            return Err(PwmError::Driver);
        }
        self.journal.push(Event::SetDuty(channel, duty));
        self.duty[slot(channel)] = duty;
        Ok(())
    }

    fn frequency(&self, channel: Channel) -> u32 {
        self.frequency[slot(channel)].unwrap_or(0)
    }

    fn deinit(&mut self, channel: Channel) {
        self.journal.push(Event::Deinit(channel));
        self.frequency[slot(channel)] = None;
        self.duty[slot(channel)] = 0;
    }

    fn init(
        &mut self,
        channel: Channel,
        frequency: u32,
        duty: u16,
    ) -> Result<(), PwmError> {
        if frequency == 0 {
            return Err(PwmError::InvalidFrequency(frequency));
        }
        // A shared timer can not change under a live channel
        if self
            .frequency
            .iter()
            .flatten()
            .any(|live| *live != frequency)
        {
            return Err(PwmError::Driver);
        }
        self.journal.push(Event::Init(channel, frequency, duty));
        self.frequency[slot(channel)] = Some(frequency);
        self.duty[slot(channel)] = duty;
        Ok(())
    }
}

/// Delay that returns at once and records the requested time
pub struct RecordingDelay {
    journal: Journal,
}

impl RecordingDelay {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.journal.push(Event::Delay(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.journal.push(Event::Delay(ms));
    }
}

pub struct MockReset {
    journal: Journal,
}

impl MockReset {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl SystemReset for MockReset {
    fn reset(&mut self) {
        self.journal.push(Event::Reset);
    }
}

/// Client stream fed from a fixed input, handing out at most `chunk`
/// bytes per read
pub struct MockStream {
    journal: Journal,
    input: Vec<u8>,
    position: usize,
    chunk: usize,
    pub output: Vec<u8>,
    pub closed: bool,
}

impl MockStream {
    pub fn new(journal: &Journal, input: &[u8]) -> Self {
        Self::chunked(journal, input, usize::MAX)
    }

    pub fn chunked(journal: &Journal, input: &[u8], chunk: usize) -> Self {
        Self {
            journal: journal.clone(),
            input: input.to_vec(),
            position: 0,
            chunk,
            output: Vec::new(),
            closed: false,
        }
    }

    /// Stream carrying a POST with the given JSON body
    pub fn post(journal: &Journal, body: &str) -> Self {
        let request = format!(
            "POST / HTTP/1.1\r\nHost: rgb-node\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        Self::new(journal, request.as_bytes())
    }

    pub fn unread(&self) -> &[u8] {
        &self.input[self.position..]
    }

    pub fn output_str(&self) -> &str {
        std::str::from_utf8(&self.output).expect("utf-8 response")
    }

    /// Body of the response, after the blank line
    pub fn response_body(&self) -> &str {
        let output = self.output_str();
        output
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or("")
    }
}

impl embedded_io::ErrorType for MockStream {
    type Error = ErrorKind;
}

impl embedded_io_async::Read for MockStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.input.len() - self.position;
        let n = remaining.min(buf.len()).min(self.chunk);
        buf[..n].copy_from_slice(&self.input[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

impl embedded_io_async::Write for MockStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.closed {
            return Err(ErrorKind::NotConnected);
        }
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MockStream {
    async fn close(&mut self) {
        self.closed = true;
        self.journal.push(Event::Closed);
    }
}

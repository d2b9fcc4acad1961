//! The clocked channel fabric.
//!
//! Every pair of pipeline stages communicates through one of three
//! transports, all with single-cycle propagation:
//!
//! 1. **[`Channel`]** — one writer, one reader, one slot. A `send` in cycle
//!    *n* becomes visible to `peek`/`receive` in cycle *n + 1*, after the
//!    falling-edge latch. A full writer slot back-pressures the producer.
//! 2. **[`Bus`]** — a broadcast pulse. The value sent in cycle *n* is
//!    readable by any number of observers during cycle *n + 1* only.
//! 3. **[`HandshakeChannel`]** — consumer-paced: the producer may only send
//!    while the consumer's `ready` flag is raised and no data is pending.
//!
//! The harness latches every channel once per cycle on the falling phase;
//! nothing here subscribes to a clock on its own.

/// Single-producer, single-consumer, one-slot, one-cycle-delay channel.
#[derive(Debug)]
pub struct Channel<T> {
    writer_slot: Option<T>,
    reader_slot: Option<T>,
    consumed: bool,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            writer_slot: None,
            reader_slot: None,
            consumed: false,
        }
    }
}

impl<T: Clone> Channel<T> {
    pub fn new() -> Self {
        Self {
            writer_slot: None,
            reader_slot: None,
            consumed: false,
        }
    }

    /// True if the writer slot is free this cycle.
    pub fn can_send(&self) -> bool {
        self.writer_slot.is_none()
    }

    /// Deposits a value for the reader to see next cycle.
    ///
    /// Returns false (and drops nothing) when the previous send has not yet
    /// been latched; the producer must retry next cycle.
    pub fn send(&mut self, value: T) -> bool {
        if self.writer_slot.is_some() {
            return false;
        }
        self.writer_slot = Some(value);
        true
    }

    /// Non-destructive view of the value available this cycle.
    pub fn peek(&self) -> Option<&T> {
        self.reader_slot.as_ref()
    }

    /// Consumes the value available this cycle.
    ///
    /// The slot stays visible to later observers within the same cycle; it
    /// is only emptied at the falling-edge latch.
    pub fn receive(&mut self) -> Option<T> {
        if self.reader_slot.is_some() {
            self.consumed = true;
        }
        self.reader_slot.clone()
    }

    /// Drops both slots. Used on flush.
    pub fn clear(&mut self) {
        self.writer_slot = None;
        self.reader_slot = None;
        self.consumed = false;
    }

    /// Falling-edge state commit.
    ///
    /// A consumed reader slot empties, then a pending write moves into the
    /// freed reader slot.
    pub fn latch(&mut self) {
        if self.consumed {
            self.reader_slot = None;
            self.consumed = false;
        }
        if self.reader_slot.is_none() && self.writer_slot.is_some() {
            self.reader_slot = self.writer_slot.take();
        }
    }
}

/// Broadcast pulse valid for exactly one cycle.
///
/// Any number of observers may [`Bus::get`] the value during the cycle after
/// it was sent; the latch then retires it whether or not anyone looked.
#[derive(Debug)]
pub struct Bus<T> {
    inner: Channel<T>,
}

impl<T> Default for Bus<T> {
    fn default() -> Self {
        Self {
            inner: Channel::default(),
        }
    }
}

impl<T: Clone> Bus<T> {
    pub fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    pub fn send(&mut self, value: T) -> bool {
        self.inner.send(value)
    }

    /// The value broadcast this cycle, if any.
    pub fn get(&self) -> Option<&T> {
        self.inner.peek()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn latch(&mut self) {
        self.inner.receive();
        self.inner.latch();
    }
}

/// Consumer-paced channel used between the memory-order buffer and the
/// memory unit.
///
/// Unlike [`Channel`] there is no latch delay: the consumer raises `ready`,
/// the producer sends at most one request, and the consumer takes it on its
/// next turn. Sending clears `ready` until the consumer raises it again.
#[derive(Debug)]
pub struct HandshakeChannel<T> {
    slot: Option<T>,
    reader_ready: bool,
}

impl<T> Default for HandshakeChannel<T> {
    fn default() -> Self {
        Self {
            slot: None,
            reader_ready: false,
        }
    }
}

impl<T> HandshakeChannel<T> {
    pub fn new() -> Self {
        Self {
            slot: None,
            reader_ready: false,
        }
    }

    pub fn can_send(&self) -> bool {
        self.reader_ready && self.slot.is_none()
    }

    pub fn send(&mut self, value: T) -> bool {
        if !self.can_send() {
            return false;
        }
        self.slot = Some(value);
        self.reader_ready = false;
        true
    }

    /// Raised by the consumer when it can take a request.
    pub fn ready(&mut self) {
        self.reader_ready = true;
    }

    pub fn receive(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Non-destructive view of a pending request.
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn clear(&mut self) {
        self.slot = None;
        self.reader_ready = false;
    }
}

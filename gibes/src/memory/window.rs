use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::dom::Window;

type Frame = Box<dyn FnOnce(f64)>;
type Timeout = Box<dyn FnOnce()>;

#[derive(Default)]
struct State {
    now: Duration,
    next_timeout: u64,
    alerts: Vec<String>,
    redirects: Vec<String>,
    frames: Vec<Frame>,
    timeouts: Vec<(Duration, u64, Timeout)>,
}

/// A window with a manual clock. Frames and timeouts only run when the test
/// asks for them.
#[derive(Clone, Default)]
pub struct MemoryWindow {
    state: Rc<RefCell<State>>,
}

impl MemoryWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.state.borrow().redirects.clone()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.state.borrow().timeouts.len()
    }

    /// Runs the frame callbacks queued so far. Frames they request wait for
    /// the next call.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for frame in frames {
            frame(timestamp);
        }
        count
    }

    /// Keeps painting every `step` ms from `start` until nothing is queued or
    /// `end` is passed.
    pub fn run_frames_until(&self, start: f64, step: f64, end: f64) {
        let mut timestamp = start;
        while self.pending_frames() > 0 && timestamp <= end {
            self.run_frame(timestamp);
            timestamp += step;
        }
    }

    /// Moves the clock forward, firing due timeouts in order.
    pub fn advance(&self, by: Duration) {
        let now = {
            let mut state = self.state.borrow_mut();
            state.now += by;
            state.now
        };

        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timeouts
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _, _))| *at <= now)
                    .min_by_key(|(_, (at, seq, _))| (*at, *seq))
                    .map(|(position, _)| position);
                next.map(|position| state.timeouts.remove(position))
            };
            match due {
                Some((_, _, callback)) => callback(),
                None => break,
            }
        }
    }
}

impl Window for MemoryWindow {
    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }

    fn redirect(&self, href: &str) {
        self.state.borrow_mut().redirects.push(href.to_string());
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        self.state.borrow_mut().frames.push(callback);
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        let at = state.now + delay;
        let seq = state.next_timeout;
        state.next_timeout += 1;
        state.timeouts.push((at, seq, callback));
    }
}

//! Statistic counters that count up once their section scrolls into view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{Document, Element, Observe, Window};
use crate::markup;
use crate::page::Services;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    None,
    Percent,
    Days,
}

impl Suffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suffix::None => "",
            Suffix::Percent => "%",
            Suffix::Days => " Days",
        }
    }
}

/// End value and display suffix parsed from a counter's `data-target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterTarget {
    pub value: u64,
    pub suffix: Suffix,
}

impl CounterTarget {
    /// Keeps only the ASCII digits of `raw`. No digits means a target of zero.
    pub fn parse(raw: &str) -> Self {
        let value = raw
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0u64, |acc, digit| {
                acc.saturating_mul(10).saturating_add(u64::from(digit))
            });

        let suffix = if raw.contains('%') {
            Suffix::Percent
        } else if raw.contains("Days") {
            Suffix::Days
        } else {
            Suffix::None
        };

        Self { value, suffix }
    }

    pub fn format(&self, value: u64) -> String {
        format!("{}{}", value, self.suffix.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub value: u64,
    pub text: String,
    pub finished: bool,
}

/// Time-based interpolation from zero to the target.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: CounterTarget,
    duration_ms: f64,
    started_at: Option<f64>,
    shown: u64,
}

impl CounterAnimation {
    pub fn new(target: CounterTarget, duration: Duration) -> Self {
        Self {
            target,
            duration_ms: duration.as_secs_f64() * 1000.0,
            started_at: None,
            shown: 0,
        }
    }

    pub fn progress(&self, timestamp: f64) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((timestamp - start) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Computes the frame for `timestamp`. The first call fixes the start time.
    pub fn advance(&mut self, timestamp: f64) -> Frame {
        if self.started_at.is_none() {
            self.started_at = Some(timestamp);
        }

        let progress = self.progress(timestamp);
        let value = if progress >= 1.0 {
            self.target.value
        } else {
            ((progress * self.target.value as f64).floor() as u64).min(self.target.value)
        };

        // Frame clocks are not guaranteed monotonic.
        self.shown = self.shown.max(value);

        Frame {
            value: self.shown,
            text: self.target.format(self.shown),
            finished: progress >= 1.0,
        }
    }
}

/// Drives `animation` on `element`, one animation frame at a time.
pub fn run<E: Element>(element: E, animation: CounterAnimation, window: Rc<dyn Window>) {
    let animation = Rc::new(RefCell::new(animation));
    schedule(element, animation, window);
}

fn schedule<E: Element>(
    element: E,
    animation: Rc<RefCell<CounterAnimation>>,
    window: Rc<dyn Window>,
) {
    let scheduler = window.clone();
    scheduler.request_frame(Box::new(move |timestamp| {
        let frame = animation.borrow_mut().advance(timestamp);
        element.set_text(&frame.text);
        if !frame.finished {
            schedule(element, animation, window);
        }
    }));
}

/// Starts every counter in the stats container the first time the container
/// intersects the viewport and is at least `visibility_threshold` visible. Returns false when the page has
/// no stats container.
pub fn attach<D: Document>(document: &D, services: &Services) -> bool {
    let Some(container) = document.element_by_id(markup::STATS_CONTAINER) else {
        tracing::debug!("No #{} on page, counters disabled", markup::STATS_CONTAINER);
        return false;
    };

    let threshold = services.config.visibility_threshold;
    let triggered = Rc::new(Cell::new(false));
    let document_handle = document.clone();
    let services = services.clone();

    document.observe_visibility(
        &container,
        threshold,
        Box::new(move |visibility| {
            if triggered.get() {
                return Observe::Stop;
            }
            if !visibility.reaches(threshold) {
                return Observe::Continue;
            }
            triggered.set(true);

            let counters = document_handle.query_all(markup::COUNTERS);
            tracing::debug!("Stats visible, animating {} counter(s)", counters.len());

            for counter in counters {
                let raw = counter.data("target").unwrap_or_default();
                let animation = CounterAnimation::new(
                    CounterTarget::parse(&raw),
                    services.config.counter_duration(),
                );
                run(counter, animation, services.window.clone());
            }

            Observe::Stop
        }),
    );

    true
}

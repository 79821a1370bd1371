//! Diagnostic events emitted by the simulation.
//!
//! Fracture and the CCD edge cases report what happened through a one-way
//! channel: each occurrence becomes a [`SimEvent`] posted to an
//! [`EventSink`]. Events are observational; they carry measured metrics
//! but are not part of the physical state. Sinks must never fail or block
//! the simulation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Expected simulation milestones (fractures, splits).
    Info,
    /// Numerical edge cases worth surfacing (subframe cap, zero-time
    /// contacts).
    Warning,
}

/// A diagnostic event from the simulation core.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimEvent {
    /// A link severed because relative strain exceeded tolerance.
    LengthFracture {
        /// Rest-space distance between the two particles.
        rest: f64,
        /// Goal-space distance at the moment of severance.
        actual: f64,
    },
    /// A link severed because the rotation divergence exceeded tolerance.
    AngleFracture {
        /// Measured angle between the two averaged rotations (radians).
        angle: f64,
    },
    /// A severance disconnected a chunk, which was split in two.
    ChunkSplit {
        /// Particle count remaining in the original chunk.
        kept: usize,
        /// Particle count moved into the new chunk.
        split: usize,
    },
    /// The bounded CCD subframe loop hit its iteration cap and the
    /// remaining tick fraction was truncated.
    SubframeCapReached {
        /// Iterations performed before truncation.
        iterations: usize,
    },
    /// A swept contact resolved at time-of-impact zero (the particle
    /// started the subframe on the edge).
    ZeroTimeContact,
}

impl SimEvent {
    /// Severity of this event.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::LengthFracture { .. } | Self::AngleFracture { .. } | Self::ChunkSplit { .. } => {
                Severity::Info
            }
            Self::SubframeCapReached { .. } | Self::ZeroTimeContact => Severity::Warning,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthFracture { rest, actual } => {
                write!(f, "length fracture: rest = {rest}, actual = {actual}")
            }
            Self::AngleFracture { angle } => {
                write!(f, "angle fracture: angle difference = {angle}")
            }
            Self::ChunkSplit { kept, split } => write!(
                f,
                "chunk broken: original chunk keeps {kept} particles, new chunk has {split}"
            ),
            Self::SubframeCapReached { iterations } => write!(
                f,
                "subframe iteration cap reached after {iterations} contacts; remaining tick dropped"
            ),
            Self::ZeroTimeContact => write!(f, "contact at zero time coefficient"),
        }
    }
}

/// A one-way receiver for diagnostic events.
///
/// Implementations must be fire-and-forget: no return value, no blocking,
/// no failure path back into the simulation.
pub trait EventSink {
    /// Receive one event.
    fn post(&mut self, event: SimEvent);
}

/// A sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn post(&mut self, _event: SimEvent) {}
}

/// A sink that records events in order, for tests and status displays.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<SimEvent>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far.
    #[must_use]
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Remove and return all recorded events.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn post(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

// A shared handle forwards to the inner sink, letting the caller keep a
// reference for inspection after handing the sink to the simulation.
impl<S: EventSink> EventSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn post(&mut self, event: SimEvent) {
        self.borrow_mut().post(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let split = SimEvent::ChunkSplit { kept: 3, split: 2 };
        assert_eq!(split.severity(), Severity::Info);

        let cap = SimEvent::SubframeCapReached { iterations: 16 };
        assert_eq!(cap.severity(), Severity::Warning);
    }

    #[test]
    fn test_display_contains_metrics() {
        let event = SimEvent::LengthFracture {
            rest: 10.0,
            actual: 13.0,
        };
        let text = event.to_string();
        assert!(text.contains("10"));
        assert!(text.contains("13"));
    }

    #[test]
    fn test_shared_sink_forwards() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let shared = Rc::new(RefCell::new(RecordingSink::new()));
        let mut handle = Rc::clone(&shared);
        handle.post(SimEvent::ZeroTimeContact);
        assert_eq!(shared.borrow().events().len(), 1);
    }

    #[test]
    fn test_recording_sink_collects_in_order() {
        let mut sink = RecordingSink::new();
        sink.post(SimEvent::ZeroTimeContact);
        sink.post(SimEvent::ChunkSplit { kept: 1, split: 1 });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.events()[0], SimEvent::ZeroTimeContact);

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.events().is_empty());
    }
}

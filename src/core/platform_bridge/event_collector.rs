//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side end of the platform input queue.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input batches + focus
//
// Bounded draining keeps one frame from starving on an event flood;
// leftovers are picked up next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::event::InputEvent;

const MAX_EVENTS_PER_FRAME: usize = 256;

//=== EventCollector ======================================================

/// Drains the platform queue into per-frame input batches.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
    focus_lost: bool,
    disconnected: bool,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
            focus_lost: false,
            disconnected: false,
        }
    }

    /// Collects everything queued since the previous call.
    pub(crate) fn collect_frame(&mut self) {
        self.input_batches.clear();
        self.focus_lost = false;

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!(target: "input", "Platform input queue disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "input", "Input queue backlog: drained {} events this frame", drained);
        }
    }

    /// Input batches collected by the last `collect_frame`.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    /// `true` if the window lost focus since the previous frame.
    pub(crate) fn focus_lost(&self) -> bool {
        self.focus_lost
    }

    fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
            }
            PlatformEvent::FocusChanged(focused) => {
                if !focused {
                    self.focus_lost = true;
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

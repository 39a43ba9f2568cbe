//! Per-repaint callback scheduling.
//!
//! Hosts call [`FrameScheduler::run_frame`] once before each repaint. A registered callback
//! keeps getting called until it returns [`ControlFlow::Break`] or its handle is stopped.

use core::fmt;
use core::ops::ControlFlow;

use bevy::log::trace;
use bevy::prelude::Resource;

pub type FrameCallback = Box<dyn FnMut(f64) -> ControlFlow<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

struct FrameLoop {
    handle: FrameHandle,
    on_frame: FrameCallback,
}

#[derive(Resource, Default)]
pub struct FrameScheduler {
    next_id: u64,
    loops: Vec<FrameLoop>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("next_id", &self.next_id)
            .field("running", &self.loops.len())
            .finish()
    }
}

impl FrameScheduler {
    /// Registers `on_frame` to be called with the current time in milliseconds on every frame.
    pub fn start<F>(&mut self, on_frame: F) -> FrameHandle
    where
        F: FnMut(f64) -> ControlFlow<()> + Send + Sync + 'static,
    {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.loops.push(FrameLoop {
            handle,
            on_frame: Box::new(on_frame),
        });
        handle
    }

    /// Stops calling the loop behind `handle`. Returns false if it was not running.
    pub fn stop(&mut self, handle: FrameHandle) -> bool {
        let running = self.loops.len();
        self.loops.retain(|frame_loop| frame_loop.handle != handle);
        self.loops.len() != running
    }

    pub fn is_running(&self, handle: FrameHandle) -> bool {
        self.loops.iter().any(|frame_loop| frame_loop.handle == handle)
    }

    /// Calls every running loop once. Returns how many were called.
    pub fn run_frame(&mut self, now_ms: f64) -> usize {
        let called = self.loops.len();
        self.loops.retain_mut(|frame_loop| {
            let keep = (frame_loop.on_frame)(now_ms).is_continue();
            if !keep {
                trace!("frame loop {:?} finished", frame_loop.handle);
            }
            keep
        });
        called
    }
}

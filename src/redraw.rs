//! Redraw policy. [`RedrawScheduler`] is the only caller of
//! [`Renderer::redraw`]; every state change asks it for a redraw and it
//! decides whether one happens now, later, or not at all.

#[cfg(test)]
#[path = "redraw_test.rs"]
mod redraw_test;

use tracing::debug;

use crate::renderer::Renderer;

/// What a redraw request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// The renderer drew a frame.
    Drawn,
    /// Auto-redraw is off; the frame waits for an explicit redraw.
    Deferred,
    /// No usable program: nothing compiled yet, or the last compile failed.
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    auto_redraw: bool,
    program_ready: bool,
    pending: bool,
}

impl RedrawScheduler {
    #[must_use]
    pub fn new(auto_redraw: bool) -> Self {
        Self { auto_redraw, program_ready: false, pending: false }
    }

    #[must_use]
    pub fn auto_redraw(&self) -> bool {
        self.auto_redraw
    }

    pub fn set_auto_redraw(&mut self, enabled: bool) {
        self.auto_redraw = enabled;
    }

    /// Whether a deferred change has not been drawn yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether redraws are currently allowed through.
    #[must_use]
    pub fn program_ready(&self) -> bool {
        self.program_ready
    }

    /// A compile succeeded; redraws may reach the renderer again.
    pub fn compile_succeeded(&mut self) {
        self.program_ready = true;
    }

    /// A compile failed; hold back redraws until the next success.
    pub fn compile_failed(&mut self) {
        self.program_ready = false;
    }

    /// Ask for a redraw after a state change.
    pub fn request_redraw(&mut self, renderer: &mut impl Renderer) -> RedrawOutcome {
        if !self.program_ready {
            debug!("redraw suppressed: no compiled program");
            self.pending = true;
            return RedrawOutcome::Suppressed;
        }
        if !self.auto_redraw {
            self.pending = true;
            return RedrawOutcome::Deferred;
        }
        self.draw(renderer)
    }

    /// Redraw on explicit user request, regardless of the auto-redraw flag.
    pub fn redraw_now(&mut self, renderer: &mut impl Renderer) -> RedrawOutcome {
        if !self.program_ready {
            debug!("explicit redraw suppressed: no compiled program");
            return RedrawOutcome::Suppressed;
        }
        self.draw(renderer)
    }

    fn draw(&mut self, renderer: &mut impl Renderer) -> RedrawOutcome {
        renderer.redraw();
        self.pending = false;
        RedrawOutcome::Drawn
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}

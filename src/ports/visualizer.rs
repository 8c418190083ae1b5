//! Visualizer port - optional rendering of the car
//!
//! A visualizer is an injected collaborator with an explicit lifecycle. The
//! training core never depends on one being present: failure to initialise
//! is reported to the caller, which is expected to log it and carry on
//! headless.

use crate::{Result, types::CarState};

/// Renders the car's position as the episode unfolds
///
/// # Lifecycle
///
/// 1. `init(initial)` - Once, before any rendering. May fail with
///    [`crate::Error::VisualizerUnavailable`].
/// 2. `render(state)` - After every transition of a displayed episode
/// 3. `teardown()` - Once, when training ends
pub trait Visualizer: Send {
    /// Acquire the display and draw the initial scene.
    fn init(&mut self, initial: &CarState) -> Result<()>;

    /// Redraw the car at `state`.
    fn render(&mut self, state: &CarState) -> Result<()>;

    /// Release the display.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }

    /// Name used in log messages.
    fn name(&self) -> &str;
}

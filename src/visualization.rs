//! Text-mode rendering of the car on the hill

use std::io::{self, IsTerminal, Write};

use crate::{
    Error, Result,
    mountain_car::{MAX_POSITION, MIN_POSITION, hill_height},
    ports::Visualizer,
    types::CarState,
};

const DEFAULT_WIDTH: usize = 60;
const MIN_WIDTH: usize = 10;
/// Hill glyphs from valley floor to summit.
const TERRAIN: [char; 5] = ['_', '.', '-', '~', '^'];

/// Draws the car as a single, continuously redrawn line of text
///
/// ```text
/// [^~-..__o__..-~~^^^^~~|] p=-0.500 v=+0.0000
/// ```
pub struct TerminalVisualizer {
    writer: Box<dyn Write + Send>,
    width: usize,
    require_terminal: bool,
}

impl TerminalVisualizer {
    /// Render into an arbitrary writer.
    pub fn new(writer: Box<dyn Write + Send>, width: usize) -> Self {
        Self {
            writer,
            width,
            require_terminal: false,
        }
    }

    /// Render to stderr; initialisation fails unless stderr is a terminal.
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(io::stderr()),
            width: DEFAULT_WIDTH,
            require_terminal: true,
        }
    }

    fn column(&self, position: f64) -> usize {
        let fraction = (position - MIN_POSITION) / (MAX_POSITION - MIN_POSITION);
        let column = (fraction.clamp(0.0, 1.0) * (self.width - 1) as f64).round() as usize;
        column.min(self.width - 1)
    }

    /// One frame of the scene for `state`.
    pub fn frame(&self, state: &CarState) -> String {
        let car = self.column(state.position);
        let track: String = (0..self.width)
            .map(|column| {
                if column == car {
                    return 'o';
                }
                if column == self.width - 1 {
                    return '|';
                }
                let x = MIN_POSITION
                    + (MAX_POSITION - MIN_POSITION) * column as f64 / (self.width - 1) as f64;
                let level = ((hill_height(x) + 1.0) / 2.0 * (TERRAIN.len() - 1) as f64).round();
                TERRAIN[(level as usize).min(TERRAIN.len() - 1)]
            })
            .collect();
        format!(
            "[{track}] p={:+.3} v={:+.4}",
            state.position, state.velocity
        )
    }
}

impl Visualizer for TerminalVisualizer {
    fn init(&mut self, initial: &CarState) -> Result<()> {
        if self.width < MIN_WIDTH {
            return Err(Error::VisualizerUnavailable {
                reason: format!("display width {} is below {MIN_WIDTH}", self.width),
            });
        }
        if self.require_terminal && !io::stderr().is_terminal() {
            return Err(Error::VisualizerUnavailable {
                reason: "stderr is not a terminal".to_string(),
            });
        }
        self.render(initial)
    }

    fn render(&mut self, state: &CarState) -> Result<()> {
        let frame = self.frame(state);
        write!(self.writer, "\r{frame}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

//! Plain-text learning curve export

use std::io::Write;

use crate::{
    Result,
    pipeline::{EpisodeAverage, TrainingResult},
};

/// `"{episode} {total} {discounted} {steps}"` for one episode index
pub fn format_line(average: &EpisodeAverage) -> String {
    format!(
        "{} {} {} {}",
        average.episode, average.total_reward, average.discounted_reward, average.steps
    )
}

/// Write one line per episode to `writer`
pub fn write_learning_curve<W: Write>(writer: &mut W, result: &TrainingResult) -> Result<()> {
    for average in &result.episodes {
        writeln!(writer, "{}", format_line(average))?;
    }
    writer.flush()?;
    Ok(())
}

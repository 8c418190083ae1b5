//! Train command - Run linear Sarsa on Mountain Car and write the learning curve

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::warn;

use crate::{
    cli::output::{print_kv, print_section},
    export::{format_line, write_learning_curve},
    mountain_car::MountainCar,
    pipeline::{
        EpisodeAverage, EpisodeLogObserver, JsonlObserver, MetricsObserver, ProgressObserver,
        TrainingConfig, TrainingPipeline, TrainingResult, VisualizationObserver, Visualizer,
    },
    sarsa::TieBreak,
    visualization::TerminalVisualizer,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    config: TrainingConfig,
    output_file: String,
    goal_rate: f64,
    final_episode: Option<EpisodeAverage>,
    best_episode: Option<EpisodeAverage>,
}

impl TrainingSummaryFile {
    fn new(config: &TrainingConfig, output_file: &Path, result: &TrainingResult) -> Self {
        let best_episode = result
            .episodes
            .iter()
            .min_by(|a, b| a.steps.total_cmp(&b.steps))
            .copied();
        Self {
            config: config.clone(),
            output_file: output_file.display().to_string(),
            goal_rate: result.goal_rate(),
            final_episode: result.final_episode().copied(),
            best_episode,
        }
    }
}

const DEFAULT_SUMMARY_FILE: &str = "training_summary.json";

/// Where the JSON summary for `--summary <raw>` is written.
///
/// A directory argument (trailing separator or no file name) gets
/// [`DEFAULT_SUMMARY_FILE`] inside it; any other path is forced to a `.json`
/// extension, keeping an existing one regardless of case.
pub(crate) fn summary_file_path(raw: &Path) -> PathBuf {
    let names_directory = raw
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::MAIN_SEPARATOR);
    if names_directory || raw.file_name().is_none() {
        return raw.join(DEFAULT_SUMMARY_FILE);
    }

    let has_json_extension = raw
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if has_json_extension {
        raw.to_path_buf()
    } else {
        raw.with_extension("json")
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mountain-car",
    version,
    about = "Use Sarsa with linear value function approximation to solve the Mountain Car problem",
    allow_negative_numbers = true
)]
pub struct TrainArgs {
    /// File to write the learning curve to
    pub output_file: PathBuf,

    /// Step size alpha
    #[arg(long, short = 'a', default_value_t = 0.1)]
    pub alpha: f64,

    /// Exploration rate epsilon
    #[arg(long, short = 'e', default_value_t = 0.1)]
    pub epsilon: f64,

    /// Discount factor gamma
    #[arg(long, short = 'g', default_value_t = 0.9)]
    pub gamma: f64,

    /// Number of independent trials to average over
    #[arg(long, short = 't', default_value_t = 1)]
    pub trials: usize,

    /// Number of episodes per trial
    #[arg(long, short = 'p', default_value_t = 200)]
    pub episodes: usize,

    /// Maximum number of steps per episode
    #[arg(long = "maxsteps", short = 'm', default_value_t = 2000)]
    pub max_steps: usize,

    /// Display every Nth episode (ignored when TRIALS > 1)
    #[arg(long, short = 'd', value_name = "N", default_value_t = 0)]
    pub display: usize,

    /// Number of tilings
    #[arg(long = "numtilings", short = 'n', default_value_t = 5)]
    pub num_tilings: usize,

    /// Each tiling divides the state space into an NxN grid
    #[arg(long = "numtiles", short = 's', value_name = "N", default_value_t = 9)]
    pub num_tiles: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tie-breaking among equally valued actions
    #[arg(long, value_enum, default_value_t = TieBreak::Random)]
    pub tie_break: TieBreak,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show a progress bar when running several trials
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub progress: bool,

    /// Verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl TrainArgs {
    fn training_config(&self) -> Result<TrainingConfig> {
        let config = TrainingConfig {
            alpha: self.alpha,
            epsilon: self.epsilon,
            gamma: self.gamma,
            trials: self.trials,
            episodes: self.episodes,
            max_steps: self.max_steps,
            num_tilings: self.num_tilings,
            num_tiles: self.num_tiles,
            seed: self.seed,
            tie_break: self.tie_break,
        };
        config.validate()?;
        Ok(config)
    }
}

fn attach_visualizer(
    pipeline: TrainingPipeline,
    visualizer: Box<dyn Visualizer>,
    every: usize,
) -> TrainingPipeline {
    let initial = MountainCar::new().state();
    match VisualizationObserver::try_new(visualizer, every, &initial) {
        Ok(observer) => pipeline.with_observer(Box::new(observer)),
        Err(e) => {
            warn!("unable to initialize the display ({e}); display will be disabled");
            pipeline
        }
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    execute_with_visualizer(args, Box::new(TerminalVisualizer::stderr()))
}

/// Run training, drawing displayed episodes with `visualizer`.
///
/// The visualizer is only initialised when `--display` is set and a single
/// trial runs; if it fails to initialise, training continues without it.
pub fn execute_with_visualizer(args: TrainArgs, visualizer: Box<dyn Visualizer>) -> Result<()> {
    let config = args.training_config()?;

    // Open the output first: a run that cannot be recorded is not started.
    let output = File::create(&args.output_file).with_context(|| {
        format!("failed to open output file {}", args.output_file.display())
    })?;

    let summary_target = args.summary.as_ref().map(|raw| {
        let path = summary_file_path(raw);
        let normalized = path != *raw;
        (path, normalized)
    });

    let mut pipeline =
        TrainingPipeline::new(config.clone()).with_observer(Box::new(MetricsObserver::new()));

    if args.display > 0 {
        if config.trials == 1 {
            pipeline = attach_visualizer(pipeline, visualizer, args.display);
        } else {
            warn!(
                trials = config.trials,
                "display is only available with a single trial; running headless"
            );
        }
    }

    if config.trials == 1 {
        pipeline = pipeline.with_observer(Box::new(EpisodeLogObserver::stdout()));
    } else if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run()?;

    let mut writer = BufWriter::new(output);
    write_learning_curve(&mut writer, &result).with_context(|| {
        format!("failed to write learning curve to {}", args.output_file.display())
    })?;

    if config.trials > 1 {
        for average in &result.episodes {
            let line = format_line(average);
            let values = line.split_once(' ').map_or(line.as_str(), |(_, rest)| rest);
            println!("Average episode {}: {values}", average.episode);
        }
    }

    print_section("Training Summary");
    print_kv("Trials", &config.trials.to_string());
    print_kv("Episodes", &config.episodes.to_string());
    print_kv("Goal rate", &format!("{:.1}%", result.goal_rate() * 100.0));
    if let Some(last) = result.final_episode() {
        print_kv("Final steps", &format!("{:.1}", last.steps));
    }
    print_kv("Learning curve", &args.output_file.display().to_string());

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!(
                "\nNormalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile::new(&config, &args.output_file, &result);
        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

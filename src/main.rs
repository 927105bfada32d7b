//! Immuno Survivor headless runner
//!
//! Plays autopilot runs without a window, for smoke tests and balance checks.
//! Progression is carried between runs and saved when `--save-dir` is given.
//!
//! # Usage
//!
//! ```bash
//! immuno-survivor --seed 42
//! immuno-survivor --runs 5 --minutes 15 --save-dir ./saves
//! immuno-survivor --tuning balance.json --quality low --json
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use immuno_survivor::consts::FRAMES_PER_SECOND;
    use immuno_survivor::persistence::{FileStorage, MemoryStorage, Storage};
    use immuno_survivor::sim::{FrameInput, GamePhase, GameState, RunSummary, tick};
    use immuno_survivor::{Progression, QualityPreset, RunPerks, Settings, Tuning};

    #[derive(Parser)]
    #[command(name = "immuno-survivor")]
    #[command(author, version, about = "Immuno Survivor - headless autopilot runner")]
    struct Args {
        /// RNG seed for the first run (default: from the clock)
        #[arg(long, short = 's')]
        seed: Option<u64>,

        /// Number of consecutive runs
        #[arg(long, short = 'r', default_value = "1")]
        runs: u32,

        /// Give up on a run after this many simulated minutes
        #[arg(long, short = 'm', default_value = "10")]
        minutes: u32,

        /// Directory for settings and progression saves
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// JSON balance file (missing fields keep their defaults)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Override the saved quality preset (low, medium, high)
        #[arg(long, short = 'q')]
        quality: Option<QualityPreset>,

        /// Print each run summary as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let mut storage: Box<dyn Storage> = match &args.save_dir {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        };

        let mut settings = Settings::load(storage.as_ref());
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }

        let base = match &args.tuning {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                Tuning::from_json(&json)
                    .with_context(|| format!("parsing tuning file {}", path.display()))?
            }
            None => Tuning::default(),
        };
        let tuning = settings.tuned(&base);

        let mut progression = Progression::load(storage.as_ref());
        let seed = args.seed.unwrap_or_else(clock_seed);
        let max_frames = u64::from(args.minutes) * 60 * u64::from(FRAMES_PER_SECOND);

        for i in 0..args.runs {
            let run_seed = seed.wrapping_add(u64::from(i));
            let summary = play(run_seed, tuning, progression.perks(), max_frames);
            progression.record_run(&summary);

            if args.json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!(
                    "run {} (seed {run_seed}): {}s, level {}, {} kills, {} bosses, {} xp, accuracy {:.0}%",
                    i + 1,
                    summary.game_time,
                    summary.level,
                    summary.kills,
                    summary.bosses_killed,
                    summary.xp_earned,
                    accuracy(&summary) * 100.0
                );
            }
        }

        log::info!(
            "Lifetime: {} xp banked, best level {}, {} kills, {} DNA",
            progression.total_xp,
            progression.highest_level,
            progression.total_kills,
            progression.dna_coins
        );

        if args.save_dir.is_some() {
            settings
                .save(storage.as_mut())
                .context("saving settings")?;
            progression
                .save(storage.as_mut())
                .context("saving progression")?;
        }
        Ok(())
    }

    /// One autopilot run, always picking the first offered upgrade
    fn play(seed: u64, tuning: Tuning, perks: RunPerks, max_frames: u64) -> RunSummary {
        let mut state = GameState::new(seed, tuning).with_perks(perks);
        let mut input = FrameInput {
            start: true,
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..max_frames {
            tick(&mut state, &input);
            if state.phase == GamePhase::GameOver {
                break;
            }
            input = FrameInput {
                idle_mode: true,
                choose_upgrade: (state.phase == GamePhase::LevelUp).then_some(0),
                ..Default::default()
            };
        }

        if state.phase != GamePhase::GameOver {
            log::info!("Run with seed {seed} hit the time limit");
        }
        state.summary()
    }

    fn accuracy(summary: &RunSummary) -> f32 {
        let resolved = summary.shots_hit + summary.shots_missed;
        if resolved == 0 {
            0.0
        } else {
            summary.shots_hit as f32 / resolved as f32
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

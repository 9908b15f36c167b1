use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use cavy::config::HabitatConfig;
use cavy::prelude::*;
use cavy::Habitat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Pet the first guinea pig while it walks
    Pet,
    /// Hand-feed a carrot to the first guinea pig
    Feed,
    /// Just let the habitat run
    Idle,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the guinea pig habitat headless", long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value = "300")]
    frames: u32,

    /// Frames per second
    #[arg(long, default_value = "60")]
    fps: f32,

    /// Seed for reaction selection (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Interaction to run
    #[arg(long, value_enum, default_value = "pet")]
    scenario: Scenario,

    /// Config file (RON); `.ron` may be omitted
    #[arg(long, default_value = "cavy")]
    config: PathBuf,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    dump_config: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

const FIRST_PIG: &str = "pig_1";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = HabitatConfig::load_from(&args.config)?;
    if let Some(seed) = args.seed {
        config.interaction.reaction_seed = seed;
    }

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    if args.fps <= 0.0 {
        anyhow::bail!("--fps must be positive, got {}", args.fps);
    }
    let dt = 1.0 / args.fps;

    let mut gameplay = MemoryGameplay::sample_habitat();
    let mut habitat = Habitat::new(config);
    let reactions = habitat.subscribe_reactions();

    let built = habitat.sync_items(&gameplay);
    habitat.sync_creatures(&gameplay);
    log::info!(
        "Habitat ready: {} items built, {} models mounted",
        built,
        habitat.scene().len()
    );

    gameplay.walk_to(FIRST_PIG, Vec3::new(3.0, 0.0, -6.0));
    let trigger_frame = (args.fps * 0.5) as u32;

    for frame in 0..args.frames {
        if frame == trigger_frame {
            let started = match args.scenario {
                Scenario::Pet => habitat.start_petting(FIRST_PIG, None),
                Scenario::Feed => habitat.start_hand_feed(
                    FIRST_PIG,
                    HeldFoodRequest::new("carrot").with_category("vegetable"),
                    None,
                ),
                Scenario::Idle => true,
            };
            if !started {
                log::warn!("Could not start {:?}", args.scenario);
            } else if args.scenario != Scenario::Idle {
                habitat.zoom_camera(0.5);
            }
        }

        gameplay.step(dt);
        habitat.sync_creatures(&gameplay);
        if let Some(report) = habitat.tick(dt, &mut gameplay) {
            habitat.zoom_camera(2.0);
            log::info!(
                "{} of {} ended at {:.0}%: {:?}",
                report.kind,
                report.creature_id,
                report.progress * 100.0,
                report.outcome
            );
        }

        while let Ok(reaction) = reactions.try_recv() {
            log::info!(
                "{} ({}): {}",
                reaction.creature_id,
                reaction.tier,
                reaction.message
            );
        }
    }

    let wellness = gameplay
        .wellness_score(FIRST_PIG)
        .context("First guinea pig went missing")?;
    log::info!(
        "After {} frames: {} wellness {:.1}, friendship {:.1}, {} interactions, {} carrots left",
        args.frames,
        FIRST_PIG,
        wellness,
        gameplay.friendship(FIRST_PIG).unwrap_or_default(),
        gameplay.interaction_count(FIRST_PIG).unwrap_or_default(),
        gameplay.inventory_count("carrot")
    );

    habitat.teardown();
    Ok(())
}

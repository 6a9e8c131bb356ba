use anyhow::{Context, Result};
use clap::Parser;
use glam::{DVec3, IVec3};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vessel::{
    BlockAxis, ClickOutcome, CompassPoint, EntityState, Facing, MemoryWorld, Turn, VesselConfig,
    VesselRegistry, VoxelSnapshot,
};

const VESSEL_NAME: &str = "Argo";

#[derive(Parser, Debug)]
#[command(name = "vessel-sim")]
#[command(about = "Build a small boat in an in-memory world and sail it", long_about = None)]
struct Args {
    /// Vessel config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of forward moves
    #[arg(long, default_value = "4")]
    moves: usize,

    /// Velocity increments applied before sailing
    #[arg(long, default_value = "1")]
    throttle: u32,

    /// Quarter turns to make after sailing, alternating left and right
    #[arg(long, default_value = "2")]
    turns: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = format!("vessel={0},vessel_sim={0}", args.log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &args.config {
        Some(path) => VesselConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => VesselConfig::default(),
    };
    tracing::info!("Vessel simulator v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Config: {:?}", config);

    let mut world = MemoryWorld::new().with_height_limits(-64, 319);
    let signs = build_boat(&mut world);
    let passenger = world.spawn_entity(EntityState::at(DVec3::new(1.5, 65.0, 0.5)));

    let mut registry = VesselRegistry::new(config);
    for (coord, lines) in signs.iter() {
        let outcome = registry.handle_sign_write(*coord, lines.as_slice(), &mut world)?;
        tracing::info!("Sign at {}: {:?}", coord, outcome);
    }

    let boat = registry
        .get_mut(VESSEL_NAME)
        .context("Boat was not registered")?;
    for _ in 0..args.throttle {
        boat.increment_velocity()?;
    }
    tracing::info!(
        "'{}' has {} voxels, velocity {:?}",
        boat.name(),
        boat.hull().len(),
        boat.velocity()
    );

    for step in 0..args.moves {
        let engine = engine_coord(&registry)?;
        report(step, registry.handle_sign_click(engine, &mut world)?, &registry, &world, passenger);
    }

    for step in 0..args.turns {
        let side = if step % 2 == 0 { Turn::Left } else { Turn::Right };
        let helm = helm_coord(&registry, side)?;
        report(step, registry.handle_sign_click(helm, &mut world)?, &registry, &world, passenger);
    }

    tracing::info!("Voyage complete, {} voxels in the world", world.voxel_count());
    Ok(())
}

/// Lay out a 5x3 raft with a mast and four control signs
///
/// Returns each sign with the text to write on it, license first.
fn build_boat(world: &mut MemoryWorld) -> Vec<(IVec3, Vec<&'static str>)> {
    let deck = 64;
    world.fill(
        IVec3::new(-2, deck, -1),
        IVec3::new(2, deck, 1),
        &VoxelSnapshot::of("spruce_planks"),
    );
    world.fill(
        IVec3::new(0, deck + 1, 0),
        IVec3::new(0, deck + 3, 0),
        &VoxelSnapshot::of("spruce_log").axis(BlockAxis::Y),
    );
    world.place(IVec3::new(0, deck + 4, 0), VoxelSnapshot::of("torch"));

    let license = IVec3::new(2, deck + 1, 0);
    let engine = IVec3::new(-3, deck, 0);
    let left = IVec3::new(-2, deck + 1, -1);
    let right = IVec3::new(-2, deck + 1, 1);

    world.place(license, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::EAST));
    world.place(engine, VoxelSnapshot::of("oak_wall_sign").facing(Facing::West));
    for helm in [left, right] {
        world.place(helm, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::EAST));
    }

    vec![
        (license, vec!["[Ship]", "[name]", VESSEL_NAME]),
        (engine, vec!["[Ship]", "[move]"]),
        (left, vec!["[Ship]", "[steer]", "<"]),
        (right, vec!["[Ship]", "[steer]", ">"]),
    ]
}

fn engine_coord(registry: &VesselRegistry) -> Result<IVec3> {
    registry
        .get(VESSEL_NAME)
        .and_then(|v| v.engine())
        .map(|e| e.coord)
        .context("Boat has no engine")
}

fn helm_coord(registry: &VesselRegistry, side: Turn) -> Result<IVec3> {
    registry
        .get(VESSEL_NAME)
        .and_then(|v| v.controls().steering_for(side))
        .map(|s| s.coord)
        .with_context(|| format!("Boat has no {:?} helm", side))
}

fn report(
    step: usize,
    outcome: ClickOutcome,
    registry: &VesselRegistry,
    world: &MemoryWorld,
    passenger: vessel::EntityId,
) {
    let origin = registry.get(VESSEL_NAME).map(|v| v.origin());
    let rider = world.entity(passenger).map(|e| e.position);
    tracing::info!(
        "Step {}: {:?}, origin {:?}, passenger at {:?}",
        step,
        outcome,
        origin,
        rider
    );
}

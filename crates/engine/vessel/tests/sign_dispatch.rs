//! End-to-end sign flow: write signs, click them, watch the vessel move

use glam::{DVec3, IVec3};
use std::io::Write;
use vessel::{
    role_at, ClickOutcome, CompassPoint, ControlRole, EntityState, Error, Facing, MemoryWorld,
    SignOutcome, Turn, VesselConfig, VesselRegistry, VoxelSnapshot, CONTROL_TAG, NAME_TAG,
};

const LICENSE: IVec3 = IVec3::new(0, 1, 0);
const ENGINE: IVec3 = IVec3::new(-3, 0, 0);
const HELM_LEFT: IVec3 = IVec3::new(-1, 1, -1);
const HELM_RIGHT: IVec3 = IVec3::new(-1, 1, 1);

/// 5x3 raft with the four control signs placed but not yet written
fn raft() -> MemoryWorld {
    let mut world = MemoryWorld::new();
    world.fill(IVec3::new(-2, 0, -1), IVec3::new(2, 0, 1), &VoxelSnapshot::of("oak_planks"));
    world.place(LICENSE, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::EAST));
    world.place(ENGINE, VoxelSnapshot::of("oak_wall_sign").facing(Facing::West));
    for helm in [HELM_LEFT, HELM_RIGHT] {
        world.place(helm, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::EAST));
    }
    world
}

fn rig(registry: &mut VesselRegistry, world: &mut MemoryWorld) {
    let outcomes = [
        registry.handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], world),
        registry.handle_sign_write(ENGINE, &["[Ship]", "[move]"], world),
        registry.handle_sign_write(HELM_LEFT, &["[Ship]", "[steer]", "<"], world),
        registry.handle_sign_write(HELM_RIGHT, &["[Ship]", "[steer]", ">"], world),
    ];
    for outcome in outcomes {
        assert!(outcome.is_ok(), "{:?}", outcome);
    }
}

#[test]
fn test_full_voyage() {
    let mut world = raft();
    let mut registry = VesselRegistry::new(VesselConfig::default());

    let created = registry
        .handle_sign_write(LICENSE, &["[Ship]", "[name]", " Argo "], &mut world)
        .unwrap();
    // Engine and both helms were already touching the hull when it was claimed
    assert_eq!(
        created,
        SignOutcome::Created {
            vessel: "Argo".into(),
            size: 19,
            truncated: false
        }
    );

    assert_eq!(
        registry
            .handle_sign_write(ENGINE, &["[Ship]", "[move]"], &mut world)
            .unwrap(),
        SignOutcome::EngineAttached { vessel: "Argo".into() }
    );
    assert_eq!(
        registry
            .handle_sign_write(HELM_LEFT, &["[Ship]", "[steer]", "<"], &mut world)
            .unwrap(),
        SignOutcome::SteeringAttached {
            vessel: "Argo".into(),
            side: Turn::Left
        }
    );

    // Engine text faces West, so the raft travels East
    let outcome = registry.handle_sign_click(ENGINE, &mut world).unwrap();
    assert_eq!(outcome, ClickOutcome::Moved { vessel: "Argo".into() });
    let engine_now = ENGINE + IVec3::X;
    assert_eq!(role_at(&world, engine_now), Some(ControlRole::Engine));
    assert_eq!(world.voxel(IVec3::new(3, 0, 0)).material.id(), "oak_planks");
    assert!(world.voxel(ENGINE).is_empty());

    let helm_now = HELM_LEFT + IVec3::X;
    let outcome = registry.handle_sign_click(helm_now, &mut world).unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::Rotated {
            vessel: "Argo".into(),
            turn: Turn::Left
        }
    );

    // Origin is now (1, 1, 0); the engine swings from the West side to the North
    let vessel = registry.get("Argo").unwrap();
    assert_eq!(vessel.origin(), IVec3::new(1, 1, 0));
    assert_eq!(vessel.engine().unwrap().coord, IVec3::new(1, 0, -3));
    assert_eq!(vessel.engine().unwrap().heading, Facing::South);

    // A second move now heads South
    registry
        .handle_sign_click(IVec3::new(1, 0, -3), &mut world)
        .unwrap();
    assert_eq!(registry.get("Argo").unwrap().origin(), IVec3::new(1, 1, 1));
}

#[test]
fn test_unregistered_helm_does_nothing() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    registry
        .handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], &mut world)
        .unwrap();

    // Part of the hull but never written as a control sign
    assert_eq!(
        registry.handle_sign_click(HELM_RIGHT, &mut world).unwrap(),
        ClickOutcome::Ignored
    );
}

#[test]
fn test_clicking_without_engine_fails() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    registry
        .handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], &mut world)
        .unwrap();
    registry
        .handle_sign_write(HELM_LEFT, &["[Ship]", "[steer]", "<"], &mut world)
        .unwrap();

    assert!(matches!(
        registry.handle_sign_click(HELM_LEFT, &mut world),
        Err(Error::MissingEngine(n)) if n == "Argo"
    ));
}

#[test]
fn test_duplicate_surfaces_are_absorbed() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    rig(&mut registry, &mut world);

    let spare = IVec3::new(1, 1, -1);
    world.place(spare, VoxelSnapshot::of("oak_sign").rotation(CompassPoint::EAST));
    let outcome = registry
        .handle_sign_write(spare, &["[Ship]", "[steer]", "<"], &mut world)
        .unwrap();
    assert_eq!(
        outcome,
        SignOutcome::Duplicate {
            vessel: "Argo".into(),
            role: ControlRole::Steering
        }
    );
    assert_eq!(role_at(&world, spare), None);

    let outcome = registry
        .handle_sign_write(spare, &["[Ship]", "[move]"], &mut world)
        .unwrap();
    assert_eq!(
        outcome,
        SignOutcome::Duplicate {
            vessel: "Argo".into(),
            role: ControlRole::Engine
        }
    );
}

#[test]
fn test_rewritten_signs_keep_their_role() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    registry
        .handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], &mut world)
        .unwrap();

    let outcome = registry
        .handle_sign_write(LICENSE, &["[Ship]", "[move]"], &mut world)
        .unwrap();
    assert_eq!(
        outcome,
        SignOutcome::Occupied {
            vessel: "Argo".into(),
            existing: ControlRole::License
        }
    );
    assert!(registry.get("Argo").unwrap().engine().is_none());
    assert_eq!(role_at(&world, LICENSE), Some(ControlRole::License));

    registry
        .handle_sign_write(ENGINE, &["[Ship]", "[move]"], &mut world)
        .unwrap();
    let outcome = registry
        .handle_sign_write(ENGINE, &["[Ship]", "[steer]", "<"], &mut world)
        .unwrap();
    assert_eq!(
        outcome,
        SignOutcome::Occupied {
            vessel: "Argo".into(),
            existing: ControlRole::Engine
        }
    );
    assert_eq!(role_at(&world, ENGINE), Some(ControlRole::Engine));
    assert_eq!(world.tagged(CONTROL_TAG).len(), 2);

    assert_eq!(
        registry.handle_sign_click(ENGINE, &mut world).unwrap(),
        ClickOutcome::Moved { vessel: "Argo".into() }
    );
    assert_eq!(
        registry
            .handle_sign_click(LICENSE + IVec3::X, &mut world)
            .unwrap(),
        ClickOutcome::License { vessel: "Argo".into() }
    );
    assert_eq!(world.tagged(CONTROL_TAG).len(), 2);
}

#[test]
fn test_passengers_ride_along() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    rig(&mut registry, &mut world);

    let passenger = world.spawn_entity(EntityState {
        position: DVec3::new(1.5, 1.0, 0.5),
        velocity: DVec3::ZERO,
        yaw: 90.0,
        pitch: 0.0,
    });

    registry.handle_sign_click(ENGINE, &mut world).unwrap();
    let state = world.entity(passenger).unwrap();
    assert_eq!(state.position, DVec3::new(2.5, 1.0, 0.5));

    registry
        .handle_sign_click(HELM_RIGHT + IVec3::X, &mut world)
        .unwrap();
    let state = world.entity(passenger).unwrap();
    // Pivot is the centre of the origin voxel (1, 1, 0)
    assert_eq!(state.position, DVec3::new(1.5, 1.0, -0.5));
    assert_eq!(state.yaw, 0.0);
}

#[test]
fn test_second_license_is_rejected() {
    let mut world = raft();
    let mut registry = VesselRegistry::default();
    rig(&mut registry, &mut world);

    assert!(matches!(
        registry.handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], &mut world),
        Err(Error::DuplicateVessel(n)) if n == "Argo"
    ));

    let removed = registry.remove("Argo").unwrap();
    assert_eq!(removed.name(), "Argo");
    assert!(registry.is_empty());
    // Tags outlive the registry entry
    assert_eq!(world.tagged(NAME_TAG).len(), removed.hull().len());
}

#[test]
fn test_config_from_file_caps_discovery() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_vessel_size = 4").unwrap();
    writeln!(file, "max_velocity = 3").unwrap();
    let config = VesselConfig::load(file.path()).unwrap();

    let mut world = raft();
    let mut registry = VesselRegistry::new(config);
    let outcome = registry
        .handle_sign_write(LICENSE, &["[Ship]", "[name]", "Argo"], &mut world)
        .unwrap();
    assert_eq!(
        outcome,
        SignOutcome::Created {
            vessel: "Argo".into(),
            size: 4,
            truncated: true
        }
    );
    assert_eq!(registry.config().max_velocity, 3);
}

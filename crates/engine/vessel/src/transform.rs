//! Rigid transforms of a hull: translation and quarter-turn rotation
//!
//! Both transforms follow the same pass structure:
//!
//! ```text
//! refresh snapshots  ->  sort  ->  move control tags  ->  clear sources (forward)
//!                                                      ->  write targets (reverse)
//!                                                      ->  move entities
//! ```
//!
//! Sorting puts `Attached` voxels before `Solid` ones. Clearing walks the list
//! forward so attachments go before their support; writing walks it in
//! reverse so supports exist before anything hangs off them.
//!
//! Once clearing starts the transform always runs to the end. A failed grid
//! write drops that voxel, the remaining writes still happen, and the first
//! failure is returned afterwards.

use crate::config::VesselConfig;
use crate::control::{ControlSurfaces, Engine, NAME_TAG};
use crate::error::Result;
use crate::hull::{Hull, HullEntry};
use crate::orientation::Turn;
use crate::world::{chunk_of, GridError, VoxelSnapshot, World};
use glam::{DVec3, IVec2, IVec3};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Everything a transform mutates besides the world itself
pub struct TransformTarget<'a> {
    pub name: &'a str,
    pub hull: &'a mut Hull,
    pub controls: &'a mut ControlSurfaces,
    pub config: &'a VesselConfig,
}

/// Keeps the first collaborator failure while a pass runs to completion
#[derive(Default)]
struct FirstFailure(Option<GridError>);

impl FirstFailure {
    fn check<T>(&mut self, result: std::result::Result<T, GridError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Grid failure during vessel transform: {}", err);
                self.0.get_or_insert(err);
                None
            }
        }
    }

    fn into_result(self) -> Result<()> {
        match self.0 {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

/// Translate the hull by `delta`
pub fn translate<W: World + ?Sized>(
    target: TransformTarget<'_>,
    delta: IVec3,
    world: &mut W,
) -> Result<()> {
    let TransformTarget {
        name,
        hull,
        controls,
        config,
    } = target;

    refresh_snapshots(name, hull, world)?;
    let entities = entities_on_hull(hull, &*world, config)?;

    hull.sort_for_translation(delta);
    hull.origin += delta;
    controls.relocate(world, |coord| coord + delta);

    let mut failure = FirstFailure::default();
    clear_sources(hull, world, &mut failure);
    write_targets(
        name,
        hull,
        world,
        config.apply_physics,
        |coord| coord + delta,
        |voxel| voxel,
        &mut failure,
    );

    let offset = delta.as_dvec3();
    for entity in entities {
        failure.check(move_entity(world, entity, |position| position + offset));
    }

    debug!(
        "Vessel '{}' translated by {} ({} voxels), origin now {}",
        name,
        delta,
        hull.len(),
        hull.origin
    );
    failure.into_result()
}

/// Rotate the hull a quarter turn about its origin
pub fn rotate<W: World + ?Sized>(
    target: TransformTarget<'_>,
    turn: Turn,
    world: &mut W,
) -> Result<()> {
    let TransformTarget {
        name,
        hull,
        controls,
        config,
    } = target;

    refresh_snapshots(name, hull, world)?;
    let entities = entities_on_hull(hull, &*world, config)?;

    let origin = hull.origin;
    hull.sort_by_priority();
    controls.relocate(world, |coord| turn.rotate_about(coord, origin));

    let mut failure = FirstFailure::default();
    clear_sources(hull, world, &mut failure);
    write_targets(
        name,
        hull,
        world,
        config.apply_physics,
        |coord| turn.rotate_about(coord, origin),
        |mut voxel| {
            voxel.shape = voxel.shape.rotated(turn);
            voxel
        },
        &mut failure,
    );

    for entity in entities {
        failure.check(move_entity(world, entity, |position| {
            turn.rotate_point_about(position, origin)
        }));
        failure.check(
            world
                .yaw_pitch(entity)
                .and_then(|(yaw, pitch)| world.set_yaw_pitch(entity, turn.rotate_yaw(yaw), pitch)),
        );
    }

    if let Some(engine) = &mut controls.engine {
        refresh_heading(engine, turn, &*world);
    }

    debug!(
        "Vessel '{}' rotated {:?} about {} ({} voxels)",
        name,
        turn,
        origin,
        hull.len()
    );
    failure.into_result()
}

/// Re-read cached voxel data before a move
///
/// Voxels that became empty since the last transform (broken by a player,
/// burnt) are dropped from the hull and lose their name tag.
fn refresh_snapshots<W: World + ?Sized>(name: &str, hull: &mut Hull, world: &mut W) -> Result<()> {
    let snapshots = hull
        .entries
        .iter()
        .map(|entry| world.get(entry.coord))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let entries = std::mem::take(&mut hull.entries);
    for (entry, voxel) in entries.into_iter().zip(snapshots) {
        if voxel.is_empty() || voxel.is_liquid() {
            debug!("Vessel '{}' lost voxel at {}", name, entry.coord);
            world.untag(entry.coord, NAME_TAG);
        } else if voxel == entry.voxel {
            hull.entries.push(entry);
        } else {
            hull.entries.push(HullEntry::new(entry.coord, voxel));
        }
    }
    Ok(())
}

/// Entities in every chunk column the hull touches
fn entities_on_hull<W: World + ?Sized>(
    hull: &Hull,
    world: &W,
    config: &VesselConfig,
) -> Result<Vec<W::Handle>> {
    if !config.relocate_entities || hull.is_empty() {
        return Ok(Vec::new());
    }
    let regions: HashSet<IVec2> = hull.coords().map(chunk_of).collect();
    let regions: Vec<IVec2> = regions.into_iter().collect();
    Ok(world.entities_in_regions(&regions)?)
}

fn clear_sources<W: World + ?Sized>(hull: &Hull, world: &mut W, failure: &mut FirstFailure) {
    for entry in &hull.entries {
        world.untag(entry.coord, NAME_TAG);
        failure.check(world.set_empty(entry.coord));
    }
}

fn write_targets<W: World + ?Sized>(
    name: &str,
    hull: &mut Hull,
    world: &mut W,
    apply_physics: bool,
    map_coord: impl Fn(IVec3) -> IVec3,
    map_voxel: impl Fn(VoxelSnapshot) -> VoxelSnapshot,
    failure: &mut FirstFailure,
) {
    let mut written = Vec::with_capacity(hull.entries.len());
    for mut entry in std::mem::take(&mut hull.entries).into_iter().rev() {
        let target = map_coord(entry.coord);
        let voxel = map_voxel(entry.voxel);
        if failure
            .check(world.set(target, voxel.clone(), apply_physics))
            .is_none()
        {
            continue;
        }
        world.tag(target, NAME_TAG, name);
        entry.coord = target;
        entry.voxel = voxel;
        written.push(entry);
    }
    // Restore the sorted order the walk started from
    written.reverse();
    hull.entries = written;
}

/// Teleport an entity and give it back its velocity
fn move_entity<W: World + ?Sized>(
    world: &mut W,
    entity: W::Handle,
    map: impl Fn(DVec3) -> DVec3,
) -> std::result::Result<(), GridError> {
    let position = world.position(entity)?;
    let velocity = world.velocity(entity)?;
    world.set_position(entity, map(position))?;
    world.set_velocity(entity, velocity)
}

/// Heading after a rotation, read back from the rotated engine sign
fn refresh_heading<W: World + ?Sized>(engine: &mut Engine, turn: Turn, world: &W) {
    let reread = world
        .get(engine.coord)
        .ok()
        .and_then(|sign| Engine::heading_from(engine.coord, &sign).ok());
    engine.heading = reread.unwrap_or_else(|| engine.heading.rotated(turn));
}

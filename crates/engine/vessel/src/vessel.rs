//! The vessel aggregate
//!
//! A [`Vessel`] owns its hull and control surfaces and exposes the entry
//! points the input layer calls. It never owns the world; every mutating call
//! borrows it for the duration of the call.

use crate::classifier::ControlRole;
use crate::config::VesselConfig;
use crate::control::{write_role_tag, ControlSurfaces, Engine, Steering, NAME_TAG};
use crate::discovery::discover;
use crate::error::{Error, Result};
use crate::hull::Hull;
use crate::orientation::Turn;
use crate::transform::{self, TransformTarget};
use crate::world::World;
use glam::IVec3;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Vessel {
    name: String,
    hull: Hull,
    controls: ControlSurfaces,
    truncated: bool,
    config: VesselConfig,
}

impl Vessel {
    /// Discover a new vessel from its license sign
    pub fn create<W: World + ?Sized>(
        name: impl Into<String>,
        license: IVec3,
        world: &mut W,
        config: &VesselConfig,
    ) -> Result<Self> {
        let name = name.into();
        let discovery = discover(license, &name, world, config.max_vessel_size)?;

        let controls = ControlSurfaces::new(license);
        write_role_tag(world, license, ControlRole::License);

        info!(
            "Created vessel '{}' at {} with {} voxels",
            name,
            license,
            discovery.entries.len()
        );

        Ok(Vessel {
            name,
            hull: Hull::new(license, discovery.entries),
            controls,
            truncated: discovery.truncated,
            config: config.clone(),
        })
    }

    /// Name written on the license sign
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Voxels owned by this vessel
    pub fn hull(&self) -> &Hull {
        &self.hull
    }

    /// Rotation pivot (the license sign's position)
    pub fn origin(&self) -> IVec3 {
        self.hull.origin()
    }

    /// License, engine and steering signs
    pub fn controls(&self) -> &ControlSurfaces {
        &self.controls
    }

    /// Registered engine, if any
    pub fn engine(&self) -> Option<&Engine> {
        self.controls.engine.as_ref()
    }

    /// Engine velocity, `None` without an engine
    pub fn velocity(&self) -> Option<u32> {
        self.engine().map(|e| e.velocity)
    }

    /// Discovery hit the size cap; the hull may be incomplete
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Register the engine sign at `coord`
    ///
    /// A second engine is rejected and the existing one left untouched, as is
    /// a coordinate already serving as another control sign.
    pub fn attach_engine<W: World + ?Sized>(&mut self, coord: IVec3, world: &mut W) -> Result<()> {
        if self.controls.engine.is_some() {
            return Err(self.duplicate(ControlRole::Engine));
        }
        self.check_unoccupied(coord)?;

        let sign = world.get(coord)?;
        let engine = Engine::new(coord, &sign)?;

        self.absorb(coord, world)?;
        write_role_tag(world, coord, ControlRole::Engine);
        self.controls.engine = Some(engine);

        info!(
            "Vessel '{}' engine registered at {} heading {:?}",
            self.name, coord, engine.heading
        );
        Ok(())
    }

    /// Register a steering sign at `coord` with its direction marker
    ///
    /// One steering sign per side; a second one for the same side is rejected.
    pub fn attach_steering<W: World + ?Sized>(
        &mut self,
        coord: IVec3,
        marker: &str,
        world: &mut W,
    ) -> Result<Turn> {
        let steering = Steering::new(coord, marker)?;
        if self.controls.steering_for(steering.side).is_some()
            || self.controls.steering_at(coord).is_some()
        {
            return Err(self.duplicate(ControlRole::Steering));
        }
        self.check_unoccupied(coord)?;

        self.absorb(coord, world)?;
        write_role_tag(world, coord, ControlRole::Steering);
        self.controls.steering.push(steering);

        info!(
            "Vessel '{}' steering registered at {} turning {:?}",
            self.name, coord, steering.side
        );
        Ok(steering.side)
    }

    /// Travel forward by the engine's velocity
    pub fn move_forward<W: World + ?Sized>(&mut self, world: &mut W) -> Result<()> {
        let delta = self.require_engine()?.delta();
        self.apply_translation(delta, world)
    }

    /// Lift by one voxel
    pub fn move_up<W: World + ?Sized>(&mut self, world: &mut W) -> Result<()> {
        self.translate(IVec3::Y, world)
    }

    /// Sink by one voxel
    pub fn move_down<W: World + ?Sized>(&mut self, world: &mut W) -> Result<()> {
        self.translate(IVec3::NEG_Y, world)
    }

    /// Translate by an arbitrary delta
    pub fn translate<W: World + ?Sized>(&mut self, delta: IVec3, world: &mut W) -> Result<()> {
        self.require_engine()?;
        self.apply_translation(delta, world)
    }

    /// Quarter turn to the left
    pub fn rotate_left<W: World + ?Sized>(&mut self, world: &mut W) -> Result<()> {
        self.rotate(Turn::Left, world)
    }

    /// Quarter turn to the right
    pub fn rotate_right<W: World + ?Sized>(&mut self, world: &mut W) -> Result<()> {
        self.rotate(Turn::Right, world)
    }

    /// Quarter turn about the origin
    pub fn rotate<W: World + ?Sized>(&mut self, turn: Turn, world: &mut W) -> Result<()> {
        self.require_engine()?;
        let target = TransformTarget {
            name: &self.name,
            hull: &mut self.hull,
            controls: &mut self.controls,
            config: &self.config,
        };
        transform::rotate(target, turn, world)
    }

    /// Raise engine velocity, returning the new value
    pub fn increment_velocity(&mut self) -> Result<u32> {
        let max_velocity = self.config.max_velocity;
        let engine = self.require_engine_mut()?;
        Ok(engine.increment_velocity(max_velocity))
    }

    /// Lower engine velocity, returning the new value
    pub fn decrement_velocity(&mut self) -> Result<u32> {
        let engine = self.require_engine_mut()?;
        Ok(engine.decrement_velocity())
    }

    /// Side of the steering sign registered at `coord`, if any
    pub fn resolve_steering_intent(&self, coord: IVec3) -> Option<Turn> {
        self.controls.steering_at(coord).map(|s| s.side)
    }

    fn apply_translation<W: World + ?Sized>(&mut self, delta: IVec3, world: &mut W) -> Result<()> {
        let target = TransformTarget {
            name: &self.name,
            hull: &mut self.hull,
            controls: &mut self.controls,
            config: &self.config,
        };
        transform::translate(target, delta, world)
    }

    /// Pull a control sign into the hull so it moves with the vessel
    fn absorb<W: World + ?Sized>(&mut self, coord: IVec3, world: &mut W) -> Result<()> {
        if self.hull.contains(coord) {
            return Ok(());
        }
        let voxel = world.get(coord)?;
        world.tag(coord, NAME_TAG, &self.name);
        self.hull.absorb(coord, voxel);
        Ok(())
    }

    fn require_engine(&self) -> Result<&Engine> {
        self.controls
            .engine
            .as_ref()
            .ok_or_else(|| Error::MissingEngine(self.name.clone()))
    }

    fn require_engine_mut(&mut self) -> Result<&mut Engine> {
        self.controls
            .engine
            .as_mut()
            .ok_or_else(|| Error::MissingEngine(self.name.clone()))
    }

    /// Each control coordinate carries exactly one role
    fn check_unoccupied(&self, coord: IVec3) -> Result<()> {
        match self.controls.surface_at(coord) {
            Some(existing) => {
                warn!(
                    "Vessel '{}' already uses {} as its {} sign, ignoring registration",
                    self.name, coord, existing
                );
                Err(Error::OccupiedControlSurface {
                    vessel: self.name.clone(),
                    coord,
                    existing,
                })
            }
            None => Ok(()),
        }
    }

    fn duplicate(&self, role: ControlRole) -> Error {
        warn!(
            "Vessel '{}' already has a {} sign, ignoring registration",
            self.name, role
        );
        Error::DuplicateControlSurface {
            vessel: self.name.clone(),
            role,
        }
    }
}

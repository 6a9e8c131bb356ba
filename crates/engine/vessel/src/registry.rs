//! Vessel registry and sign dispatch
//!
//! The registry owns every [`Vessel`] by name. It is the only place that
//! creates or destroys them, and the bridge between sign events coming from
//! the host (text written, sign clicked) and vessel operations.

use crate::classifier::{has_header, is_wall_sign, role_of, ControlRole};
use crate::config::VesselConfig;
use crate::control::{role_at, vessel_name_at};
use crate::error::{Error, Result};
use crate::orientation::Turn;
use crate::vessel::Vessel;
use crate::world::World;
use glam::IVec3;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What a sign write did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// Not a vessel sign
    Ignored,
    /// A license sign created a new vessel
    Created {
        vessel: String,
        size: usize,
        truncated: bool,
    },
    EngineAttached { vessel: String },
    SteeringAttached { vessel: String, side: Turn },
    /// The vessel already has this kind of surface; nothing changed
    Duplicate { vessel: String, role: ControlRole },
    /// The sign already serves the vessel in another role; nothing changed
    Occupied {
        vessel: String,
        existing: ControlRole,
    },
    /// Header present but the marker line is not recognised
    UnknownRole,
}

/// What a sign click did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not a control sign of a registered vessel
    Ignored,
    Moved { vessel: String },
    Rotated { vessel: String, turn: Turn },
    /// License signs carry no click action
    License { vessel: String },
}

#[derive(Debug, Default)]
pub struct VesselRegistry {
    vessels: HashMap<String, Vessel>,
    config: VesselConfig,
}

impl VesselRegistry {
    /// Empty registry sharing `config` with every vessel it creates
    pub fn new(config: VesselConfig) -> Self {
        VesselRegistry {
            vessels: HashMap::new(),
            config,
        }
    }

    /// Config applied to new vessels
    pub fn config(&self) -> &VesselConfig {
        &self.config
    }

    /// Discover and register a vessel anchored at `license`
    pub fn create_vessel<W: World + ?Sized>(
        &mut self,
        name: &str,
        license: IVec3,
        world: &mut W,
    ) -> Result<&mut Vessel> {
        if self.vessels.contains_key(name) {
            return Err(Error::DuplicateVessel(name.to_string()));
        }
        let vessel = Vessel::create(name, license, world, &self.config)?;
        Ok(self.vessels.entry(name.to_string()).or_insert(vessel))
    }

    /// Registered vessel by name
    pub fn get(&self, name: &str) -> Option<&Vessel> {
        self.vessels.get(name)
    }

    /// Registered vessel by name, mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vessel> {
        self.vessels.get_mut(name)
    }

    /// Forget a vessel; its voxels stay in the world as they are
    pub fn remove(&mut self, name: &str) -> Option<Vessel> {
        let removed = self.vessels.remove(name);
        if removed.is_some() {
            info!("Removed vessel '{}'", name);
        }
        removed
    }

    /// Number of registered vessels
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    /// True if no vessel is registered
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vessels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Name of the registered vessel owning a voxel
    pub fn vessel_name_at<W: World + ?Sized>(&self, coord: IVec3, world: &W) -> Option<String> {
        vessel_name_at(world, coord).filter(|name| self.vessels.contains_key(name))
    }

    /// Handle text being written to the sign at `coord`
    pub fn handle_sign_write<W, S>(
        &mut self,
        coord: IVec3,
        lines: &[S],
        world: &mut W,
    ) -> Result<SignOutcome>
    where
        W: World + ?Sized,
        S: AsRef<str>,
    {
        if !has_header(lines) {
            debug!("Sign at {} has no vessel header", coord);
            return Ok(SignOutcome::Ignored);
        }

        let argument = lines.get(2).map(|line| line.as_ref().trim()).unwrap_or("");

        match role_of(lines) {
            ControlRole::License => self.write_license(coord, argument, world),
            ControlRole::Engine => {
                let vessel = self.owner_of_sign(coord, &*world)?;
                match vessel.attach_engine(coord, world) {
                    Ok(()) => Ok(SignOutcome::EngineAttached {
                        vessel: vessel.name().to_string(),
                    }),
                    Err(err) => absorb_rejection(err),
                }
            }
            ControlRole::Steering => {
                let vessel = self.owner_of_sign(coord, &*world)?;
                match vessel.attach_steering(coord, argument, world) {
                    Ok(side) => Ok(SignOutcome::SteeringAttached {
                        vessel: vessel.name().to_string(),
                        side,
                    }),
                    Err(err) => absorb_rejection(err),
                }
            }
            ControlRole::Unknown => {
                warn!("Sign at {} has the vessel header but no known role", coord);
                Ok(SignOutcome::UnknownRole)
            }
        }
    }

    /// Handle a player clicking the sign at `coord`
    pub fn handle_sign_click<W: World + ?Sized>(
        &mut self,
        coord: IVec3,
        world: &mut W,
    ) -> Result<ClickOutcome> {
        let Some(role) = role_at(&*world, coord) else {
            return Ok(ClickOutcome::Ignored);
        };
        let Some(name) = self.vessel_name_at(coord, &*world) else {
            return Ok(ClickOutcome::Ignored);
        };
        let Some(vessel) = self.vessels.get_mut(&name) else {
            return Ok(ClickOutcome::Ignored);
        };

        match role {
            ControlRole::Engine => {
                vessel.move_forward(world)?;
                Ok(ClickOutcome::Moved { vessel: name })
            }
            ControlRole::Steering => match vessel.resolve_steering_intent(coord) {
                Some(turn) => {
                    vessel.rotate(turn, world)?;
                    Ok(ClickOutcome::Rotated { vessel: name, turn })
                }
                None => Ok(ClickOutcome::Ignored),
            },
            ControlRole::License => Ok(ClickOutcome::License { vessel: name }),
            ControlRole::Unknown => Ok(ClickOutcome::Ignored),
        }
    }

    fn write_license<W: World + ?Sized>(
        &mut self,
        coord: IVec3,
        name: &str,
        world: &mut W,
    ) -> Result<SignOutcome> {
        if name.is_empty() {
            warn!("License sign at {} has no vessel name", coord);
            return Ok(SignOutcome::Ignored);
        }
        let owner = self
            .vessel_name_at(coord, &*world)
            .filter(|owner| owner != name);
        if let Some(owner) = owner {
            if let Some(existing) = role_at(&*world, coord) {
                warn!(
                    "Sign at {} is already the {} sign of vessel '{}'",
                    coord, existing, owner
                );
                return Ok(SignOutcome::Occupied {
                    vessel: owner,
                    existing,
                });
            }
        }
        let vessel = self.create_vessel(name, coord, world)?;
        if vessel.is_truncated() {
            warn!(
                "Vessel '{}' is larger than the size cap, only part of it was claimed",
                name
            );
        }
        Ok(SignOutcome::Created {
            vessel: name.to_string(),
            size: vessel.hull().len(),
            truncated: vessel.is_truncated(),
        })
    }

    /// Vessel a control sign belongs to
    ///
    /// A sign already part of a hull resolves directly; otherwise the owner
    /// of the block it is mounted on (behind a wall sign, below a standing
    /// sign) is used.
    fn owner_of_sign<W: World + ?Sized>(&mut self, coord: IVec3, world: &W) -> Result<&mut Vessel> {
        let name = match vessel_name_at(world, coord) {
            Some(name) => name,
            None => {
                let support = support_of(coord, world)?;
                vessel_name_at(world, support).ok_or(Error::NotAVesselVoxel(support))?
            }
        };
        self.vessels
            .get_mut(&name)
            .ok_or(Error::VesselNotFound(name))
    }
}

/// Block a sign is mounted on
fn support_of<W: World + ?Sized>(coord: IVec3, world: &W) -> Result<IVec3> {
    let sign = world.get(coord)?;
    match sign.shape.facing {
        Some(facing) if is_wall_sign(&sign.material) && facing.is_horizontal() => {
            Ok(coord - facing.offset())
        }
        _ => Ok(coord + IVec3::NEG_Y),
    }
}

/// Rejected registrations are reported as outcomes, not errors
fn absorb_rejection(err: Error) -> Result<SignOutcome> {
    match err {
        Error::DuplicateControlSurface { vessel, role } => {
            Ok(SignOutcome::Duplicate { vessel, role })
        }
        Error::OccupiedControlSurface {
            vessel, existing, ..
        } => Ok(SignOutcome::Occupied { vessel, existing }),
        other => Err(other),
    }
}

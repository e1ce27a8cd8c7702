//! Static map configuration: teams, bases, towers and lanes.
//!
//! The JSON layout follows the map authoring format: bases and towers are
//! keyed by team name, lanes are called roads.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::{HEAVY_CHARGE_DAMAGE, MIN_LANE_POINTS, MIN_TEAMS};
use crate::error::ConfigError;
use crate::types::Position;

pub const TEAM_RED: &str = "red";
pub const TEAM_BLUE: &str = "blue";

/// Complete map description, consumed once at battle setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plane_size: f32,
    #[serde(default)]
    pub point_size: f32,
    pub teams: Vec<TeamConfig>,
    pub bases: BTreeMap<String, BaseEntry>,
    #[serde(default)]
    pub towers: BTreeMap<String, Vec<StructureConfig>>,
    pub roads: Vec<LaneConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    pub name: String,
    pub color: String,
    /// Damage dealt by this team's charges. Defaults to `CHARGE_DAMAGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_damage: Option<f32>,
}

/// A base or tower placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureConfig {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub position: PointConfig,
}

/// Maps usually give a team a single base; a list is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseEntry {
    One(StructureConfig),
    Many(Vec<StructureConfig>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub points: Vec<PointConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointConfig {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PointConfig {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_position(self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

impl BaseEntry {
    pub fn as_slice(&self) -> &[StructureConfig] {
        match self {
            BaseEntry::One(base) => std::slice::from_ref(base),
            BaseEntry::Many(bases) => bases,
        }
    }
}

impl MapConfig {
    /// Parse and validate a JSON map.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Bases configured for `team`, empty if none.
    pub fn bases_of(&self, team: &str) -> &[StructureConfig] {
        self.bases.get(team).map(BaseEntry::as_slice).unwrap_or(&[])
    }

    /// Towers configured for `team`, empty if none.
    pub fn towers_of(&self, team: &str) -> &[StructureConfig] {
        self.towers.get(team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check the map for anything that would leave the battle in an
    /// inconsistent state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teams.len() < MIN_TEAMS {
            return Err(ConfigError::TooFewTeams {
                min: MIN_TEAMS,
                found: self.teams.len(),
            });
        }

        let mut names = HashSet::new();
        for team in &self.teams {
            if !names.insert(team.name.as_str()) {
                return Err(ConfigError::DuplicateTeam(team.name.clone()));
            }
            if let Some(damage) = team.charge_damage {
                if !damage.is_finite() || damage < 0.0 {
                    return Err(ConfigError::InvalidDamage {
                        team: team.name.clone(),
                        damage,
                    });
                }
            }
        }

        for team in self.bases.keys() {
            if !names.contains(team.as_str()) {
                return Err(ConfigError::UnknownTeam {
                    section: "bases",
                    team: team.clone(),
                });
            }
        }
        for team in self.towers.keys() {
            if !names.contains(team.as_str()) {
                return Err(ConfigError::UnknownTeam {
                    section: "towers",
                    team: team.clone(),
                });
            }
        }

        for team in &self.teams {
            let bases = self.bases_of(&team.name);
            if bases.is_empty() {
                return Err(ConfigError::MissingBase(team.name.clone()));
            }
            for base in bases {
                check_point(&base.position, || {
                    format!("base `{}` of team `{}`", base.name, team.name)
                })?;
            }
            for tower in self.towers_of(&team.name) {
                check_point(&tower.position, || {
                    format!("tower `{}` of team `{}`", tower.name, team.name)
                })?;
            }
        }

        if self.roads.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        for lane in &self.roads {
            if lane.points.len() < MIN_LANE_POINTS {
                return Err(ConfigError::LaneTooShort {
                    lane: lane.name.clone(),
                    points: lane.points.len(),
                    min: MIN_LANE_POINTS,
                });
            }
            for (i, point) in lane.points.iter().enumerate() {
                check_point(point, || format!("point {i} of lane `{}`", lane.name))?;
            }
        }

        Ok(())
    }

    /// The reference 5x5 square map: red and blue, one base and six towers
    /// each, three lanes running between the bases.
    pub fn square_5x5() -> Self {
        let p = PointConfig::new;
        let structure = |kind: &str, name: &str, position: PointConfig| StructureConfig {
            kind: kind.to_string(),
            name: name.to_string(),
            position,
        };
        let towers = |sign: f32| {
            [
                ("Tower mid 1", p(275.0 * sign, 0.0, 275.0 * sign)),
                ("Tower mid 2", p(95.0 * sign, 0.0, 95.0 * sign)),
                ("Tower bot 1", p(445.0 * sign, 0.0, 175.0 * sign)),
                ("Tower bot 2", p(445.0 * sign, 0.0, -215.0 * sign)),
                ("Tower top 1", p(175.0 * sign, 0.0, 445.0 * sign)),
                ("Tower top 2", p(-215.0 * sign, 0.0, 445.0 * sign)),
            ]
            .into_iter()
            .map(|(name, position)| structure("tower", name, position))
            .collect::<Vec<_>>()
        };

        let mut bases = BTreeMap::new();
        bases.insert(
            TEAM_RED.to_string(),
            BaseEntry::One(structure("base", "Base", p(-425.0, 0.0, -425.0))),
        );
        bases.insert(
            TEAM_BLUE.to_string(),
            BaseEntry::One(structure("base", "Base", p(425.0, 0.0, 425.0))),
        );

        let mut tower_map = BTreeMap::new();
        tower_map.insert(TEAM_RED.to_string(), towers(-1.0));
        tower_map.insert(TEAM_BLUE.to_string(), towers(1.0));

        let lane = |name: &str, color: &str, points: [PointConfig; 4]| LaneConfig {
            name: name.to_string(),
            color: color.to_string(),
            points: points.to_vec(),
        };

        Self {
            kind: "square".to_string(),
            name: "map 5*5".to_string(),
            plane_size: 1000.0,
            point_size: 10.0,
            teams: vec![
                TeamConfig {
                    name: TEAM_RED.to_string(),
                    color: "#FF0000".to_string(),
                    charge_damage: None,
                },
                TeamConfig {
                    name: TEAM_BLUE.to_string(),
                    color: "#0000FF".to_string(),
                    charge_damage: Some(HEAVY_CHARGE_DAMAGE),
                },
            ],
            bases,
            towers: tower_map,
            roads: vec![
                lane(
                    "mid",
                    "#FFDD00",
                    [
                        p(405.0, 0.0, 405.0),
                        p(345.0, 0.0, 345.0),
                        p(-345.0, 0.0, -345.0),
                        p(-405.0, 0.0, -405.0),
                    ],
                ),
                lane(
                    "top",
                    "#FF0000",
                    [
                        p(395.0, 0.0, 445.0),
                        p(-395.0, 0.0, 445.0),
                        p(-445.0, 0.0, 395.0),
                        p(-445.0, 0.0, -395.0),
                    ],
                ),
                lane(
                    "bot",
                    "#0000FF",
                    [
                        p(445.0, 0.0, 395.0),
                        p(445.0, 0.0, -395.0),
                        p(395.0, 0.0, -445.0),
                        p(-395.0, 0.0, -445.0),
                    ],
                ),
            ],
        }
    }
}

fn check_point(point: &PointConfig, what: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if point.to_position().is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidPosition { what: what() })
    }
}

//! Battle map: teams, their entity collections, and lanes.
//!
//! The map holds entity handles only. Component data lives in the ECS world.
//! Collections are kept in insertion order, which is the order units are
//! considered for targeting and collision.

use hecs::Entity;

use lanebattle_core::enums::EntityKind;
use lanebattle_core::types::{Position, TeamId};

/// A team and the live entities it owns.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: String,
    /// Damage dealt by this team's charges.
    pub charge_damage: f32,
    /// Set when the last base is destroyed. Never cleared.
    pub defeat: bool,
    pub bases: Vec<Entity>,
    pub towers: Vec<Entity>,
    pub bots: Vec<Entity>,
    pub charges: Vec<Entity>,
}

/// Polyline bots walk along.
#[derive(Debug, Clone)]
pub struct Lane {
    pub name: String,
    pub color: String,
    pub points: Vec<Position>,
}

#[derive(Debug, Clone, Default)]
pub struct BattleMap {
    pub kind: String,
    pub name: String,
    teams: Vec<Team>,
    lanes: Vec<Lane>,
}

impl Team {
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        color: impl Into<String>,
        charge_damage: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            charge_damage,
            defeat: false,
            bases: Vec::new(),
            towers: Vec::new(),
            bots: Vec::new(),
            charges: Vec::new(),
        }
    }

    pub fn roster(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Base => &self.bases,
            EntityKind::Tower => &self.towers,
            EntityKind::Bot => &self.bots,
            EntityKind::Charge => &self.charges,
        }
    }

    fn roster_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Base => &mut self.bases,
            EntityKind::Tower => &mut self.towers,
            EntityKind::Bot => &mut self.bots,
            EntityKind::Charge => &mut self.charges,
        }
    }

    /// Combat units in targeting order: towers, bases, bots.
    pub fn units(&self) -> impl Iterator<Item = Entity> + '_ {
        self.towers
            .iter()
            .chain(self.bases.iter())
            .chain(self.bots.iter())
            .copied()
    }
}

impl Lane {
    /// Lane points ordered to start at the end nearest `origin`.
    pub fn oriented_from(&self, origin: &Position) -> Vec<Position> {
        let mut points = self.points.clone();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if origin.distance_to(last) < origin.distance_to(first) {
                points.reverse();
            }
        }
        points
    }
}

impl BattleMap {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            teams: Vec::new(),
            lanes: Vec::new(),
        }
    }

    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        charge_damage: f32,
    ) -> TeamId {
        let id = TeamId(self.teams.len() as u32);
        self.teams.push(Team::new(id, name, color, charge_damage));
        id
    }

    pub fn add_lane(&mut self, lane: Lane) {
        self.lanes.push(lane);
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Every team, defeated or not.
    pub fn all_teams(&self) -> &[Team] {
        &self.teams
    }

    /// Teams that have not been defeated.
    pub fn teams(&self) -> impl Iterator<Item = &Team> + '_ {
        self.teams.iter().filter(|t| !t.defeat)
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams().map(|t| t.id).collect()
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.0 as usize)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id.0 as usize)
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn is_active(&self, id: TeamId) -> bool {
        self.team(id).is_some_and(|t| !t.defeat)
    }

    pub fn active_count(&self) -> usize {
        self.teams().count()
    }

    /// The sole surviving team, if exactly one is left.
    pub fn winner(&self) -> Option<TeamId> {
        let mut active = self.teams();
        match (active.next(), active.next()) {
            (Some(team), None) => Some(team.id),
            _ => None,
        }
    }

    /// Active teams other than `id`.
    pub fn enemy_teams(&self, id: TeamId) -> impl Iterator<Item = &Team> + '_ {
        self.teams().filter(move |t| t.id != id)
    }

    /// Combat units of every active enemy of `id`: per team in team order,
    /// towers, then bases, then bots.
    pub fn enemy_units(&self, id: TeamId) -> Vec<Entity> {
        self.enemy_teams(id).flat_map(Team::units).collect()
    }

    pub fn bases(&self) -> Vec<Entity> {
        self.collect(EntityKind::Base)
    }

    pub fn towers(&self) -> Vec<Entity> {
        self.collect(EntityKind::Tower)
    }

    pub fn bots(&self) -> Vec<Entity> {
        self.collect(EntityKind::Bot)
    }

    pub fn charges(&self) -> Vec<Entity> {
        self.collect(EntityKind::Charge)
    }

    fn collect(&self, kind: EntityKind) -> Vec<Entity> {
        self.teams()
            .flat_map(|t| t.roster(kind).iter().copied())
            .collect()
    }

    /// Returns false if the team does not exist.
    pub fn add_entity(&mut self, team: TeamId, kind: EntityKind, entity: Entity) -> bool {
        match self.team_mut(team) {
            Some(t) => {
                t.roster_mut(kind).push(entity);
                true
            }
            None => false,
        }
    }

    /// Returns whether the entity was found in the team's collection.
    pub fn remove_entity(&mut self, team: TeamId, kind: EntityKind, entity: Entity) -> bool {
        let Some(t) = self.team_mut(team) else {
            return false;
        };
        let roster = t.roster_mut(kind);
        let before = roster.len();
        roster.retain(|&e| e != entity);
        roster.len() != before
    }

    /// Latch `defeat` if the team has no bases left. Returns true only on the
    /// call that latches it.
    pub fn check_defeat(&mut self, id: TeamId) -> bool {
        match self.team_mut(id) {
            Some(team) if !team.defeat && team.bases.is_empty() => {
                team.defeat = true;
                true
            }
            _ => false,
        }
    }
}

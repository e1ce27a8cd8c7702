//! Map configuration errors. Any of these stops a battle from starting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("a battle needs at least {min} teams, the map defines {found}")]
    TooFewTeams { min: usize, found: usize },
    #[error("team name `{0}` is used more than once")]
    DuplicateTeam(String),
    #[error("team `{0}` has no base")]
    MissingBase(String),
    #[error("{section} refer to unknown team `{team}`")]
    UnknownTeam { section: &'static str, team: String },
    #[error("the map defines no lanes")]
    NoLanes,
    #[error("lane `{lane}` has {points} point(s), at least {min} are required")]
    LaneTooShort {
        lane: String,
        points: usize,
        min: usize,
    },
    #[error("{what} has a non-finite coordinate")]
    InvalidPosition { what: String },
    #[error("team `{team}` has an invalid charge damage of {damage}")]
    InvalidDamage { team: String, damage: f32 },
    #[error("`{field}` must be {expected}, got {value}")]
    InvalidTuning {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = String;
pub type GameId = String;

/// One completed game session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: GameId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ruleset: Ruleset,
    #[serde(default)]
    pub participants: Vec<ParticipantEntry>,
}

/// Ruleset the game was played with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    #[default]
    Standard,
    Custom,
}

/// One player's outcome in one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    pub player_id: PlayerId,
    pub display_name: Option<String>,
    pub role: String,
    pub camp: Camp,
    pub victorious: bool,
    /// `None` when the game did not record deaths at all
    pub death: Option<DeathData>,
    pub votes: Option<Vec<VoteRecord>>,
    pub speech: Option<Vec<SpeechSample>>,
    pub loot: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Camp {
    Villager,
    Wolf,
    Solo,
}

impl Camp {
    pub const ALL: [Camp; 3] = [Camp::Villager, Camp::Wolf, Camp::Solo];

    pub fn as_str(&self) -> &str {
        match self {
            Camp::Villager => "villager",
            Camp::Wolf => "wolf",
            Camp::Solo => "solo",
        }
    }
}

/// Death information as recorded by the game server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeathData {
    Survived,
    Died(Death),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Death {
    pub cause: DeathCause,
    /// Day on which the death happened, counted from 1
    pub day: u32,
    pub killer_id: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Vote,
    Killed,
    Environment,
    Disconnected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub day: u32,
    pub cast_at: DateTime<Utc>,
    /// `None` for an abstention
    pub target_id: Option<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechSample {
    pub duration_ms: u64,
}

impl GameRecord {
    /// Length of the game in milliseconds, if both timestamps are usable
    pub fn duration_ms(&self) -> Option<u64> {
        let ended_at = self.ended_at?;
        let millis = ended_at.signed_duration_since(self.started_at).num_milliseconds();
        (millis > 0).then_some(millis as u64)
    }

    pub fn has_roster(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn participant(&self, player_id: &str) -> Option<&ParticipantEntry> {
        self.participants.iter().find(|p| p.player_id == player_id)
    }
}

impl ParticipantEntry {
    pub fn survived(&self) -> Option<bool> {
        self.death
            .as_ref()
            .map(|death| matches!(death, DeathData::Survived))
    }

    pub fn died(&self) -> Option<&Death> {
        match self.death.as_ref()? {
            DeathData::Died(death) => Some(death),
            DeathData::Survived => None,
        }
    }

    pub fn speech_ms(&self) -> Option<u64> {
        self.speech
            .as_ref()
            .map(|samples| samples.iter().map(|s| s.duration_ms).sum())
    }
}

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::PathBuf;

use werewolf_titles::config::AppConfig;
use werewolf_titles::domain::{
    Camp, Death, DeathCause, DeathData, GameRecord, ParticipantEntry, Ruleset, SpeechSample, VoteRecord,
};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
}

pub struct GameBuilder {
    game: GameRecord,
}

/// Game number `index`, starting one hour after the previous one and
/// lasting twenty minutes
pub fn game(index: usize) -> GameBuilder {
    let started_at = base_time() + Duration::hours(index as i64);
    GameBuilder {
        game: GameRecord {
            id: format!("g{index:05}"),
            started_at,
            ended_at: Some(started_at + Duration::minutes(20)),
            ruleset: Ruleset::Standard,
            participants: vec![],
        },
    }
}

impl GameBuilder {
    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.game.ruleset = ruleset;
        self
    }

    pub fn player(mut self, id: &str, camp: Camp, victorious: bool) -> Self {
        self.game.participants.push(entry(id, camp, victorious));
        self
    }

    pub fn with(mut self, participant: ParticipantEntry) -> Self {
        self.game.participants.push(participant);
        self
    }

    pub fn build(self) -> GameRecord {
        self.game
    }
}

pub fn entry(id: &str, camp: Camp, victorious: bool) -> ParticipantEntry {
    ParticipantEntry {
        player_id: id.to_string(),
        display_name: None,
        role: match camp {
            Camp::Villager => "villager",
            Camp::Wolf => "werewolf",
            Camp::Solo => "fool",
        }
        .to_string(),
        camp,
        victorious,
        death: None,
        votes: None,
        speech: None,
        loot: None,
    }
}

pub fn died(cause: DeathCause, day: u32, killer: Option<&str>) -> Option<DeathData> {
    Some(DeathData::Died(Death {
        cause,
        day,
        killer_id: killer.map(str::to_string),
    }))
}

pub fn vote(game: &GameRecord, day: u32, minute: i64, target: Option<&str>) -> VoteRecord {
    VoteRecord {
        day,
        cast_at: game.started_at + Duration::minutes(minute),
        target_id: target.map(str::to_string),
    }
}

pub fn speech(seconds: &[u64]) -> Option<Vec<SpeechSample>> {
    Some(
        seconds
            .iter()
            .map(|s| SpeechSample { duration_ms: s * 1000 })
            .collect(),
    )
}

/// One single-participant game per (player, round); `wins` of the
/// player's `games_each` games are victories
pub fn win_rate_history(players: &[(&str, u32)], games_each: u32) -> Vec<GameRecord> {
    let mut games = Vec::new();
    for round in 0..games_each {
        for (id, wins) in players {
            let index = games.len();
            games.push(game(index).player(id, Camp::Villager, round < *wins).build());
        }
    }
    games
}

/// A population with varied behaviour: deaths, votes, speech and loot
/// all depend on the player and game index
pub fn varied_history(players: usize, games: usize) -> Vec<GameRecord> {
    let ids: Vec<String> = (0..players).map(|p| format!("p{p:02}")).collect();

    (0..games)
        .map(|index| {
            let mut builder = game(index);
            if index % 5 == 4 {
                builder = builder.ruleset(Ruleset::Custom);
            }

            let seated: Vec<&String> = (0..6).map(|seat| &ids[(index * 7 + seat * 3) % players]).collect();
            let wolf = seated[0].as_str();
            let wolves_win = (index + wolf.len() * 3 + wolf.as_bytes()[2] as usize) % 3 == 0;
            let mut participants = Vec::new();

            for (seat, id) in seated.iter().enumerate() {
                if participants.iter().any(|p: &ParticipantEntry| &p.player_id == *id) {
                    continue;
                }
                let camp = match seat {
                    0 => Camp::Wolf,
                    5 if index % 4 == 0 => Camp::Solo,
                    _ => Camp::Villager,
                };
                let victorious = match camp {
                    Camp::Wolf => wolves_win,
                    Camp::Villager => !wolves_win,
                    Camp::Solo => index % 8 == 0,
                };
                let mut participant = entry(id, camp, victorious);
                let seed = id.as_bytes()[2] as usize + id.as_bytes()[1] as usize * 10;

                participant.death = if (seed + index) % 3 == 0 {
                    Some(DeathData::Survived)
                } else if seat == 0 {
                    died(DeathCause::Vote, ((seed + index) % 4) as u32 + 1, None)
                } else {
                    died(DeathCause::Killed, ((seed + index) % 3) as u32 + 1, Some(wolf))
                };
                participant.speech = speech(&[(seed % 7) as u64 * 10 + 5, (index % 5) as u64 * 3]);
                participant.loot = Some(((seed * 13 + index) % 40) as u64);
                participants.push(participant);
            }

            let mut record = builder.build();
            let votes: Vec<Vec<VoteRecord>> = participants
                .iter()
                .enumerate()
                .map(|(seat, p)| {
                    let target = if (seat + index) % 4 == 0 { None } else { Some(wolf) };
                    let target = if p.player_id == wolf { Some(seated[1].as_str()) } else { target };
                    vec![vote(&record, 1, 5 + ((seat * 3 + index) % 7) as i64, target)]
                })
                .collect();
            for (participant, player_votes) in participants.iter_mut().zip(votes) {
                participant.votes = Some(player_votes);
            }
            record.participants = participants;
            record
        })
        .collect()
}

/// Settings with every path inside a fresh temporary directory
pub fn temp_config(name: &str) -> AppConfig {
    let root = temp_root(name);
    let mut config = AppConfig::new();
    config.paths.games_path = root.join("games.json");
    config.paths.cache_dir = root.join("cache");
    config.paths.output_dir = root.join("output");
    config
}

pub fn temp_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("werewolf_titles_it_{name}"));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    root
}

pub fn write_games(config: &AppConfig, games: &[GameRecord]) {
    let json = serde_json::to_string_pretty(games).unwrap();
    std::fs::write(&config.paths.games_path, json).unwrap();
}

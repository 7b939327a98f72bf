use super::models::{GameId, GameRecord};
use super::slice::DatasetSlice;
use log::warn;
use std::collections::BTreeMap;

/// Collection of games indexed by ID, iterated in chronological order
#[derive(Debug, Clone, Default)]
pub struct GameCollection {
    games: Vec<GameRecord>,
    by_id: BTreeMap<GameId, usize>,
}

impl GameCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_games(games: Vec<GameRecord>) -> Self {
        let mut collection = Self::new();
        for game in games {
            collection.add(game);
        }
        collection.sort_chronologically();
        collection
    }

    /// Adds a game; a repeated ID keeps the first record seen
    pub fn add(&mut self, game: GameRecord) {
        if self.by_id.contains_key(&game.id) {
            warn!("Duplicate game id {}, keeping first record", game.id);
            return;
        }
        self.by_id.insert(game.id.clone(), self.games.len());
        self.games.push(game);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GameRecord> {
        self.by_id.get(id).map(|&idx| &self.games[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.iter()
    }

    pub fn as_slice(&self) -> &[GameRecord] {
        &self.games
    }

    /// Games belonging to a dataset slice, in chronological order
    pub fn for_slice(&self, slice: DatasetSlice) -> Vec<&GameRecord> {
        self.games.iter().filter(|g| slice.includes(g)).collect()
    }

    fn sort_chronologically(&mut self) {
        self.games
            .sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
        self.by_id = self
            .games
            .iter()
            .enumerate()
            .map(|(idx, game)| (game.id.clone(), idx))
            .collect();
    }
}

//! Save / load of a game in progress.
//!
//! The file is a bincode-encoded [`SaveFile`] followed by an HMAC-SHA256 of
//! the payload. Loading never touches the running game: callers get a fully
//! checked `SaveFile` back or an error.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hmac::{Hmac, Mac};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::action::{Action, MoveSource};
use crate::card::{ACE, Card, KING, Suit};
use crate::cursor::Cursor;
use crate::state::{DECK_SIZE, Foundations, GameState, TABLEAU_STACKS};

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY: &[u8] = b"soli_state_key_keep_your_hands_off";
const HMAC_SIZE: usize = 32;
const FILE_NAME: &str = "soli-state.dat";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode or decode the save: {0}")]
    Codec(#[from] bincode::Error),
    #[error("could not initialise the signing key")]
    Key,
    #[error("save file is too short to be signed")]
    Truncated,
    #[error("save file signature mismatch")]
    BadSignature,
    #[error("save file holds an impossible game: {0}")]
    Invalid(&'static str),
}

/// One saved game: the table, its history and where the cursor was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    pub draw_cursor: usize,
    pub draw_pile: Vec<Card>,
    pub tableau: [Vec<Card>; TABLEAU_STACKS],
    pub foundations: Foundations,
    pub history: Vec<Action>,
    pub cursor_x: usize,
    pub cursor_y: usize,
}

impl SaveFile {
    pub fn capture(state: &GameState, cursor: &Cursor) -> Self {
        SaveFile {
            draw_cursor: state.draw_cursor,
            draw_pile: state.draw_pile.clone(),
            tableau: state.tableau.clone(),
            foundations: state.foundations.clone(),
            history: state.history.clone(),
            cursor_x: cursor.x,
            cursor_y: cursor.y,
        }
    }

    /// Rebuild the game. Any move in progress at save time is dropped.
    pub fn restore(self) -> Result<(GameState, Cursor), PersistError> {
        let state = GameState {
            draw_pile: self.draw_pile,
            draw_cursor: self.draw_cursor,
            tableau: self.tableau,
            foundations: self.foundations,
            history: self.history,
        };
        check(&state).map_err(PersistError::Invalid)?;
        Ok((state, Cursor::at(self.cursor_x, self.cursor_y)))
    }
}

/// Reject anything a sequence of legal actions could not have produced.
fn check(state: &GameState) -> Result<(), &'static str> {
    if state.card_count() != DECK_SIZE {
        return Err("wrong number of cards");
    }
    let mut seen = [[false; KING as usize]; 4];
    for card in state.all_cards() {
        if !(ACE..=KING).contains(&card.rank) {
            return Err("card rank out of range");
        }
        let slot = &mut seen[card.suit as usize][usize::from(card.rank - 1)];
        if *slot {
            return Err("duplicate card");
        }
        *slot = true;
    }

    if state.draw_cursor >= state.draw_pile.len().max(1) {
        return Err("draw cursor out of range");
    }

    for suit in Suit::ALL {
        let in_order = state
            .foundations
            .get(suit)
            .iter()
            .enumerate()
            .all(|(i, c)| c.suit == suit && usize::from(c.rank) == i + 1);
        if !in_order {
            return Err("foundation out of order");
        }
    }

    let in_range = state.history.iter().all(|action| match action {
        Action::Move(p) => {
            p.to_stack < TABLEAU_STACKS
                && (p.source != MoveSource::Stack || p.from_stack < TABLEAU_STACKS)
        }
        Action::Resolve(p) => p.from_stack < TABLEAU_STACKS,
        Action::NextInPile => true,
    });
    if !in_range {
        return Err("history refers to a missing stack");
    }

    Ok(())
}

/// Where a game is saved.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SaveStore { path: path.into() }
    }

    /// `soli-state.dat` in the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "soli", "soli")?;
        Some(proj_dirs.data_dir().join(FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, verify and decode the save file.
    pub fn load(&self) -> Result<SaveFile, PersistError> {
        let mut data = Vec::new();
        File::open(&self.path)?.read_to_end(&mut data)?;

        if data.len() < HMAC_SIZE {
            return Err(PersistError::Truncated);
        }
        let (payload, signature) = data.split_at(data.len() - HMAC_SIZE);

        let mut mac = HmacSha256::new_from_slice(SECRET_KEY).map_err(|_| PersistError::Key)?;
        mac.update(payload);
        if mac.verify_slice(signature).is_err() {
            warn!("Save file {} signature mismatch", self.path.display());
            return Err(PersistError::BadSignature);
        }

        let save: SaveFile = bincode::deserialize(payload)?;
        info!("Loaded game from {}", self.path.display());
        Ok(save)
    }

    /// Write the save atomically: a temp file is written, synced and then
    /// renamed over the old save.
    pub fn save(&self, save: &SaveFile) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut data = bincode::serialize(save)?;
        let mut mac = HmacSha256::new_from_slice(SECRET_KEY).map_err(|_| PersistError::Key)?;
        mac.update(&data);
        data.extend_from_slice(&mac.finalize().into_bytes());

        let mut temp_path = self.path.clone();
        temp_path.set_extension("tmp");

        let written = File::create(&temp_path).and_then(|mut f| {
            f.write_all(&data)?;
            f.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        fs::rename(&temp_path, &self.path)?;

        info!("Saved game to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MovePayload, ResolvePayload};
    use crate::card::full_deck;

    fn played() -> GameState {
        let mut state = GameState::deal(full_deck());
        state.reveal();
        Action::NextInPile.execute(&mut state);
        state
    }

    #[test]
    fn capture_and_restore() {
        let state = played();
        let cursor = Cursor::at(2, 3);
        let (back, cur) = SaveFile::capture(&state, &cursor).restore().unwrap();
        assert_eq!(back, state);
        assert_eq!((cur.x, cur.y), (2, 3));
        assert!(!cur.is_moving());
    }

    #[test]
    fn restore_rejects_missing_card() {
        let mut save = SaveFile::capture(&played(), &Cursor::new());
        save.draw_pile.pop();
        assert!(matches!(save.restore(), Err(PersistError::Invalid("wrong number of cards"))));
    }

    #[test]
    fn restore_rejects_duplicate_card() {
        let mut save = SaveFile::capture(&played(), &Cursor::new());
        save.draw_pile[0] = save.draw_pile[1];
        assert!(matches!(save.restore(), Err(PersistError::Invalid("duplicate card"))));
    }

    #[test]
    fn restore_rejects_bad_cursor() {
        let mut save = SaveFile::capture(&played(), &Cursor::new());
        save.draw_cursor = save.draw_pile.len();
        assert!(matches!(save.restore(), Err(PersistError::Invalid("draw cursor out of range"))));
    }

    #[test]
    fn restore_rejects_bad_history() {
        let mut save = SaveFile::capture(&played(), &Cursor::new());
        save.history.push(Action::Move(MovePayload::stack(9, 1, 0)));
        assert!(save.clone().restore().is_err());

        save.history.pop();
        save.history.push(Action::Resolve(ResolvePayload::stack(7)));
        assert!(save.restore().is_err());
    }

    #[test]
    fn restore_rejects_unordered_foundation() {
        let mut state = played();
        // The draw pile of an unshuffled deal starts at rank 8.
        let card = state.draw_pile.remove(0);
        state.foundations.get_mut(card.suit).push(card);
        state.draw_cursor = 0;
        let save = SaveFile::capture(&state, &Cursor::new());
        assert!(matches!(save.restore(), Err(PersistError::Invalid("foundation out of order"))));
    }
}

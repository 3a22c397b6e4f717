use std::fs;
use std::path::Path;

use chess_core::{Game, Move, INITIAL_FEN};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("failed to read opening book: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad move {token:?} on book line {line}")]
    BadMove { line: usize, token: String },
}

/// A flat collection of known opening lines, one per line of text, each a
/// space-separated sequence of coordinate moves:
///
/// ```text
/// e2e4 e7e5 g1f3 b8c6 f1b5
/// d2d4 d7d5 c2c4
/// ```
///
/// Lines are probed by prefix against the moves played so far.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    lines: Vec<String>,
}

impl OpeningBook {
    pub fn load(path: impl AsRef<Path>) -> Result<OpeningBook, BookError> {
        let text = fs::read_to_string(path)?;
        OpeningBook::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<OpeningBook, BookError> {
        let mut lines = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for token in line.split_whitespace() {
                if Move::from_coordinate(token).is_err() {
                    return Err(BookError::BadMove {
                        line: number + 1,
                        token: token.to_string(),
                    });
                }
            }
            lines.push(line.to_string());
        }
        Ok(OpeningBook { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The next book move for the current game, if the game started from
    /// the standard position and some book line still extends it. A miss
    /// is a normal outcome, not an error.
    pub fn probe<R: Rng>(&self, game: &Game, rng: &mut R) -> Option<Move> {
        if game.position_history().first().map(String::as_str) != Some(INITIAL_FEN) {
            return None;
        }

        let played = game.move_list();
        let continuations: Vec<&str> = self
            .lines
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(&played) && line.len() > played.len())
            .collect();
        let chosen = *continuations.choose(rng)?;
        debug!("book hit: {} continuation(s) for {played:?}", continuations.len());

        let token = chosen[played.len()..].split_whitespace().next()?;
        Move::from_coordinate(token).ok()
    }
}

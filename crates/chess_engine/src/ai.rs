use std::time::Instant;

use chess_core::{Game, Move};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::evaluation::evaluate_game;
use crate::opening_book::OpeningBook;
use crate::search::alpha_beta;

pub const DEFAULT_DEPTH: u8 = 2;

/// Move selection: an optional opening-book probe in front of the pruned
/// search. Randomness is owned here and injected into every search call,
/// so a seeded instance replays identically.
pub struct ChessAi<R: Rng = StdRng> {
    depth: u8,
    book: Option<OpeningBook>,
    rng: R,
}

impl ChessAi<StdRng> {
    pub fn new(depth: u8) -> Self {
        Self::with_rng(depth, StdRng::from_entropy())
    }

    pub fn seeded(depth: u8, seed: u64) -> Self {
        Self::with_rng(depth, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ChessAi<R> {
    pub fn with_rng(depth: u8, rng: R) -> Self {
        Self {
            depth: depth.max(1),
            book: None,
            rng,
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = Some(book);
        self
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Picks a move for the side to move, or `None` when the game is over.
    pub fn choose_move(&mut self, game: &Game) -> Option<Move> {
        if game.game_ended() {
            return None;
        }
        let color = game.to_move();
        debug!("searching a move for {color} at depth {}", self.depth);
        let started = Instant::now();

        let mut chosen = None;
        if let Some(book) = &self.book {
            chosen = book.probe(game, &mut self.rng);
        }
        let from_book = chosen.is_some();
        if chosen.is_none() {
            chosen = alpha_beta(game, color, self.depth, &mut self.rng).0;
        }

        if let Some(mv) = chosen {
            debug!(
                "{color} plays {mv} in {:.3?} ({}, eval {} -> {})",
                started.elapsed(),
                if from_book { "book" } else { "search" },
                evaluate_game(game),
                evaluate_game(&game.make_move(mv)),
            );
        }
        chosen
    }
}

impl Default for ChessAi<StdRng> {
    fn default() -> Self {
        ChessAi::new(DEFAULT_DEPTH)
    }
}

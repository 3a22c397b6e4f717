use thiserror::Error;

use crate::moves::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
    #[error("invalid move notation: {0:?}")]
    InvalidMove(String),
    #[error("illegal move {0}")]
    IllegalMove(Move),
}

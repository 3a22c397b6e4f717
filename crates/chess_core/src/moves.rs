use std::fmt;

use crate::error::ChessError;
use crate::game::Game;
use crate::piece::{Color, PieceType};
use crate::square::Square;

/// An origin/destination pair. Promotion and castling carry no side data
/// here: a promotion push always queens, and castling is the two-file king
/// move; move application fills in the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Parses coordinate notation such as `e2e4`.
    pub fn from_coordinate(notation: &str) -> Result<Move, ChessError> {
        if notation.len() != 4 || !notation.is_ascii() {
            return Err(ChessError::InvalidMove(notation.to_string()));
        }
        let from = Square::from_algebraic(&notation[..2])
            .map_err(|_| ChessError::InvalidMove(notation.to_string()))?;
        let to = Square::from_algebraic(&notation[2..])
            .map_err(|_| ChessError::InvalidMove(notation.to_string()))?;
        Ok(Move::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Every move of `color` that follows the movement rules, before the
/// own-king-safety filter. Generation order is fixed: squares ascending,
/// then the per-piece order below.
pub(crate) fn pseudo_legal_moves(game: &Game, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in Square::all() {
        let Some(piece) = game.board().piece_at(from) else {
            continue;
        };
        if piece.color != color {
            continue;
        }
        match piece.piece_type {
            PieceType::Pawn => pawn_moves(game, from, color, &mut moves),
            PieceType::Knight => leaper_moves(game, from, color, &KNIGHT_JUMPS, &mut moves),
            PieceType::Bishop => slider_moves(game, from, color, &BISHOP_DIRECTIONS, &mut moves),
            PieceType::Rook => slider_moves(game, from, color, &ROOK_DIRECTIONS, &mut moves),
            PieceType::Queen => {
                slider_moves(game, from, color, &ROOK_DIRECTIONS, &mut moves);
                slider_moves(game, from, color, &BISHOP_DIRECTIONS, &mut moves);
            }
            PieceType::King => {
                leaper_moves(game, from, color, &KING_STEPS, &mut moves);
                castling_moves(game, from, color, &mut moves);
            }
        }
    }
    moves
}

fn pawn_moves(game: &Game, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = game.board();
    let (direction, start_rank) = match color {
        Color::White => (1, 1),
        Color::Black => (-1, 6),
    };

    if let Some(to) = from.offset(0, direction) {
        if board.piece_at(to).is_none() {
            moves.push(Move::new(from, to));
            if from.rank() == start_rank {
                let double = from.offset(0, 2 * direction).unwrap();
                if board.piece_at(double).is_none() {
                    moves.push(Move::new(from, double));
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(to) = from.offset(file_delta, direction) else {
            continue;
        };
        let captures_enemy = board
            .piece_at(to)
            .map_or(false, |target| target.color != color);
        if captures_enemy || game.en_passant_square() == Some(to) {
            moves.push(Move::new(from, to));
        }
    }
}

fn leaper_moves(
    game: &Game,
    from: Square,
    color: Color,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_delta, rank_delta) in steps {
        let Some(to) = from.offset(file_delta, rank_delta) else {
            continue;
        };
        match game.board().piece_at(to) {
            Some(target) if target.color == color => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}

fn slider_moves(
    game: &Game,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(file_delta, rank_delta) in directions {
        let mut current = from;
        while let Some(to) = current.offset(file_delta, rank_delta) {
            match game.board().piece_at(to) {
                None => moves.push(Move::new(from, to)),
                Some(target) => {
                    if target.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// King-side then queen-side. The king must stand on its home square, hold
/// the right, and neither start in check nor cross an attacked square.
fn castling_moves(game: &Game, from: Square, color: Color, moves: &mut Vec<Move>) {
    let home_rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    if from != Square::from_file_rank(4, home_rank) {
        return;
    }
    let board = game.board();
    let enemy = color.opposing();
    if board.is_square_attacked(from, enemy) {
        return;
    }

    if game.castling_rights().kingside(color) {
        let crossed = [
            Square::from_file_rank(5, home_rank),
            Square::from_file_rank(6, home_rank),
        ];
        if crossed.iter().all(|&sq| {
            board.piece_at(sq).is_none() && !board.is_square_attacked(sq, enemy)
        }) {
            moves.push(Move::new(from, crossed[1]));
        }
    }

    if game.castling_rights().queenside(color) {
        let empty = [
            Square::from_file_rank(1, home_rank),
            Square::from_file_rank(2, home_rank),
            Square::from_file_rank(3, home_rank),
        ];
        let crossed = [
            Square::from_file_rank(2, home_rank),
            Square::from_file_rank(3, home_rank),
        ];
        if empty.iter().all(|&sq| board.piece_at(sq).is_none())
            && crossed.iter().all(|&sq| !board.is_square_attacked(sq, enemy))
        {
            moves.push(Move::new(from, empty[1]));
        }
    }
}

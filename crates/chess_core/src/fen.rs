//! Forsyth-Edwards Notation for game states.

use crate::board::Board;
use crate::error::ChessError;
use crate::game::{CastlingRights, Game};
use crate::piece::{Color, Piece};
use crate::square::Square;

/// The standard starting position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Game {
    pub fn from_fen(fen: &str) -> Result<Game, ChessError> {
        let bad = || ChessError::InvalidFen(fen.to_string());
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, side, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(bad());
        };

        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(bad());
        }
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or_else(bad)?;
                    if file >= 8 {
                        return Err(bad());
                    }
                    board.set(Square::from_file_rank(file, rank), Some(piece));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(bad());
            }
        }

        let to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(bad()),
        };

        let mut rights = CastlingRights::none();
        if castling != "-" {
            for c in castling.chars() {
                match c {
                    'K' => rights.white_kingside = true,
                    'Q' => rights.white_queenside = true,
                    'k' => rights.black_kingside = true,
                    'q' => rights.black_queenside = true,
                    _ => return Err(bad()),
                }
            }
        }

        let en_passant = match en_passant {
            "-" => None,
            sq => Some(Square::from_algebraic(sq).map_err(|_| bad())?),
        };

        let halfmove_clock: u32 = halfmove.parse().map_err(|_| bad())?;
        let fullmove_number: u32 = fullmove.parse().map_err(|_| bad())?;
        if fullmove_number == 0 {
            return Err(bad());
        }

        Ok(Game::from_parts(
            board,
            to_move,
            rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board().piece_at(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights = self.castling_rights();
        if *rights == CastlingRights::none() {
            fen.push('-');
        } else {
            if rights.white_kingside {
                fen.push('K');
            }
            if rights.white_queenside {
                fen.push('Q');
            }
            if rights.black_kingside {
                fen.push('k');
            }
            if rights.black_queenside {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_square() {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    #[test]
    fn initial_position_round_trips() {
        assert_eq!(Game::new().to_fen(), INITIAL_FEN);
        assert_eq!(Game::from_fen(INITIAL_FEN).unwrap().to_fen(), INITIAL_FEN);
    }

    #[test]
    fn fen_tracks_played_moves() {
        let game = Game::new().make_move(Move::from_coordinate("e2e4").unwrap());
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn malformed_fens_are_rejected() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
        ] {
            assert!(Game::from_fen(fen).is_err(), "accepted {fen:?}");
        }
    }

    #[test]
    fn parsed_games_seed_their_history() {
        let fen = "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1";
        let game = Game::from_fen(fen).unwrap();
        assert_eq!(game.position_history(), [fen.to_string()]);
        assert!(game.move_list().is_empty());
    }
}

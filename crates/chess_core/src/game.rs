use log::debug;

use crate::board::Board;
use crate::error::ChessError;
use crate::moves::{pseudo_legal_moves, Move};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook home corner, for moves that leave it
    /// or captures that land on it.
    fn clear_corner(&mut self, square: Square) {
        match square.index() {
            0 => self.white_queenside = false,
            7 => self.white_kingside = false,
            56 => self.black_queenside = false,
            63 => self.black_kingside = false,
            _ => {}
        }
    }
}

/// A full game state. Values are immutable from the caller's point of view:
/// applying a move yields a fresh `Game`, so search branches never alias.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    move_history: Vec<Move>,
    position_history: Vec<String>,
}

impl Game {
    pub fn new() -> Self {
        let mut game = Self {
            board: Board::initial(),
            to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            move_history: Vec::new(),
            position_history: Vec::new(),
        };
        game.position_history.push(game.to_fen());
        game
    }

    pub(crate) fn from_parts(
        board: Board,
        to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut game = Self {
            board,
            to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            move_history: Vec::new(),
            position_history: Vec::new(),
        };
        game.position_history.push(game.to_fen());
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    /// FEN of every position reached, starting position first.
    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    /// The moves played so far in coordinate notation, space-joined.
    /// This is the opening-book probe key.
    pub fn move_list(&self) -> String {
        self.move_history
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Every legal move of `color`, in a deterministic order.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        pseudo_legal_moves(self, color)
            .into_iter()
            .filter(|&mv| !self.make_move(mv).is_check(color))
            .collect()
    }

    /// Applies a legal move, returning the resulting game. The move is not
    /// re-validated; feed it only moves from `legal_moves`. Promotions
    /// always queen, castling is recognized by the two-file king step.
    pub fn make_move(&self, mv: Move) -> Game {
        let mut next = self.clone();
        next.apply(mv);
        next
    }

    /// Validated variant for outside input.
    pub fn try_move(&self, mv: Move) -> Result<Game, ChessError> {
        if self.legal_moves(self.to_move).contains(&mv) {
            Ok(self.make_move(mv))
        } else {
            debug!("rejected illegal move {mv} for {}", self.to_move);
            Err(ChessError::IllegalMove(mv))
        }
    }

    fn apply(&mut self, mv: Move) {
        let piece = self
            .board
            .piece_at(mv.from)
            .expect("move origin square is empty");
        let color = piece.color;
        let mut resets_clock = piece.piece_type == PieceType::Pawn;

        // Castling: the rook follows the two-file king step.
        if piece.piece_type == PieceType::King
            && (mv.to.file() as i8 - mv.from.file() as i8).abs() == 2
        {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() == 6 {
                (Square::from_file_rank(7, rank), Square::from_file_rank(5, rank))
            } else {
                (Square::from_file_rank(0, rank), Square::from_file_rank(3, rank))
            };
            let rook = self.board.piece_at(rook_from);
            self.board.set(rook_from, None);
            self.board.set(rook_to, rook);
        }

        // En passant: the captured pawn is beside the destination.
        if piece.piece_type == PieceType::Pawn
            && Some(mv.to) == self.en_passant
            && mv.to.file() != mv.from.file()
        {
            let captured = Square::from_file_rank(mv.to.file(), mv.from.rank());
            self.board.set(captured, None);
            resets_clock = true;
        }

        if self.board.piece_at(mv.to).is_some() {
            resets_clock = true;
        }

        let promotion_rank = match color {
            Color::White => 7,
            Color::Black => 0,
        };
        let placed = if piece.piece_type == PieceType::Pawn && mv.to.rank() == promotion_rank {
            Piece::new(PieceType::Queen, color)
        } else {
            piece
        };
        self.board.set(mv.from, None);
        self.board.set(mv.to, Some(placed));

        self.en_passant = if piece.piece_type == PieceType::Pawn
            && (mv.to.rank() as i8 - mv.from.rank() as i8).abs() == 2
        {
            Some(Square::from_file_rank(
                mv.from.file(),
                (mv.from.rank() + mv.to.rank()) / 2,
            ))
        } else {
            None
        };

        if piece.piece_type == PieceType::King {
            self.castling.clear(color);
        }
        self.castling.clear_corner(mv.from);
        self.castling.clear_corner(mv.to);

        if self.to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.to_move = self.to_move.opposing();
        self.move_history.push(mv);
        let fen = self.to_fen();
        self.position_history.push(fen);
    }

    pub fn is_check(&self, color: Color) -> bool {
        let king = self
            .board
            .king_square(color)
            .expect("board is missing a king");
        self.board.is_square_attacked(king, color.opposing())
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_check(color) && self.legal_moves(color).is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check(self.to_move) && self.legal_moves(self.to_move).is_empty()
    }

    /// Neither side keeps enough material to mate: bare kings, a lone
    /// minor, or same-colored single bishops.
    pub fn has_insufficient_material(&self) -> bool {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for (sq, piece) in self.board.pieces() {
            if piece.piece_type != PieceType::King {
                match piece.color {
                    Color::White => white.push((sq, piece.piece_type)),
                    Color::Black => black.push((sq, piece.piece_type)),
                }
            }
        }

        match (white.as_slice(), black.as_slice()) {
            ([], []) => true,
            ([(_, lone)], []) | ([], [(_, lone)]) => {
                matches!(lone, PieceType::Bishop | PieceType::Knight)
            }
            ([(white_sq, PieceType::Bishop)], [(black_sq, PieceType::Bishop)]) => {
                (white_sq.file() + white_sq.rank()) % 2 == (black_sq.file() + black_sq.rank()) % 2
            }
            _ => false,
        }
    }

    /// The no-progress draw: 150 halfmoves (75 moves by each side) without
    /// a pawn move or capture.
    pub fn is_seventy_five_move_draw(&self) -> bool {
        self.halfmove_clock >= 150
    }

    pub fn game_ended(&self) -> bool {
        self.is_checkmate(self.to_move)
            || self.is_stalemate()
            || self.has_insufficient_material()
            || self.is_seventy_five_move_draw()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::INITIAL_FEN;

    fn mv(notation: &str) -> Move {
        Move::from_coordinate(notation).unwrap()
    }

    fn play(game: Game, moves: &[&str]) -> Game {
        moves
            .iter()
            .fold(game, |game, &m| game.try_move(mv(m)).unwrap())
    }

    #[test]
    fn twenty_legal_moves_at_start() {
        let game = Game::new();
        assert_eq!(game.legal_moves(Color::White).len(), 20);
        assert_eq!(game.legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn make_move_is_pure_and_flips_turn() {
        let game = Game::new();
        let next = game.make_move(mv("e2e4"));
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(next.to_move(), Color::Black);
        assert!(game.board().piece_at(Square::from_algebraic("e4").unwrap()).is_none());
        assert!(next.board().piece_at(Square::from_algebraic("e4").unwrap()).is_some());
        assert_eq!(next.move_list(), "e2e4");
        assert_eq!(next.position_history().len(), 2);
        assert_eq!(next.position_history()[0], INITIAL_FEN);
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let game = Game::new();
        assert!(matches!(
            game.try_move(mv("e2e5")),
            Err(ChessError::IllegalMove(_))
        ));
        assert!(game.try_move(mv("e2e4")).is_ok());
    }

    #[test]
    fn en_passant_capture_removes_the_pawn() {
        let game = play(Game::new(), &["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert_eq!(
            game.en_passant_square(),
            Some(Square::from_algebraic("d6").unwrap())
        );
        let after = game.try_move(mv("e5d6")).unwrap();
        assert!(after
            .board()
            .piece_at(Square::from_algebraic("d5").unwrap())
            .is_none());
        assert_eq!(after.halfmove_clock(), 0);
    }

    #[test]
    fn kingside_castling_moves_the_rook() {
        let game = play(
            Game::new(),
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"],
        );
        let castled = game.try_move(mv("e1g1")).unwrap();
        let rook = castled
            .board()
            .piece_at(Square::from_algebraic("f1").unwrap())
            .unwrap();
        assert_eq!(rook.piece_type, PieceType::Rook);
        assert!(!castled.castling_rights().kingside(Color::White));
        assert!(!castled.castling_rights().queenside(Color::White));
    }

    #[test]
    fn castling_rights_fall_with_rook_moves() {
        let game = play(Game::new(), &["h2h4", "a7a5", "h1h3", "a8a6"]);
        assert!(!game.castling_rights().kingside(Color::White));
        assert!(game.castling_rights().queenside(Color::White));
        assert!(!game.castling_rights().queenside(Color::Black));
        assert!(game.castling_rights().kingside(Color::Black));
    }

    #[test]
    fn promotion_queens_automatically() {
        let game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let after = game.try_move(mv("a7a8")).unwrap();
        assert_eq!(
            after.board().piece_at(Square::from_algebraic("a8").unwrap()),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let game = play(Game::new(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_check(Color::White));
        assert!(game.is_checkmate(Color::White));
        assert!(game.game_ended());
        assert!(!game.is_stalemate());
    }

    #[test]
    fn stalemate_is_detected() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!game.is_check(Color::Black));
        assert!(game.is_stalemate());
        assert!(game.game_ended());
    }

    #[test]
    fn insufficient_material_is_a_draw() {
        for fen in [
            "8/8/8/4k3/8/4K3/8/8 w - - 0 1",
            "8/8/8/4k3/8/3BK3/8/8 w - - 0 1",
            "8/8/8/4k3/8/3NK3/8/8 b - - 0 1",
            // Bishops on same-colored squares.
            "4k3/6b1/8/8/8/8/1B6/4K3 w - - 0 1",
        ] {
            let game = Game::from_fen(fen).unwrap();
            assert!(game.has_insufficient_material(), "{fen}");
            assert!(game.game_ended(), "{fen}");
        }
        // Opposite-colored bishops can still mate with help.
        let game = Game::from_fen("4k1b1/8/8/8/8/8/1B6/4K3 w - - 0 1").unwrap();
        assert!(!game.has_insufficient_material());
    }

    #[test]
    fn seventy_five_move_clock_ends_the_game() {
        let game = Game::from_fen("8/8/8/4k3/8/8/3R4/4K3 w - - 149 100").unwrap();
        assert!(!game.is_seventy_five_move_draw());
        let after = game.try_move(mv("d2c2")).unwrap();
        assert!(after.is_seventy_five_move_draw());
        assert!(after.game_ended());
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_moves_and_captures() {
        let game = play(Game::new(), &["g1f3", "b8c6"]);
        assert_eq!(game.halfmove_clock(), 2);
        let game = game.try_move(mv("e2e4")).unwrap();
        assert_eq!(game.halfmove_clock(), 0);
    }
}

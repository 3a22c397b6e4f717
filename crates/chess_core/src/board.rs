use std::fmt;

use crate::piece::{Color, Piece, PieceType};
use crate::square::{file_mask, Square};

/// Piece placement: 64 squares in little-endian rank-file order, plus a
/// derived one-bit-per-square view used by the positional predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// The standard starting placement.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, &piece_type) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.set(
                Square::from_file_rank(file, 0),
                Some(Piece::new(piece_type, Color::White)),
            );
            board.set(
                Square::from_file_rank(file, 1),
                Some(Piece::new(PieceType::Pawn, Color::White)),
            );
            board.set(
                Square::from_file_rank(file, 6),
                Some(Piece::new(PieceType::Pawn, Color::Black)),
            );
            board.set(
                Square::from_file_rank(file, 7),
                Some(Piece::new(piece_type, Color::Black)),
            );
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Bit mask of every occupied square.
    pub fn occupied(&self) -> u64 {
        self.pieces().fold(0, |mask, (sq, _)| mask | sq.bit())
    }

    /// Bit mask of the squares holding `color` pieces of `piece_type`.
    pub fn piece_bits(&self, piece_type: PieceType, color: Color) -> u64 {
        self.pieces()
            .filter(|(_, piece)| piece.piece_type == piece_type && piece.color == color)
            .fold(0, |mask, (sq, _)| mask | sq.bit())
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(sq, _)| sq)
    }

    /// No pawns of either color on the square's file.
    pub fn is_open_file(&self, square: Square) -> bool {
        let pawns = self.piece_bits(PieceType::Pawn, Color::White)
            | self.piece_bits(PieceType::Pawn, Color::Black);
        pawns & file_mask(square.file()) == 0
    }

    /// Only enemy pawns on the square's file. Checked after `is_open_file`,
    /// so the two are mutually exclusive.
    pub fn is_semi_open_file(&self, square: Square, color: Color) -> bool {
        let file = file_mask(square.file());
        self.piece_bits(PieceType::Pawn, color) & file == 0
            && self.piece_bits(PieceType::Pawn, color.opposing()) & file != 0
    }

    /// Low-material classification: no queens at all, or any queen-holding
    /// side reduced to at most one minor piece beyond king and pawns.
    pub fn is_endgame(&self) -> bool {
        [Color::White, Color::Black].iter().all(|&color| {
            let queens = self.piece_bits(PieceType::Queen, color).count_ones();
            if queens == 0 {
                return true;
            }
            let rooks = self.piece_bits(PieceType::Rook, color).count_ones();
            let minors = (self.piece_bits(PieceType::Knight, color)
                | self.piece_bits(PieceType::Bishop, color))
            .count_ones();
            queens == 1 && rooks == 0 && minors <= 1
        })
    }

    /// Whether any piece of `attacker` attacks `square`.
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        // Pawns capture toward their own advance direction.
        let pawn_rank_delta = match attacker {
            Color::White => -1,
            Color::Black => 1,
        };
        for file_delta in [-1, 1] {
            if let Some(from) = square.offset(file_delta, pawn_rank_delta) {
                if self.piece_at(from)
                    == Some(Piece::new(PieceType::Pawn, attacker))
                {
                    return true;
                }
            }
        }

        let jumps = [
            (1, 2),
            (2, 1),
            (2, -1),
            (1, -2),
            (-1, -2),
            (-2, -1),
            (-2, 1),
            (-1, 2),
        ];
        for (file_delta, rank_delta) in jumps {
            if let Some(from) = square.offset(file_delta, rank_delta) {
                if self.piece_at(from)
                    == Some(Piece::new(PieceType::Knight, attacker))
                {
                    return true;
                }
            }
        }

        let steps = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        for (file_delta, rank_delta) in steps {
            if let Some(from) = square.offset(file_delta, rank_delta) {
                if self.piece_at(from)
                    == Some(Piece::new(PieceType::King, attacker))
                {
                    return true;
                }
            }
        }

        // Slider rays: walk each direction to the first piece and match it
        // against the movers of that direction.
        let rays: [((i8, i8), [PieceType; 2]); 8] = [
            ((1, 0), [PieceType::Rook, PieceType::Queen]),
            ((-1, 0), [PieceType::Rook, PieceType::Queen]),
            ((0, 1), [PieceType::Rook, PieceType::Queen]),
            ((0, -1), [PieceType::Rook, PieceType::Queen]),
            ((1, 1), [PieceType::Bishop, PieceType::Queen]),
            ((1, -1), [PieceType::Bishop, PieceType::Queen]),
            ((-1, 1), [PieceType::Bishop, PieceType::Queen]),
            ((-1, -1), [PieceType::Bishop, PieceType::Queen]),
        ];
        for ((file_delta, rank_delta), movers) in rays {
            let mut current = square;
            while let Some(next) = current.offset(file_delta, rank_delta) {
                if let Some(piece) = self.piece_at(next) {
                    if piece.color == attacker && movers.contains(&piece.piece_type) {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }

        false
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let square = Square::from_file_rank(file, rank);
                match self.piece_at(square) {
                    Some(piece) => write!(f, "{} ", piece.fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

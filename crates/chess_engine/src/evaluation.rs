use chess_core::square::RANK_7;
use chess_core::{Board, Color, Game, PieceType};

/// Signed evaluation in centipawns. Positive favors White, negative favors
/// Black, zero is a drawn evaluation.
pub type Score = i32;

// Standard piece values, measured in centipawns (100 = 1 pawn)
const PAWN_VALUE: Score = 100;
const KNIGHT_VALUE: Score = 320;
const BISHOP_VALUE: Score = 330;
const ROOK_VALUE: Score = 500;
const QUEEN_VALUE: Score = 900;
const KING_VALUE: Score = 20_000;

/// Magnitude of a forced-mate score. Ten king values, out of reach of any
/// material plus positional sum.
pub const WIN_SCORE: Score = 10 * KING_VALUE;

const ROOK_OPEN_FILE_BONUS: Score = 15;
const ROOK_SEMI_OPEN_FILE_BONUS: Score = 10;
const ROOK_ON_SEVENTH_BONUS: Score = 20;

// Piece-square tables define bonuses/penalties for piece placement,
// authored from White's perspective and mirrored vertically for Black.
// Flat little-endian rank-file layout: index 0 = a1, each row below is one
// rank from rank 1 up to rank 8.

const PAWN_TABLE: [Score; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    0, 0, 0, 0, 0, 0, 0, 0,
];

const KNIGHT_TABLE: [Score; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_TABLE: [Score; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10, 5, 0, 0, 0, 0, 5, -10, //
    -10, 10, 10, 10, 10, 10, 10, -10, //
    -10, 0, 10, 10, 10, 10, 0, -10, //
    -10, 5, 5, 10, 10, 5, 5, -10, //
    -10, 0, 5, 10, 10, 5, 0, -10, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20,
];

// Shelter first: the castled corners score well, the center is punished.
const KING_TABLE: [Score; 64] = [
    20, 30, 10, 0, 0, 10, 30, 20, //
    20, 20, 0, 0, 0, 0, 20, 20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30,
];

// Once material comes off, the king belongs in the center.
const KING_ENDGAME_TABLE: [Score; 64] = [
    -50, -30, -30, -30, -30, -30, -30, -50, //
    -30, -30, 0, 0, 0, 0, -30, -30, //
    -30, -10, 20, 30, 30, 20, -10, -30, //
    -30, -10, 30, 40, 40, 30, -10, -30, //
    -30, -10, 30, 40, 40, 30, -10, -30, //
    -30, -10, 20, 30, 30, 20, -10, -30, //
    -30, -20, -10, 0, 0, -10, -20, -30, //
    -50, -40, -30, -20, -20, -30, -40, -50,
];

/// Base material value of a piece kind.
pub fn piece_value(piece_type: PieceType) -> Score {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => KING_VALUE,
    }
}

pub fn material_sum(board: &Board, color: Color) -> Score {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .map(|(_, piece)| piece_value(piece.piece_type))
        .sum()
}

pub fn material_balance(board: &Board) -> Score {
    material_sum(board, Color::White) - material_sum(board, Color::Black)
}

/// Location bonuses for one side. Tables and the seventh-rank mask are
/// White-oriented; Black squares are mirrored vertically before lookup.
/// File state is judged on the real file, from the rook owner's side.
pub fn positional_bonus(board: &Board, color: Color) -> Score {
    let mut bonus = 0;
    for (square, piece) in board.pieces() {
        if piece.color != color {
            continue;
        }
        let oriented = match color {
            Color::White => square,
            Color::Black => square.mirror(),
        };
        match piece.piece_type {
            PieceType::Pawn => bonus += PAWN_TABLE[oriented.index()],
            PieceType::Knight => bonus += KNIGHT_TABLE[oriented.index()],
            PieceType::Bishop => bonus += BISHOP_TABLE[oriented.index()],
            PieceType::Rook => {
                if board.is_open_file(square) {
                    bonus += ROOK_OPEN_FILE_BONUS;
                } else if board.is_semi_open_file(square, color) {
                    bonus += ROOK_SEMI_OPEN_FILE_BONUS;
                }
                if oriented.bit() & RANK_7 != 0 {
                    bonus += ROOK_ON_SEVENTH_BONUS;
                }
            }
            PieceType::King => {
                bonus += if board.is_endgame() {
                    KING_ENDGAME_TABLE[oriented.index()]
                } else {
                    KING_TABLE[oriented.index()]
                };
            }
            PieceType::Queen => {}
        }
    }
    bonus
}

pub fn positional_balance(board: &Board) -> Score {
    positional_bonus(board, Color::White) - positional_bonus(board, Color::Black)
}

/// Legal-move-count difference. Tracked for diagnostics only; it does not
/// feed `evaluate_game`.
pub fn mobility_balance(game: &Game) -> Score {
    game.legal_moves(Color::White).len() as Score - game.legal_moves(Color::Black).len() as Score
}

/// The score of an ended game: the mate sentinel for the side that got
/// mated, zero for every drawn ending. Only meaningful when
/// `game.game_ended()` holds.
pub fn evaluate_end_node(game: &Game) -> Score {
    debug_assert!(game.game_ended());
    if game.is_checkmate(game.to_move()) {
        win_score(game.to_move())
    } else {
        0
    }
}

/// The full-board mate sentinel, signed for the winner of a mate against
/// `color`: a checkmated White scores -WIN_SCORE, a checkmated Black
/// +WIN_SCORE.
pub fn win_score(color: Color) -> Score {
    match color {
        Color::White => -WIN_SCORE,
        Color::Black => WIN_SCORE,
    }
}

/// Static evaluation: terminal outcome when the game is over, otherwise
/// material plus positional balance.
pub fn evaluate_game(game: &Game) -> Score {
    if game.game_ended() {
        evaluate_end_node(game)
    } else {
        material_balance(game.board()) + positional_balance(game.board())
    }
}

pub mod ai;
pub mod evaluation;
pub mod opening_book;
pub mod search;

pub use ai::ChessAi;
pub use evaluation::{evaluate_game, win_score, Score};
pub use opening_book::{BookError, OpeningBook};
pub use search::{alpha_beta, evaluated_move, minimax};

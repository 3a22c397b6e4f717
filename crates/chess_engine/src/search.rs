use chess_core::{Color, Game, Move};
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::{evaluate_end_node, evaluate_game, win_score, Score};

// Initial bound window for the pruned search.
const ALPHA_INIT: Score = -Score::MAX;
const BETA_INIT: Score = Score::MAX;

/// Search strategy: full-width, or branch-and-bound with a `[alpha, beta]`
/// window. The window travels by value; sibling branches never share it.
#[derive(Clone, Copy)]
enum Window {
    Full,
    Bounded { alpha: Score, beta: Score },
}

fn improves(color: Color, score: Score, best: Score) -> bool {
    match color {
        Color::White => score > best,
        Color::Black => score < best,
    }
}

/// Ranks every legal move of `color` by the static evaluation of the
/// position it reaches, one ply deep. Returns a uniformly random choice
/// among the best-scoring moves, except that a move delivering mate is
/// returned the moment it is seen.
///
/// Repeated calls on the same position may return different, equally good
/// moves; that variety is intended.
pub fn evaluated_move<R: Rng>(game: &Game, color: Color, rng: &mut R) -> (Move, Score) {
    // Seeded with the worst outcome for `color`, so any real evaluation
    // supersedes it.
    let mut best_score = win_score(color);
    let mut best_moves: Vec<Move> = Vec::new();

    for mv in game.legal_moves(color) {
        let reached = game.make_move(mv);
        let evaluation = evaluate_game(&reached);

        if reached.is_checkmate(reached.to_move()) {
            return (mv, evaluation);
        }

        if improves(color, evaluation, best_score) {
            best_score = evaluation;
            best_moves.clear();
            best_moves.push(mv);
        } else if evaluation == best_score {
            best_moves.push(mv);
        }
    }

    let chosen = best_moves
        .choose(rng)
        .copied()
        .expect("rules engine yielded no legal moves for a live position");
    (chosen, best_score)
}

/// Full-width depth-limited search.
pub fn minimax<R: Rng>(
    game: &Game,
    color: Color,
    depth: u8,
    rng: &mut R,
) -> (Option<Move>, Score) {
    search_node(game, color, depth, Window::Full, rng)
}

/// The production search: same result as `minimax` at equal depth, with
/// branches that cannot affect it cut away.
pub fn alpha_beta<R: Rng>(
    game: &Game,
    color: Color,
    depth: u8,
    rng: &mut R,
) -> (Option<Move>, Score) {
    search_node(
        game,
        color,
        depth,
        Window::Bounded {
            alpha: ALPHA_INIT,
            beta: BETA_INIT,
        },
        rng,
    )
}

/// Shared recursion for both strategies. Base cases: an ended game scores
/// itself, and depth 1 (or a mate-in-one found by the single-ply ranker)
/// returns the single-ply result.
fn search_node<R: Rng>(
    game: &Game,
    color: Color,
    depth: u8,
    window: Window,
    rng: &mut R,
) -> (Option<Move>, Score) {
    if game.game_ended() {
        return (None, evaluate_end_node(game));
    }

    let (simple_move, simple_score) = evaluated_move(game, color, rng);
    if depth <= 1 || simple_score == win_score(color.opposing()) {
        return (Some(simple_move), simple_score);
    }

    match window {
        Window::Full => full_width_node(game, color, depth, rng),
        Window::Bounded { alpha, beta } => bounded_node(game, color, depth, alpha, beta, rng),
    }
}

fn full_width_node<R: Rng>(
    game: &Game,
    color: Color,
    depth: u8,
    rng: &mut R,
) -> (Option<Move>, Score) {
    let mut best_score = win_score(color);
    let mut best_moves: Vec<Move> = Vec::new();

    for mv in game.legal_moves(color) {
        let reached = game.make_move(mv);
        let (_, score) = search_node(&reached, color.opposing(), depth - 1, Window::Full, rng);

        // A forced mate of the opponent cannot be beaten; stop here.
        if score == win_score(color.opposing()) {
            return (Some(mv), score);
        }

        if improves(color, score, best_score) {
            best_score = score;
            best_moves.clear();
            best_moves.push(mv);
        } else if score == best_score {
            best_moves.push(mv);
        }
    }

    let chosen = best_moves
        .choose(rng)
        .copied()
        .expect("rules engine yielded no legal moves for a live position");
    (Some(chosen), best_score)
}

fn bounded_node<R: Rng>(
    game: &Game,
    color: Color,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    rng: &mut R,
) -> (Option<Move>, Score) {
    let mut best_moves: Vec<Move> = Vec::new();

    for mv in game.legal_moves(color) {
        trace!("depth {depth}: evaluating {mv} [{alpha},{beta}]");
        let reached = game.make_move(mv);
        let (_, score) = search_node(
            &reached,
            color.opposing(),
            depth - 1,
            Window::Bounded { alpha, beta },
            rng,
        );
        trace!("depth {depth}: {mv} scored {score} [{alpha},{beta}]");

        if score == win_score(color.opposing()) {
            return (Some(mv), score);
        }

        // White raises alpha, Black lowers beta; a score that ties the
        // bound joins the tie set, a strict improvement replaces it.
        {
            let bound = match color {
                Color::White => &mut alpha,
                Color::Black => &mut beta,
            };
            if score == *bound {
                best_moves.push(mv);
                continue;
            }
            if !improves(color, score, *bound) {
                continue;
            }
            *bound = score;
            best_moves.clear();
            best_moves.push(mv);
        }
        if alpha > beta {
            trace!("depth {depth}: cutoff [{alpha},{beta}]");
            break;
        }
    }

    let bound = match color {
        Color::White => alpha,
        Color::Black => beta,
    };
    // Empty when no move improved the inherited bound; the caller prunes
    // this branch on the returned bound alone.
    match best_moves.choose(rng) {
        Some(&mv) => (Some(mv), bound),
        None => (None, bound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::WIN_SCORE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn game(fen: &str) -> Game {
        Game::from_fen(fen).unwrap()
    }

    const WHITE_MATES_IN_ONE: &str = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    const BLACK_MATES_IN_ONE: &str = "r5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1";

    #[test]
    fn ranker_finds_mate_in_one() {
        let game = game(WHITE_MATES_IN_ONE);
        for seed in 0..8 {
            let (mv, score) = evaluated_move(&game, Color::White, &mut rng(seed));
            assert_eq!(mv.to_string(), "a1a8");
            assert_eq!(score, win_score(Color::Black));
        }
    }

    #[test]
    fn ranker_tie_break_is_valid_and_varied() {
        let start = Game::new();
        let mut seen = HashSet::new();
        for seed in 0..64 {
            let (mv, score) = evaluated_move(&start, Color::White, &mut rng(seed));
            // The claimed score must be reproducible from the move itself.
            assert_eq!(evaluate_game(&start.make_move(mv)), score);
            assert_eq!(score, 50);
            seen.insert(mv.to_string());
        }
        // Knight development to c3 and f3 tie for the best static score.
        let expected: HashSet<String> = ["b1c3".into(), "g1f3".into()].into();
        assert_eq!(seen, expected);
    }

    #[test]
    fn black_minimizes() {
        let start = Game::new().make_move(Move::from_coordinate("e2e4").unwrap());
        let (mv, score) = evaluated_move(&start, Color::Black, &mut rng(3));
        assert_eq!(evaluate_game(&start.make_move(mv)), score);
        // Black's best replies mirror White's: 40 - 50.
        assert_eq!(score, -10);
    }

    #[test]
    fn searches_return_the_mating_move_at_any_depth() {
        for fen in [WHITE_MATES_IN_ONE, BLACK_MATES_IN_ONE] {
            let game = game(fen);
            let color = game.to_move();
            let sentinel = win_score(color.opposing());
            for depth in 1..=3 {
                let (mv, score) = minimax(&game, color, depth, &mut rng(depth as u64));
                assert_eq!(score, sentinel, "minimax depth {depth} on {fen}");
                let mated = game.make_move(mv.unwrap());
                assert!(mated.is_checkmate(mated.to_move()));

                let (mv, score) = alpha_beta(&game, color, depth, &mut rng(depth as u64));
                assert_eq!(score, sentinel, "alpha_beta depth {depth} on {fen}");
                let mated = game.make_move(mv.unwrap());
                assert!(mated.is_checkmate(mated.to_move()));
            }
        }
    }

    #[test]
    fn searches_on_ended_games_return_no_move() {
        let mated = game("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let (mv, score) = minimax(&mated, Color::White, 2, &mut rng(0));
        assert_eq!(mv, None);
        assert_eq!(score, -WIN_SCORE);

        let stalemate = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let (mv, score) = alpha_beta(&stalemate, Color::Black, 2, &mut rng(0));
        assert_eq!(mv, None);
        assert_eq!(score, 0);
    }

    #[test]
    fn opening_search_is_level_at_depth_two() {
        let start = Game::new();
        let (mv, score) = alpha_beta(&start, Color::White, 2, &mut rng(11));
        assert!(mv.is_some());
        assert_eq!(score, 0);

        let (mv, score) = minimax(&start, Color::White, 2, &mut rng(11));
        assert!(mv.is_some());
        assert_eq!(score, 0);
    }

    #[test]
    fn chosen_moves_are_legal() {
        let game = game("4k3/8/8/8/8/8/PPP5/R3K3 w - - 0 1");
        for seed in 0..4 {
            let (mv, _) = alpha_beta(&game, Color::White, 2, &mut rng(seed));
            assert!(game.legal_moves(Color::White).contains(&mv.unwrap()));
        }
    }
}

//! Console front end: board printing, a human-vs-AI loop and an AI-vs-AI
//! watch mode.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chess_core::{Color, Game, Move};
use chess_engine::{evaluate_game, ChessAi, OpeningBook};
use log::info;

const USAGE: &str = "usage: caissa [options]

options:
    --depth <n>    search depth in plies (default 2)
    --seed <n>     seed the move-selection randomness
    --book <path>  opening book file, one move line per line
    --fen <fen>    start from the given position
    --watch        let the engine play both sides
    --help         print this message";

#[derive(Debug, Default)]
struct CliOptions {
    depth: Option<u8>,
    seed: Option<u64>,
    book: Option<String>,
    fen: Option<String>,
    watch: bool,
    help: bool,
}

impl CliOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<CliOptions, String> {
        let mut options = CliOptions::default();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next().ok_or_else(|| format!("{name} needs a value"))
            };
            match arg.as_str() {
                "--depth" => {
                    options.depth = Some(
                        value("--depth")?
                            .parse()
                            .map_err(|_| "--depth expects a small number".to_string())?,
                    )
                }
                "--seed" => {
                    options.seed = Some(
                        value("--seed")?
                            .parse()
                            .map_err(|_| "--seed expects a number".to_string())?,
                    )
                }
                "--book" => options.book = Some(value("--book")?),
                "--fen" => options.fen = Some(value("--fen")?),
                "--watch" => options.watch = true,
                "--help" | "-h" => options.help = true,
                other => return Err(format!("unknown option {other:?}")),
            }
        }
        Ok(options)
    }

    fn build_ai(&self, seed_offset: u64) -> Result<ChessAi, String> {
        let depth = self.depth.unwrap_or(chess_engine::ai::DEFAULT_DEPTH);
        let mut ai = match self.seed {
            Some(seed) => ChessAi::seeded(depth, seed.wrapping_add(seed_offset)),
            None => ChessAi::new(depth),
        };
        if let Some(path) = &self.book {
            let book = OpeningBook::load(path).map_err(|e| e.to_string())?;
            ai = ai.with_book(book);
        }
        Ok(ai)
    }

    fn initial_game(&self) -> Result<Game, String> {
        match &self.fen {
            Some(fen) => Game::from_fen(fen).map_err(|e| e.to_string()),
            None => Ok(Game::new()),
        }
    }
}

pub fn run() -> ExitCode {
    env_logger::init();
    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let result = if options.watch {
        watch_game(&options)
    } else {
        play_game(&options)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// The engine plays itself until the game ends.
fn watch_game(options: &CliOptions) -> Result<(), String> {
    let mut game = options.initial_game()?;
    let mut white = options.build_ai(0)?;
    let mut black = options.build_ai(1)?;

    loop {
        println!("{}\n", game.board());
        if game.game_ended() {
            break;
        }
        let ai = match game.to_move() {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        let mv = ai
            .choose_move(&game)
            .expect("live game but no move chosen");
        info!("{} plays {mv}", game.to_move());
        game = game.make_move(mv);
    }
    print_outcome(&game);
    Ok(())
}

/// Human plays the starting side to move, the engine answers.
fn play_game(options: &CliOptions) -> Result<(), String> {
    let mut game = options.initial_game()?;
    let mut ai = options.build_ai(0)?;
    let human = game.to_move();
    let stdin = io::stdin();

    loop {
        println!("{}\n", game.board());
        if game.game_ended() {
            break;
        }

        if game.to_move() == human {
            let Some(mv) = prompt_move(&stdin)? else {
                println!("goodbye");
                return Ok(());
            };
            match game.try_move(mv) {
                Ok(next) => game = next,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            }
        } else {
            let mv = ai
                .choose_move(&game)
                .expect("live game but no move chosen");
            let next = game.make_move(mv);
            println!("engine plays {mv} (eval {})", evaluate_game(&next));
            game = next;
        }
    }
    print_outcome(&game);
    Ok(())
}

/// Reads one coordinate move, `None` on quit or end of input.
fn prompt_move(stdin: &io::Stdin) -> Result<Option<Move>, String> {
    loop {
        print!("your move (e.g. e2e4, or quit): ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        if read == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        match Move::from_coordinate(line) {
            Ok(mv) => return Ok(Some(mv)),
            Err(err) => println!("{err}"),
        }
    }
}

fn print_outcome(game: &Game) {
    if game.is_checkmate(game.to_move()) {
        println!("checkmate, {} wins", game.to_move().opposing());
    } else if game.is_stalemate() {
        println!("draw by stalemate");
    } else if game.has_insufficient_material() {
        println!("draw by insufficient material");
    } else if game.is_seventy_five_move_draw() {
        println!("draw by the seventy-five move rule");
    } else {
        println!("game in progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions, String> {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_options() {
        let options = parse(&[
            "--depth", "3", "--seed", "7", "--book", "book.txt", "--watch",
        ])
        .unwrap();
        assert_eq!(options.depth, Some(3));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.book.as_deref(), Some("book.txt"));
        assert!(options.watch);
    }

    #[test]
    fn rejects_unknown_and_valueless_options() {
        assert!(parse(&["--nope"]).is_err());
        assert!(parse(&["--depth"]).is_err());
        assert!(parse(&["--depth", "many"]).is_err());
    }

    #[test]
    fn builds_a_game_from_fen() {
        let options = parse(&["--fen", "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"]).unwrap();
        let game = options.initial_game().unwrap();
        assert_eq!(game.to_move(), Color::White);
        assert!(parse(&["--fen", "nonsense"])
            .unwrap()
            .initial_game()
            .is_err());
    }
}

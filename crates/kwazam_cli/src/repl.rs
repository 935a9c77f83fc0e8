//! Line-based play loop.
//!
//! Both players share one prompt. Each line is either a cell (a click) or a
//! command; game events reported by listeners are printed after the line is
//! handled.

use crate::render::{self, View};
use crate::rules::RULES;
use derive_more::Display;
use kwazam::{Coord, Game, GameEvent, GameState, Interaction, Player, TurnOutcome};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Click on a cell.
    Click(Coord),
    /// Show destinations of the selected piece.
    Moves,
    /// Redraw the board.
    Board,
    /// Print the move history.
    History,
    /// Save under a name in the save directory.
    Save(String),
    /// Load a save file.
    Load(PathBuf),
    /// Start over.
    Restart,
    /// Print the rules.
    Rules,
    /// List commands.
    Help,
    /// Leave the game.
    Quit,
}

/// Error for a prompt line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CommandError {
    /// Neither a cell nor a known command.
    #[display("Unknown command {:?}. Type `help` for a list.", _0)]
    Unknown(String),
    /// A known command with missing arguments.
    #[display("Usage: {}", _0)]
    Usage(&'static str),
}

impl std::error::Error for CommandError {}

impl ReplCommand {
    /// Parses a prompt line. Blank lines give `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "moves" => Self::Moves,
            "board" => Self::Board,
            "history" => Self::History,
            "restart" => Self::Restart,
            "rules" => Self::Rules,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "save" if rest.is_empty() => return Err(CommandError::Usage("save <name>")),
            "save" => Self::Save(rest.to_string()),
            "load" if rest.is_empty() => return Err(CommandError::Usage("load <path>")),
            "load" => Self::Load(PathBuf::from(rest)),
            _ => match word.parse::<Coord>() {
                Ok(at) if rest.is_empty() => Self::Click(at),
                _ => return Err(CommandError::Unknown(line.to_string())),
            },
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
Commands:
  <cell>         select a piece, or move/capture with the selected one (e.g. B8)
  moves          highlight where the selected piece can go
  board          redraw the board
  history        list the moves played
  save <name>    save into the save directory
  load <path>    load a save file
  restart        start a new game
  rules          show the piece rules
  quit           leave
";

/// Interactive session over any line source and sink.
pub struct Repl<R, W> {
    game: Game,
    input: R,
    output: W,
    flip_board: bool,
    messages: Rc<RefCell<Vec<String>>>,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Wraps `game`, printing game events as they happen.
    pub fn new(mut game: Game, input: R, output: W, flip_board: bool) -> Self {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        game.subscribe(move |event: &GameEvent, state: &GameState| {
            if let Some(message) = describe(event, state) {
                sink.borrow_mut().push(message);
            }
        });
        Self {
            game,
            input,
            output,
            flip_board,
            messages,
        }
    }

    /// Runs until `quit` or end of input.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!("Starting play loop");
        self.print_board(Vec::new())?;
        let mut line = String::new();
        loop {
            write!(self.output, "{}> ", self.prompt())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            match ReplCommand::parse(&line) {
                Ok(None) => {}
                Ok(Some(ReplCommand::Quit)) => break,
                Ok(Some(command)) => self.execute(command)?,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
        info!("Play loop finished");
        Ok(())
    }

    fn prompt(&self) -> String {
        let state = self.game.state();
        if state.is_game_ended() {
            "game over".to_string()
        } else {
            match self.game.selected() {
                Some(piece) => format!("{} {} {}", state.player_turn(), piece.kind(), piece.position()),
                None => state.player_turn().to_string(),
            }
        }
    }

    /// Handles one command.
    #[instrument(skip(self))]
    pub fn execute(&mut self, command: ReplCommand) -> anyhow::Result<()> {
        match command {
            ReplCommand::Click(at) => self.click(at)?,
            ReplCommand::Moves => {
                if self.game.selected().is_none() {
                    writeln!(self.output, "Select a piece first.")?;
                } else {
                    let moves = self.game.selected_moves();
                    if moves.is_empty() {
                        writeln!(self.output, "That piece cannot move.")?;
                    }
                    self.print_board(moves)?;
                }
            }
            ReplCommand::Board => self.print_board(Vec::new())?,
            ReplCommand::History => write!(self.output, "{}", render::history(self.game.state()))?,
            ReplCommand::Save(name) => match self.game.save(&name) {
                Ok(path) => writeln!(self.output, "Saved to {}", path.display())?,
                Err(e) => {
                    warn!(error = %e, "Save failed");
                    writeln!(self.output, "Could not save: {}", e.message)?;
                }
            },
            ReplCommand::Load(path) => match self.game.load(&path) {
                Ok(()) => {
                    self.flush_messages()?;
                    self.print_board(Vec::new())?;
                }
                Err(e) => {
                    warn!(error = %e, "Load failed");
                    writeln!(self.output, "Could not load: {}", e.message)?;
                }
            },
            ReplCommand::Restart => {
                self.game.restart();
                self.flush_messages()?;
                self.print_board(Vec::new())?;
            }
            ReplCommand::Rules => write!(self.output, "{}", RULES)?,
            ReplCommand::Help => write!(self.output, "{}", HELP)?,
            ReplCommand::Quit => {}
        }
        Ok(())
    }

    fn click(&mut self, at: Coord) -> anyhow::Result<()> {
        let interaction = self.game.interact(at);
        debug!(?interaction, "Click handled");
        match interaction {
            Interaction::Ignored if self.game.state().is_game_ended() => {
                writeln!(self.output, "{}", render::status(self.game.state()))?;
            }
            Interaction::Ignored => {
                writeln!(
                    self.output,
                    "Select one of {}'s pieces.",
                    self.game.state().player_turn()
                )?;
            }
            Interaction::Selected(_) | Interaction::Reselected(_) => {
                let moves = self.game.selected_moves();
                self.print_board(moves)?;
            }
            Interaction::Moved(_) | Interaction::Captured(_) => {
                self.flush_messages()?;
                self.print_board(Vec::new())?;
            }
            Interaction::InvalidMove(e) | Interaction::InvalidCapture(e) => {
                writeln!(self.output, "{}", e)?;
            }
        }
        Ok(())
    }

    fn flush_messages(&mut self) -> anyhow::Result<()> {
        let messages: Vec<String> = self.messages.borrow_mut().drain(..).collect();
        for message in messages {
            writeln!(self.output, "{}", message)?;
        }
        Ok(())
    }

    fn print_board(&mut self, highlights: Vec<Coord>) -> anyhow::Result<()> {
        let state = self.game.state();
        let view = View {
            selected: self.game.selected().map(|p| p.position()),
            highlights,
            flipped: self.flip_board && state.player_turn() == Player::P2,
        };
        let text = render::board(state, &view);
        let status = render::status(state);
        write!(self.output, "{}", text)?;
        writeln!(self.output, "{}", status)?;
        Ok(())
    }
}

/// Message printed for a game event, if any.
fn describe(event: &GameEvent, state: &GameState) -> Option<String> {
    match event {
        GameEvent::SelectionChanged(_) => None,
        GameEvent::Moved(ply) | GameEvent::Captured(ply) => {
            let mut message = format!("{}: {}", ply.owner, ply.record);
            if let TurnOutcome::Continued {
                transformed: true, ..
            } = ply.outcome
            {
                message.push_str(&format!(
                    "\nTurn {}: every Tor and Xor has switched.",
                    state.turn_count()
                ));
            }
            Some(message)
        }
        GameEvent::GameEnded { ply, winner } => Some(format!(
            "{}: {}\nSau captured! {} wins.",
            ply.owner, ply.record, winner
        )),
        GameEvent::Restarted => Some("New game.".to_string()),
        GameEvent::Loaded { path } => Some(format!("Loaded {}", path.display())),
    }
}

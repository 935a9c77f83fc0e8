//! Rules text shown by `kwazam rules` and the `rules` prompt command.

/// Short description of the pieces and turn flow.
pub const RULES: &str = "\
Kwazam is played on a board of 5 columns (A-E) and 8 rows (1-8).
P1 starts on rows 7-8 and moves first; P2 starts on rows 1-2.

Pieces (shown as kind letter + player number, e.g. R1, S2):
  Ram (R)  One step forward. On reaching the far edge it turns around.
  Biz (B)  Leaps like a chess knight (3x2 L-shape) and may jump over pieces.
  Tor (T)  Slides any distance along rows and columns.
  Xor (X)  Slides any distance diagonally.
  Sau (S)  One step in any direction. Capturing a Sau wins the game.

Sliders stop before their own pieces and may take the first opposing piece
in their path. Moving onto an opposing piece captures it.

Every two full turns, each Tor becomes a Xor and each Xor becomes a Tor.

At the prompt, type a cell such as B8 to select a piece, then a highlighted
cell to move there. Other commands: moves, board, history, save <name>,
load <path>, restart, rules, help, quit.
";

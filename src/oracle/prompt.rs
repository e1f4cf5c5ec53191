//! Prompt text for generative oracles.

use super::OracleRequest;
use tracing::instrument;

/// System prompt establishing the oracle's role and reply format.
pub fn system_prompt() -> &'static str {
    "You are a grandmaster Omok (Gomoku) player. \
     You answer with a single JSON object and nothing else: \
     {\"row\": <int>, \"col\": <int>, \"reasoning\": <short string>}."
}

/// User prompt describing the position for one request.
#[instrument(skip(request), fields(ticket = %request.ticket))]
pub fn user_prompt(request: &OracleRequest) -> String {
    let size = request.rules.size;
    let me = request.color.symbol();
    let opponent = request.color.opponent().symbol();
    format!(
        "The board size is {size}x{size}.\n\
         Rules: connect {win} or more stones of your color in a row \
         (horizontally, vertically or diagonally) to win.\n\
         {opponent} is your opponent, {me} is you, 0 is an empty cell.\n\n\
         Current board (row 0 at the top, column 0 at the left):\n\
         {grid}\n\n\
         Analyze the board, block your opponent's open threes and fours, \
         and build your own winning lines.\n\
         Return the best coordinates for {me}'s next move as JSON: \
         row and col are integers from 0 to {max}, the cell must be 0.",
        win = request.rules.win_length,
        grid = request.board.to_prompt_grid(),
        max = size.saturating_sub(1),
    )
}

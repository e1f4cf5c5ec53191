//! Cursor movement for keyboard navigation.

use crate::games::omok::Move;
use crossterm::event::KeyCode;

/// Moves cursor based on arrow keys or `hjkl`, staying on a `size`-wide board.
pub fn move_cursor(cursor: Move, key: KeyCode, size: usize) -> Move {
    let last = size.saturating_sub(1);
    match key {
        KeyCode::Left | KeyCode::Char('h') => Move::new(cursor.row, cursor.col.saturating_sub(1)),
        KeyCode::Right | KeyCode::Char('l') => Move::new(cursor.row, (cursor.col + 1).min(last)),
        KeyCode::Up | KeyCode::Char('k') => Move::new(cursor.row.saturating_sub(1), cursor.col),
        KeyCode::Down | KeyCode::Char('j') => Move::new((cursor.row + 1).min(last), cursor.col),
        _ => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_on_board() {
        let corner = Move::new(0, 0);
        assert_eq!(move_cursor(corner, KeyCode::Left, 15), corner);
        assert_eq!(move_cursor(corner, KeyCode::Up, 15), corner);
        assert_eq!(move_cursor(corner, KeyCode::Right, 15), Move::new(0, 1));

        let far = Move::new(14, 14);
        assert_eq!(move_cursor(far, KeyCode::Char('j'), 15), far);
        assert_eq!(move_cursor(far, KeyCode::Char('l'), 15), far);
        assert_eq!(move_cursor(far, KeyCode::Char('k'), 15), Move::new(13, 14));
    }
}

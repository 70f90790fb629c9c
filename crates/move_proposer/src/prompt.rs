use chess_core::Position;

fn banned_list(excluded: &[String]) -> String {
    if excluded.is_empty() {
        "none".to_string()
    } else {
        excluded.join(", ")
    }
}

/// Standing instructions: role, position, banned moves and the output format.
pub fn system_prompt(position: &Position, excluded: &[String]) -> String {
    format!(
        "You are a strong chess player choosing the next move.\n\
         Position (FEN): {position}\n\
         Rules you must follow:\n\
         1. Only play a move that is legal in this position for the side to move.\n\
         2. Never play any of these rejected moves, in any spelling: {banned}.\n\
         3. Prefer, in order: forced mates, winning material, sound positional play.\n\
         4. Answer with the move alone in coordinate form, origin square then \
            destination square, plus a promotion letter when promoting \
            (e2e4, g1f3, e7e8q). No words, no punctuation, no explanation.",
        position = position,
        banned = banned_list(excluded),
    )
}

/// The per-request message carrying the position and exclusions again.
pub fn user_prompt(position: &Position, excluded: &[String]) -> String {
    format!(
        "Position (FEN): {position}. These moves were already rejected this turn: {banned}. \
         Do not propose any of them again, not even a superficial variant such as an \
         added capture marker or check sign. Reply with exactly one legal move as \
         <from><to>[promotion], for example e2e4 or e7e8q.",
        position = position,
        banned = banned_list(excluded),
    )
}

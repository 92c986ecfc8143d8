// Wire text shared by the drivers: prompts, error messages, alert formats, and
// the parsers for the two inbound lines of a session.
//
// The text driver expects the winner as "<name> wins" while the socket driver
// takes the raw message body as the name. The two parsers stay separate so
// that asymmetry is explicit.

/// Asks the user for the number of players.
pub const PLAYER_PROMPT: &str = "Please enter the number of players: ";

/// Sent when the player count is not a number.
pub const BAD_PLAYER_INPUT_ERR_MSG: &str =
    "Bad value received for number of players, please try again with number";

/// Sent when the winner line is not "<name> wins".
pub const BAD_WINNER_INPUT_MSG: &str = "invalid winner input, expect format of 'PlayerName wins'";

const WINS_SUFFIX: &str = " wins";

/// Player count from a text-driver line. Trailing line endings are ignored;
/// anything else that is not a non-negative integer is rejected.
pub fn parse_player_count(line: &str) -> Option<u32> {
    line.trim_end_matches(['\r', '\n']).parse().ok()
}

/// Player count from a socket message. Unparsable input counts as 0.
pub fn parse_socket_player_count(message: &str) -> u32 {
    message.trim().parse().unwrap_or(0)
}

/// Winner from a text-driver line of the form "<name> wins": the text before
/// the first " wins".
pub fn extract_text_winner(line: &str) -> Option<&str> {
    line.split_once(WINS_SUFFIX).map(|(name, _)| name)
}

/// Winner from a socket message: the message body as sent.
pub fn extract_socket_winner(message: &str) -> &str {
    message
}

/// Blind alert as written to a text stream.
pub fn text_blind_alert(amount: u32) -> String {
    format!("Blind is now {amount}\n")
}

/// Blind alert as sent in a socket text frame.
pub fn socket_blind_alert(amount: u32) -> String {
    amount.to_string()
}

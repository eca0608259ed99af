//! Reset command recognition.

/// Actions that request a game reset, compared after trimming and
/// lowercasing.
pub const RESET_ALIASES: &[&str] = &[
    "reset",
    "/reset",
    "restart",
    "new game",
    "neustart",
    "zurücksetzen",
    "réinitialiser",
    "reiniciar",
];

/// What a player must type in interactive mode to confirm a reset.
pub const RESET_CONFIRMATION: &str = "RESET";

/// Whether `action` is a reset request.
pub fn is_reset_command(action: &str) -> bool {
    let normalized = action.trim().to_lowercase();
    RESET_ALIASES.contains(&normalized.as_str())
}

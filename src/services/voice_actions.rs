use serde::{Deserialize, Serialize};

use crate::services::text::{contains_phrase, fold};

/// Kiosk command recognized in a spoken utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceAction {
    SelectSeats,
    SelectFood,
    Checkout,
    SearchMovie,
}

/// Checked in order; the first action with a matching keyword wins
const ACTION_KEYWORDS: &[(VoiceAction, &[&str])] = &[
    (
        VoiceAction::SelectSeats,
        &["asiento", "asientos", "silla", "sillas", "seat", "seats"],
    ),
    (
        VoiceAction::SelectFood,
        &["comida", "combo", "combos", "palomitas", "food", "snack", "snacks", "popcorn"],
    ),
    (
        VoiceAction::Checkout,
        &["pagar", "comprar", "confirmar", "pay", "buy", "checkout", "confirm"],
    ),
    (
        VoiceAction::SearchMovie,
        &["pelicula", "peliculas", "recomienda", "ver", "movie", "movies", "recommend", "watch"],
    ),
];

/// Maps an utterance to a kiosk action, if any keyword is spoken
pub fn detect_voice_action(text: &str) -> Option<VoiceAction> {
    let folded = fold(text);
    if folded.is_empty() {
        return None;
    }

    let action = ACTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&folded, k)))
        .map(|(action, _)| *action);

    tracing::debug!(text, action = ?action, "Voice action detection");
    action
}

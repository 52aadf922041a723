use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::voice_actions::{detect_voice_action, VoiceAction};

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub text: String,
    /// `null` when no kiosk command was recognized
    pub action: Option<VoiceAction>,
}

/// Handler for kiosk voice command detection
pub async fn detect_action(Json(request): Json<VoiceRequest>) -> Json<VoiceResponse> {
    let action = detect_voice_action(&request.text);
    Json(VoiceResponse {
        text: request.text,
        action,
    })
}

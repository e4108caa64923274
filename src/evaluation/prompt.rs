use serde_json::{json, Value};

use super::EvaluationRequest;

/// Render the check-in prompt for one stop event.
///
/// The user's own phone number is not part of the prompt; it only travels
/// with the request so the caller knows who the check-in is about.
pub fn render(request: &EvaluationRequest) -> String {
    format!(
        "You are a safety assistant that determines if a check-in text should be sent to a user based on their location and time stopped.\n\
         \n\
         The user's current latitude is {} and longitude is {}.\n\
         The user's last known latitude was {} and longitude was {}.\n\
         The user has been stopped for {} seconds.\n\
         The guardian's phone number is {}.\n\
         \n\
         Determine if the user has stopped unexpectedly. If the user has stopped unexpectedly, return true for shouldSendCheckIn. Otherwise, return false.\n",
        request.current_latitude,
        request.current_longitude,
        request.last_known_latitude,
        request.last_known_longitude,
        request.stopped_seconds,
        request.guardian_phone,
    )
}

/// JSON schema of [`super::EvaluationResult`].
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "shouldSendCheckIn": {
                "type": "boolean",
                "description": "Whether or not a check-in text should be sent."
            }
        },
        "required": ["shouldSendCheckIn"]
    })
}

pub mod routes;

use crate::evaluation::EvaluationRequest;

// HELPER FUNCTIONS

// Coordinates are not range checked, but they have to be real numbers
pub fn validate_request(request: &EvaluationRequest) -> Result<(), String> {
    let coordinates = [
        ("currentLatitude", request.current_latitude),
        ("currentLongitude", request.current_longitude),
        ("lastKnownLatitude", request.last_known_latitude),
        ("lastKnownLongitude", request.last_known_longitude),
    ];
    for (name, value) in coordinates {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number", name));
        }
    }

    if !request.stopped_seconds.is_finite() || request.stopped_seconds < 0.0 {
        return Err("stoppedSeconds must be a non-negative number".to_string());
    }

    Ok(())
}

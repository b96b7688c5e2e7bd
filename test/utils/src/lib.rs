use serde_json::json;

/// Body of a successful Gemini `generateContent` call, split across two parts
/// the way the API does for longer answers.
pub fn gemini_reply_fixture(first: &str, second: &str) -> String {
    return json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": first }, { "text": second }]
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 48,
            "totalTokenCount": 60
        }
    })
    .to_string();
}

/// Body returned when a prompt is blocked. No candidates are present.
pub fn gemini_blocked_fixture() -> String {
    return json!({
        "promptFeedback": {
            "blockReason": "SAFETY"
        }
    })
    .to_string();
}

/// Body returned when the answer itself is filtered. The candidate has no
/// content at all.
pub fn gemini_safety_fixture() -> String {
    return json!({
        "candidates": [{
            "finishReason": "SAFETY",
            "index": 0,
            "safetyRatings": [{
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "probability": "HIGH"
            }]
        }]
    })
    .to_string();
}

pub fn lab_report_fixture() -> &'static str {
    return r#"
COMPLETE BLOOD COUNT
WBC        13.2  x10^3/uL   (4.5 - 11.0)   HIGH
RBC         4.9  x10^6/uL   (4.5 - 5.9)
Hemoglobin 14.1  g/dL       (13.5 - 17.5)
Platelets   310  x10^3/uL   (150 - 400)
"#
    .trim();
}

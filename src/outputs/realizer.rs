use crate::vision::aggregator::{DetectionEntry, OBJECT_BULLET, SCENE_MARKER};

pub const GREETING: &str = "Camera scanner ready. I will identify objects around you automatically.";
pub const CLOSING: &str = "Closing camera scanner.";
pub const NO_DETECTIONS: &str = "No objects detected yet. Point camera at something.";
pub const NO_TEXT: &str = "No text found yet. Point camera at signs, labels or menus.";
pub const SCANNING_PLACEHOLDER: &str = "Scanning environment...";
pub const TEXT_PLACEHOLDER: &str = "Scanning for text...";
pub const TEXT_CAPTION_HEADER: &str = "📝 TEXT FOUND:";

/// PURE FUNCTION: display line -> what the speech engine should say.
/// "• chair (87%) — on your left, nearby" -> "chair 87 percent — on your left, nearby"
pub fn spoken_form(display: &str) -> String {
    let stripped = display
        .replace(OBJECT_BULLET, "")
        .replace(SCENE_MARKER, "")
        .replace(['(', ')'], "")
        .replace('%', " percent");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One utterance covering the whole description, or the fallback when empty.
pub fn speak_all_phrase(entries: &[DetectionEntry]) -> String {
    if entries.is_empty() {
        return NO_DETECTIONS.to_string();
    }
    let mut phrase = String::from("I can see: ");
    for entry in entries {
        phrase.push_str(&spoken_form(&entry.text));
        phrase.push_str(". ");
    }
    phrase.trim_end().to_string()
}

pub fn reading_phrase(text: &str) -> String {
    format!("I can read: {}", text)
}

pub fn text_caption(text: &str) -> Vec<String> {
    vec![TEXT_CAPTION_HEADER.to_string(), text.to_string()]
}

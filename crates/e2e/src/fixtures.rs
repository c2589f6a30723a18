use chrono::Utc;

use shakedown_client::Params;

/// Property set for a plain content node: a couple of string properties, a
/// multi-valued tag field, and a timestamp.
pub fn node_properties(marker: &str) -> Params {
    Params::new()
        .add("title", format!("Test node {marker}"))
        .add("description", "fixture content")
        .add_each("tags", ["fixture", marker])
        .add("created", Utc::now().to_rfc3339())
}

/// Small HTML document with a recognizable marker in the title.
pub fn html_document(marker: &str) -> String {
    format!("<html><head><title>{marker}</title></head><body><p>fixture body</p></body></html>")
}

/// Plain-text payload for pooled-content uploads.
pub fn text_payload(marker: &str) -> Vec<u8> {
    format!("This is some fixture content: {marker}.\n").into_bytes()
}

//! Stream section validation.

use crate::schema::BriefConfig;

pub(crate) fn validate_stream(errors: &mut Vec<String>, config: &BriefConfig) {
    let marker = &config.stream.marker;
    if marker.is_empty() {
        errors.push("stream.marker must not be empty".into());
    }
    if marker.contains('\n') || marker.contains('\r') {
        errors.push("stream.marker must not contain line breaks".into());
    }
}

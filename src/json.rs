//! JSON parsing with operator-friendly diagnostics.

use anyhow::Result;

/// Parse JSON and, on failure, describe where it went wrong: the serde path,
/// the type mismatch, and a snippet of the offending line with a caret.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(jd) {
        Ok(value) => Ok(value),
        Err(err) => {
            let inner_err = err.inner();
            let (line, column) = (inner_err.line(), inner_err.column());
            let path = err.path().to_string();

            let msg = inner_err.to_string();
            let loc = format!(" at line {line} column {column}");
            let msg_without_loc = msg.strip_suffix(&loc).unwrap_or(&msg).to_string();

            let mut final_err = String::new();
            if !path.is_empty() && path != "." {
                final_err.push_str(&format!("at path '{path}': "));
            }
            final_err.push_str(&format!(
                "{} (line {line} col {column})",
                describe_mismatch(&msg_without_loc)
            ));
            if let Some(snippet) = build_error_snippet(body, line, column, 24) {
                final_err.push('\n');
                final_err.push_str(&snippet);
            }

            Err(anyhow::anyhow!(final_err))
        }
    }
}

/// Rewrite serde's "invalid type: X, expected Y" as "expected Y, got X".
///
/// Anything else is returned unchanged.
fn describe_mismatch(error_msg: &str) -> String {
    for prefix in ["invalid type: ", "invalid value: "] {
        if let Some(start) = error_msg.find(prefix) {
            let after_prefix = &error_msg[start + prefix.len()..];
            if let Some((actual, expected)) = after_prefix.split_once(", expected ") {
                return format!("expected {}, got {}", expected.trim(), actual);
            }
        }
    }
    error_msg.to_string()
}

/// A window of `context_len` characters around the error column, or `None`
/// when the line is blank (e.g. EOF errors).
fn build_error_snippet(
    body: &str,
    line: usize,
    column: usize,
    context_len: usize,
) -> Option<String> {
    let chars: Vec<char> = body.lines().nth(line.saturating_sub(1))?.chars().collect();
    if chars.iter().all(|c| c.is_whitespace()) {
        return None;
    }

    // column is 1-based
    let error_idx = column.saturating_sub(1).min(chars.len().saturating_sub(1));
    let half_len = context_len / 2;
    let start = error_idx.saturating_sub(half_len);
    let end = (error_idx + half_len).min(chars.len());

    let slice: String = chars[start..end].iter().collect();
    let indicator = " ".repeat(error_idx - start) + "^";

    Some(format!("...{slice}...\n   {indicator}"))
}

//! Output formatting for CLI responses.

use std::fmt::Display;

use docgate_types::DiagnosticError;

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("[OK] {message}");
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Renders an error with its hint and fix lines, if any.
pub fn diagnostic<E: DiagnosticError + Display>(error: &E) -> String {
    let mut out = error.to_string();
    if let Some(hint) = error.hint() {
        out.push_str(&format!("\n  hint: {hint}"));
    }
    if let Some(fix) = error.fix() {
        out.push_str(&format!("\n  fix:  {fix}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_transport_http::AuthError;

    #[test]
    fn diagnostic_includes_hint_and_fix() {
        let text = diagnostic(&AuthError::MissingKeyPath);
        assert!(text.starts_with("no API key file is configured"));
        assert!(text.contains("hint:"));
        assert!(text.contains("DOCGATE_AUTH__API_KEY_PATH"));
    }

    #[test]
    fn diagnostic_without_hints_is_just_the_message() {
        assert_eq!(diagnostic(&AuthError::InvalidKey), "invalid API key");
    }
}

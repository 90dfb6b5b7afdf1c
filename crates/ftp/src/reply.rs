//! Classification of FTP server replies.

/// `550 Requested action not taken`: what most servers answer to `MKD`
/// on an existing directory. Also used for permission problems, which
/// are then tolerated as well; the upload that follows reports them.
const FILE_UNAVAILABLE: u32 = 550;

/// `521 Directory already exists` (RFC 959 extension used by some servers).
const DIRECTORY_EXISTS: u32 = 521;

/// Decides whether a failed `MKD` means the directory is already there.
///
/// A reply code, when there is one, decides on its own. Reply text is
/// only consulted when no code is available.
pub fn is_already_exists(code: Option<u32>, text: &str) -> bool {
    match code {
        Some(code) => matches!(code, FILE_UNAVAILABLE | DIRECTORY_EXISTS),
        None => text.to_ascii_lowercase().contains("exists"),
    }
}

/// Extracts the human-readable part of a reply body.
///
/// Bodies usually repeat the code (`"550 Permission denied\r\n"`); it is
/// stripped along with the multi-line `-` marker.
pub fn reply_text(code: u32, body: &str) -> String {
    let body = body.trim();
    let code = code.to_string();
    body.strip_prefix(code.as_str())
        .map(|rest| rest.trim_start_matches(['-', ' ']))
        .unwrap_or(body)
        .trim()
        .to_string()
}

/// Splits a raw reply into its code and text.
///
/// The code is read from the reply line itself: `suppaftp` reports codes it
/// has no name for (`521` among them) as `0`.
pub fn parse_reply(body: &str) -> (Option<u32>, String) {
    let code = body
        .trim_start()
        .get(..3)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok());
    let text = match code {
        Some(code) => reply_text(code, body),
        None => body.trim().to_string(),
    };
    (code, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_mean_exists() {
        assert!(is_already_exists(
            Some(550),
            "Create directory operation failed."
        ));
        assert!(is_already_exists(Some(521), ""));
    }

    #[test]
    fn other_codes_are_failures() {
        assert!(!is_already_exists(Some(553), "Could not create file."));
        assert!(!is_already_exists(Some(530), "Not logged in."));
    }

    #[test]
    fn text_is_only_read_without_a_code() {
        assert!(is_already_exists(None, "Directory already EXISTS"));
        assert!(!is_already_exists(None, "Permission denied"));
        assert!(!is_already_exists(Some(553), "553 apks: File exists"));
    }

    #[test]
    fn strips_code_from_body() {
        assert_eq!(
            reply_text(550, "550 Permission denied\r\n"),
            "Permission denied"
        );
        assert_eq!(reply_text(550, "550-Multi line\r\n"), "Multi line");
    }

    #[test]
    fn keeps_body_without_code() {
        assert_eq!(reply_text(550, "  No such file "), "No such file");
    }

    #[test]
    fn parses_code_from_reply_line() {
        assert_eq!(
            parse_reply("521 \"beta\" directory already exists\r\n"),
            (Some(521), "\"beta\" directory already exists".to_string())
        );
        assert_eq!(parse_reply("550-Line one\r\n550 Line two\r\n").0, Some(550));
    }

    #[test]
    fn reply_without_code() {
        assert_eq!(parse_reply(" oops \r\n"), (None, "oops".to_string()));
        assert_eq!(parse_reply("5x0 bad"), (None, "5x0 bad".to_string()));
    }
}

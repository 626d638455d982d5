//! Bordered summary block printed at the end of every command

/// Minimum content width
pub const MIN_WIDTH: usize = 80;

/// Header text when neither ticket nor realm is known
pub const DEFAULT_TITLE: &str = "Keycloak CLI";

const HEADER_SEPARATOR: &str = " ::: ";

/// Context shown in the header row
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxHeader<'a> {
    pub jira: Option<&'a str>,
    pub realm: Option<&'a str>,
}

impl BoxHeader<'_> {
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(jira) = self.jira.filter(|j| !j.is_empty()) {
            parts.push(format!("Jira Ticket: {jira}"));
        }
        if let Some(realm) = self.realm.filter(|r| !r.is_empty()) {
            parts.push(format!("Current realm: {realm}"));
        }
        if parts.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            parts.join(HEADER_SEPARATOR)
        }
    }
}

/// Render `lines` inside a bordered block
///
/// Width is the largest of [`MIN_WIDTH`], the header and the longest line.
/// Lines are padded on the right and never truncated.
pub fn render_box<S: AsRef<str>>(lines: &[S], header: BoxHeader<'_>) -> Vec<String> {
    let title = header.text();
    let width = lines
        .iter()
        .map(|l| l.as_ref().chars().count())
        .chain([MIN_WIDTH, title.chars().count()])
        .max()
        .unwrap_or(MIN_WIDTH);

    let border = format!("|{}|", ":".repeat(width + 2));
    let row = |text: &str| {
        let pad = width - text.chars().count();
        format!("| {text}{} |", " ".repeat(pad))
    };

    let mut out = Vec::with_capacity(lines.len() + 4);
    out.push(border.clone());
    out.push(row(&title));
    for line in lines {
        out.push(row(line.as_ref()));
    }
    out.push(border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_text() {
        let header = BoxHeader {
            jira: Some("OPS-42"),
            realm: Some("demo"),
        };
        assert_eq!(header.text(), "Jira Ticket: OPS-42 ::: Current realm: demo");
        assert_eq!(
            BoxHeader {
                jira: None,
                realm: Some("all realms")
            }
            .text(),
            "Current realm: all realms"
        );
        assert_eq!(BoxHeader::default().text(), DEFAULT_TITLE);
    }

    #[test]
    fn test_minimum_width() {
        let out = render_box(&["short"], BoxHeader::default());
        assert_eq!(out.len(), 4);
        for line in &out {
            assert_eq!(line.chars().count(), MIN_WIDTH + 4);
        }
        assert_eq!(out[1], format!("| {DEFAULT_TITLE:<80} |"));
        assert_eq!(out[2], format!("| {:<80} |", "short"));
    }

    #[test]
    fn test_grows_with_longest_line() {
        let long = "x".repeat(120);
        let out = render_box(&[long.as_str(), "y"], BoxHeader::default());
        assert!(out.iter().all(|l| l.chars().count() == 124));
        assert!(out[2].contains(&long));
    }

    #[test]
    fn test_multibyte_padding() {
        let out = render_box(&["Créé"], BoxHeader::default());
        assert_eq!(out[2].chars().count(), MIN_WIDTH + 4);
    }

    #[test]
    fn test_empty_lines() {
        let out = render_box::<&str>(&[], BoxHeader::default());
        assert_eq!(out.len(), 3);
    }
}

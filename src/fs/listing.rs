//! HTML directory listings.

use std::fmt::Write;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    /// Link target for this entry when listed under `current_url`.
    ///
    /// Directories get a trailing slash so relative links keep working.
    pub fn url(&self, current_url: &str) -> String {
        let mut url = join_url(current_url, &self.name);
        if self.is_dir {
            url.push('/');
        }
        url
    }
}

fn join_url(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Renders the listing page for `current_url`. Entries are emitted in the
/// order given.
pub fn render(current_url: &str, entries: &[DirEntry]) -> String {
    let title = escape_html(current_url);
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n");
    let _ = writeln!(page, "    <title>Directory Listing of {title}</title>");
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "    <h1>Directory Listing of {title}</h1>");
    page.push_str("    <ul>\n");
    for entry in entries {
        let _ = writeln!(
            page,
            "        <li><a href=\"{}\">{}</a></li>",
            escape_html(&entry.url(current_url)),
            escape_html(&entry.name),
        );
    }
    page.push_str("    </ul>\n</body>\n</html>\n");

    page
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_entries_get_trailing_slash() {
        let entry = DirEntry {
            name: "docs".into(),
            is_dir: true,
        };
        assert_eq!(entry.url("/"), "/docs/");
        assert_eq!(entry.url("/a"), "/a/docs/");
    }

    #[test]
    fn names_are_escaped() {
        let entries = [DirEntry {
            name: "<b>.txt".into(),
            is_dir: false,
        }];
        let page = render("/", &entries);
        assert!(page.contains("&lt;b&gt;.txt"));
        assert!(!page.contains("<b>.txt"));
    }
}

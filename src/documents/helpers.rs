//! Paged text helpers
//!
//! Documents are stored as UTF-8 text with pages separated by a form feed.
//! These functions convert between that layout and the extracted-text form
//! handed to clients.

/// Separator between pages in a stored document.
pub const PAGE_BREAK: char = '\u{000C}';

/// Number of body lines that fit on one A4 page at 12pt with 72pt margins.
pub const LINES_PER_PAGE: usize = 50;

/// Splits `contents` into pages of at most [`LINES_PER_PAGE`] lines.
///
/// Empty contents still produce a single (empty) page.
pub fn paginate(contents: &str) -> Vec<String> {
    // A form feed in supplied contents would read back as a page break.
    let contents = contents.replace(PAGE_BREAK, "\n");
    let lines: Vec<&str> = contents.lines().collect();
    if lines.is_empty() {
        return vec![String::new()];
    }
    lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.join("\n"))
        .collect()
}

/// Joins pages into the stored layout.
pub fn join_pages(pages: &[String]) -> String {
    pages.join(&PAGE_BREAK.to_string())
}

/// Renders stored document text as extracted page text.
///
/// Example output for a one-page document containing `Hello`:
/// `"--- Page 1 ---\nHello\n\n"`.
pub fn render_pages(raw: &str) -> String {
    raw.split(PAGE_BREAK)
        .enumerate()
        .map(|(index, page)| {
            let text = page
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            format!("--- Page {} ---\n{}\n\n", index + 1, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_single_page() {
        assert_eq!(render_pages("Hello"), "--- Page 1 ---\nHello\n\n");
    }

    #[test]
    fn render_joins_lines_and_numbers_pages() {
        let raw = format!("first\n  second \n\nthird{}next", PAGE_BREAK);
        assert_eq!(
            render_pages(&raw),
            "--- Page 1 ---\nfirst second third\n\n--- Page 2 ---\nnext\n\n"
        );
    }

    #[test]
    fn paginate_splits_long_contents() {
        let contents = (0..LINES_PER_PAGE + 3)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let pages = paginate(&contents);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], "line 50\nline 51\nline 52");
        assert!(render_pages(&join_pages(&pages)).contains("--- Page 2 ---\nline 50 line 51"));
    }

    #[test]
    fn paginate_empty_contents() {
        assert_eq!(paginate(""), vec![String::new()]);
    }

    #[test]
    fn form_feed_in_contents_is_not_a_page_break() {
        let pages = paginate("intro\u{000C}appendix");
        assert_eq!(pages, vec!["intro\nappendix".to_string()]);

        let rendered = render_pages(&join_pages(&pages));
        assert_eq!(rendered, "--- Page 1 ---\nintro appendix\n\n");
    }
}

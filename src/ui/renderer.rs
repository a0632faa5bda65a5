//! Text renderer for view models.
//!
//! A frame is a plain sequence of lines with ANSI colors, written top to
//! bottom:
//!
//! ```text
//! ── Bookfinder · Search (2) ──────────────
//! Search: dune
//! Recent: [1] dune  [2] emma
//! Filters: [With cover] [From: 1960]
//! Searching...
//!  1. ★ Dune (1965) · Frank Herbert
//!       https://covers.openlibrary.org/b/id/1-M.jpg
//!       https://openlibrary.org/works/OL893415W
//! ┌ Dune ─────────────────────────────────
//! │ First published: 1965
//! └───────────────────────────────────────
//! type to search  :go  :help  :quit
//! ```

use crate::ui::theme::Palette;
use crate::ui::viewmodel::{DetailInfo, DisplayItem, SearchBarInfo, StatusLine, UIViewModel};
use std::fmt::Write;

/// Width of horizontal rules.
const RULE_WIDTH: usize = 60;

/// Renders a complete frame.
///
/// # Example
///
/// ```rust
/// use bookfinder::ui::{render, Palette, UIViewModel};
/// use bookfinder::storage::Theme;
///
/// let frame = render(&UIViewModel::default(), &Palette::for_theme(Theme::Light));
/// assert!(frame.contains("Bookfinder"));
/// ```
#[must_use]
pub fn render(vm: &UIViewModel, palette: &Palette) -> String {
    let mut out = String::new();

    render_header(&mut out, &vm.header.title, palette);
    if let Some(search) = &vm.search_bar {
        render_search_bar(&mut out, search, palette);
    }
    if !vm.chips.is_empty() {
        render_chips(&mut out, &vm.chips, palette);
    }
    if let Some(status) = &vm.status {
        render_status(&mut out, status, palette);
    }
    if let Some(notice) = &vm.notice {
        line(&mut out, palette.accent, notice);
    }
    for text in &vm.text {
        line(&mut out, palette.text, text);
    }
    for item in &vm.items {
        render_item(&mut out, item, palette);
    }
    if let Some(detail) = &vm.detail {
        render_detail(&mut out, detail, palette);
    }
    for help in &vm.help {
        line(&mut out, palette.dim, help);
    }
    line(&mut out, palette.dim, &vm.footer.keybindings);

    out
}

fn line(out: &mut String, color: &str, text: &str) {
    let _ = writeln!(out, "{}{text}{}", Palette::fg(color), Palette::reset());
}

fn render_header(out: &mut String, title: &str, palette: &Palette) {
    let label = format!("── Bookfinder · {title} ");
    let fill = RULE_WIDTH.saturating_sub(label.chars().count());
    let _ = writeln!(
        out,
        "{}{}{label}{}{}",
        Palette::bold(),
        Palette::fg(palette.header),
        "─".repeat(fill),
        Palette::reset()
    );
}

fn render_search_bar(out: &mut String, search: &SearchBarInfo, palette: &Palette) {
    line(out, palette.text, &format!("Search: {}", search.query));
    if !search.recents.is_empty() {
        let recents: Vec<String> = search
            .recents
            .iter()
            .enumerate()
            .map(|(i, query)| format!("[{}] {query}", i + 1))
            .collect();
        line(out, palette.dim, &format!("Recent: {}", recents.join("  ")));
    }
}

fn render_chips(out: &mut String, chips: &[String], palette: &Palette) {
    let _ = write!(out, "{}Filters:{} ", Palette::fg(palette.dim), Palette::reset());
    for chip in chips {
        let _ = write!(
            out,
            "{}{} {chip} {} ",
            Palette::fg(palette.chip_fg),
            Palette::bg(palette.chip_bg),
            Palette::reset()
        );
    }
    out.push('\n');
}

fn render_status(out: &mut String, status: &StatusLine, palette: &Palette) {
    match status {
        StatusLine::Loading(text) => line(out, palette.accent, text),
        StatusLine::Error(text) => line(out, palette.error, text),
        StatusLine::Empty(text) => line(out, palette.dim, text),
    }
}

fn render_item(out: &mut String, item: &DisplayItem, palette: &Palette) {
    let marker = if item.is_favorite {
        format!("{}★{}", Palette::fg(palette.favorite), Palette::fg(palette.text))
    } else {
        " ".to_string()
    };
    let year = item.year.as_ref().map(|y| format!(" ({y})")).unwrap_or_default();
    let subtitle = if item.subtitle.is_empty() {
        String::new()
    } else {
        format!(" · {}", item.subtitle)
    };

    let _ = writeln!(
        out,
        "{}{:>2}. {marker} {}{}{year}{}{}{subtitle}{}",
        Palette::fg(palette.text),
        item.index,
        Palette::bold(),
        item.title,
        Palette::reset(),
        Palette::fg(palette.dim),
        Palette::reset()
    );
    line(out, palette.dim, &format!("      {}", item.cover_url));
    line(out, palette.dim, &format!("      {}", item.link));
}

fn render_detail(out: &mut String, detail: &DetailInfo, palette: &Palette) {
    let label = format!("┌ {} ", detail.title);
    let fill = RULE_WIDTH.saturating_sub(label.chars().count());
    line(out, palette.border, &format!("{label}{}", "─".repeat(fill)));
    for text in &detail.lines {
        line(out, palette.text, &format!("│ {text}"));
    }
    line(out, palette.border, &format!("└{}", "─".repeat(RULE_WIDTH - 1)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Theme;
    use crate::ui::viewmodel::{FooterInfo, HeaderInfo};

    fn strip_ansi(text: &str) -> String {
        let mut plain = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                plain.push(c);
            }
        }
        plain
    }

    #[test]
    fn test_frame_layout() {
        let vm = UIViewModel {
            header: HeaderInfo { title: "Search (1)".into() },
            search_bar: Some(SearchBarInfo {
                query: "dune".into(),
                recents: vec!["dune".into(), "emma".into()],
            }),
            chips: vec!["With cover".into()],
            status: Some(StatusLine::Loading("Searching...".into())),
            items: vec![DisplayItem {
                index: 1,
                title: "Dune".into(),
                subtitle: "Frank Herbert".into(),
                year: Some("1965".into()),
                cover_url: "https://covers.openlibrary.org/b/id/1-M.jpg".into(),
                link: "https://openlibrary.org/works/OL1W".into(),
                is_favorite: true,
            }],
            footer: FooterInfo { keybindings: ":quit".into() },
            ..UIViewModel::default()
        };

        let plain = strip_ansi(&render(&vm, &Palette::for_theme(Theme::Dark)));
        let lines: Vec<&str> = plain.lines().collect();
        assert!(lines[0].starts_with("── Bookfinder · Search (1) ─"));
        assert_eq!(lines[1], "Search: dune");
        assert_eq!(lines[2], "Recent: [1] dune  [2] emma");
        assert_eq!(lines[3], "Filters:  With cover  ");
        assert_eq!(lines[4], "Searching...");
        assert_eq!(lines[5], " 1. ★ Dune (1965) · Frank Herbert");
        assert_eq!(lines.last().copied(), Some(":quit"));
    }

    #[test]
    fn test_detail_box() {
        let vm = UIViewModel {
            detail: Some(DetailInfo {
                title: "Dune".into(),
                lines: vec!["Details not available.".into()],
            }),
            ..UIViewModel::default()
        };
        let plain = strip_ansi(&render(&vm, &Palette::for_theme(Theme::Light)));
        assert!(plain.contains("┌ Dune ─"));
        assert!(plain.contains("│ Details not available."));
    }
}

// src/render/text.rs
//! Plain-text preview: two columns, fixed-height pages

use super::{DocumentView, Section};

const MAIN_WIDTH: usize = 54;
const SIDE_WIDTH: usize = 24;
const GUTTER: &str = "   ";
pub const PAGE_HEIGHT: usize = 60;

/// Renders the view as pages of at most `PAGE_HEIGHT` lines.
pub fn render_pages(view: &DocumentView) -> Vec<String> {
    let mut main = Vec::new();
    push_wrapped(&mut main, &view.name.to_uppercase(), MAIN_WIDTH);
    push_wrapped(&mut main, &view.job_title, MAIN_WIDTH);
    main.push(String::new());
    for section in &view.main {
        push_section(&mut main, section, MAIN_WIDTH);
    }

    let mut side = Vec::new();
    for line in &view.contact {
        push_wrapped(&mut side, line, SIDE_WIDTH);
    }
    side.push(String::new());
    for section in &view.side {
        push_section(&mut side, section, SIDE_WIDTH);
    }

    let rows = main.len().max(side.len());
    let lines: Vec<String> = (0..rows)
        .map(|i| {
            let left = main.get(i).map(String::as_str).unwrap_or("");
            let right = side.get(i).map(String::as_str).unwrap_or("");
            let pad = MAIN_WIDTH.saturating_sub(left.chars().count());
            format!("{left}{}{GUTTER}{right}", " ".repeat(pad))
                .trim_end()
                .to_string()
        })
        .collect();

    lines
        .chunks(PAGE_HEIGHT)
        .map(|page| page.join("\n"))
        .collect()
}

/// All pages joined with a page marker between them.
pub fn render(view: &DocumentView) -> String {
    let pages = render_pages(view);
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| format!("{page}\n\n{:-^width$}\n", format!(" page {} of {} ", i + 1, total), width = MAIN_WIDTH + GUTTER.len() + SIDE_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_section(out: &mut Vec<String>, section: &Section, width: usize) {
    out.push(section.heading.to_string());
    for entry in &section.entries {
        push_wrapped(out, &format!("{}{}", entry.title, entry.subtitle), width);
        if let Some(detail) = &entry.detail {
            push_wrapped(out, detail, width);
        }
        if let Some(body) = &entry.body {
            push_wrapped(out, body, width);
        }
        if entry.detail.is_some() || entry.body.is_some() {
            out.push(String::new());
        }
    }
    out.push(String::new());
}

/// Greedy word wrap; words longer than `width` are split.
fn push_wrapped(out: &mut Vec<String>, text: &str, width: usize) {
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                out.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        if !line.is_empty() {
            out.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserProfile;
    use crate::validation::tests::minimal_profile;

    #[test]
    fn test_wrap_respects_width() {
        let mut out = Vec::new();
        push_wrapped(&mut out, "one two three four five six", 9);
        assert_eq!(out, vec!["one two", "three", "four five", "six"]);
        assert!(out.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let mut out = Vec::new();
        push_wrapped(&mut out, "abcdefghij", 4);
        assert_eq!(out, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_columns_side_by_side() {
        let view = DocumentView::from_profile(&minimal_profile());
        let pages = render_pages(&view);
        assert_eq!(pages.len(), 1);

        let first = pages[0].lines().next().unwrap();
        assert!(first.starts_with("GRACE HOPPER"));
        assert!(first.ends_with("1 Navy Yard"));
        assert!(pages[0].contains("EXPERIENCE"));
        assert!(pages[0].contains("English (Native)"));
        assert!(!pages[0].contains("EDUCATION"));
    }

    #[test]
    fn test_long_profile_paginates() {
        let mut profile = minimal_profile();
        let entry = profile.experience[0].clone();
        profile.experience = vec![entry; 20];

        let pages = render_pages(&DocumentView::from_profile(&profile));
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|p| p.lines().count() <= PAGE_HEIGHT));
        assert!(render(&DocumentView::from_profile(&profile)).contains(&format!("page 2 of {}", pages.len())));
    }

    #[test]
    fn test_blank_profile_renders() {
        let text = render(&DocumentView::from_profile(&UserProfile::blank()));
        assert!(text.contains("page 1 of 1"));
    }
}

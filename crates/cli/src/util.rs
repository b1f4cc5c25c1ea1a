use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns taken by `s` (CJK and emoji count double).
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Clip `s` to at most `max` columns, marking the cut with "..".
pub(crate) fn clip(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max < 3 {
        return s
            .chars()
            .take_while(|c| c.width().unwrap_or(0) <= max)
            .take(1)
            .collect();
    }

    let budget = max - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("..");
    out
}

/// Left-align `s` in a field of `width` columns, clipping if it overflows.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let clipped = clip(s, width);
    let fill = width.saturating_sub(display_width(&clipped));
    format!("{clipped}{}", " ".repeat(fill))
}

/// Widest label in columns, for aligning `label: value` lines.
pub(crate) fn label_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
    labels.into_iter().map(display_width).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_cjk_double() {
        assert_eq!(display_width("acme"), 4);
        assert_eq!(display_width("\u{4e16}\u{754c}"), 4);
    }

    #[test]
    fn clip_keeps_short_values() {
        assert_eq!(clip("Initech", 7), "Initech");
        assert_eq!(clip("", 0), "");
    }

    #[test]
    fn clip_marks_cut() {
        assert_eq!(clip("Globex Incorporated", 8), "Globex..");
        assert_eq!(clip("abc", 2), "a");
    }

    #[test]
    fn clip_respects_wide_chars() {
        let clipped = clip("\u{4e16}\u{754c}\u{4f60}\u{597d}", 7);
        assert_eq!(clipped, "\u{4e16}\u{754c}..");
        assert!(display_width(&clipped) <= 7);
    }

    #[test]
    fn pad_right_fills_and_clips() {
        assert_eq!(pad_right("co", 5), "co   ");
        assert_eq!(pad_right("company", 5), "com..");
        assert_eq!(pad_right("\u{4e16}", 4), "\u{4e16}  ");
    }

    #[test]
    fn label_width_takes_widest() {
        assert_eq!(label_width(["email", "contact_person", "address"]), 14);
        assert_eq!(label_width(std::iter::empty()), 0);
    }
}

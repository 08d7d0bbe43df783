use crate::units::Pt;
use std::iter::Peekable;
use std::str::SplitWhitespace;

/// Greedy word wrapping. Words are taken one at a time and appended to the
/// current line (joined by a single space) for as long as the line still
/// measures within `max_width`; the first word that doesn't fit starts the
/// next line. There is no lookahead and no hyphenation, so a single word
/// wider than `max_width` gets a line of its own and overflows it.
///
/// Any run of whitespace in the input, newlines included, separates words.
/// Blank input produces no lines.
///
/// The iterator is lazy and [Clone]; clone it before consuming to lay the
/// same text out twice, e.g. once to measure and once to draw.
///
/// ```
/// use folio::layout::wrap_greedy;
/// use folio::Pt;
///
/// // every character is 1pt wide
/// let measure = |s: &str| Pt(s.chars().count() as f32);
/// let lines: Vec<String> = wrap_greedy("the quick brown fox", Pt(10.0), measure).collect();
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_greedy<F>(text: &str, max_width: Pt, measure: F) -> WrapLines<'_, F>
where
    F: Fn(&str) -> Pt,
{
    WrapLines {
        words: text.split_whitespace().peekable(),
        max_width,
        measure,
    }
}

#[derive(Clone)]
pub struct WrapLines<'t, F> {
    words: Peekable<SplitWhitespace<'t>>,
    max_width: Pt,
    measure: F,
}

impl<F> Iterator for WrapLines<'_, F>
where
    F: Fn(&str) -> Pt,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = self.words.next()?.to_string();
        while let Some(word) = self.words.peek() {
            let candidate = format!("{line} {word}");
            if (self.measure)(&candidate) > self.max_width {
                break;
            }
            line = candidate;
            self.words.next();
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Pt {
        Pt(s.chars().count() as f32)
    }

    const DESCRIPTION: &str = "A minimal, aesthetic timer built as both a web app and a desktop \
        app. It focuses on clarity, calm visuals, and smooth interaction.";

    #[test]
    fn wrapped_lines_keep_every_word_in_order() {
        for width in [1.0, 5.0, 12.0, 30.0, 80.0, 1000.0] {
            let lines: Vec<String> = wrap_greedy(DESCRIPTION, Pt(width), chars).collect();
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
            let original: Vec<&str> = DESCRIPTION.split_whitespace().collect();
            assert_eq!(rejoined, original, "width {width}");
        }
    }

    #[test]
    fn lines_fit_unless_a_single_word_is_too_wide() {
        for width in [1.0, 5.0, 12.0, 30.0, 80.0] {
            for line in wrap_greedy(DESCRIPTION, Pt(width), chars) {
                assert!(
                    chars(&line) <= Pt(width) || !line.contains(' '),
                    "{line:?} overflows {width}"
                );
            }
        }
    }

    #[test]
    fn lines_are_filled_greedily() {
        let lines: Vec<String> = wrap_greedy("aa bb cc dd", Pt(5.0), chars).collect();
        assert_eq!(lines, vec!["aa bb", "cc dd"]);

        // one more character of room doesn't pull the next word up
        let lines: Vec<String> = wrap_greedy("aa bb cc dd", Pt(6.0), chars).collect();
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn overwide_word_gets_its_own_line() {
        let lines: Vec<String> = wrap_greedy("a extraordinarily b", Pt(4.0), chars).collect();
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn whitespace_is_normalised() {
        let lines: Vec<String> = wrap_greedy("  one\ttwo\n\nthree  ", Pt(100.0), chars).collect();
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert_eq!(wrap_greedy("", Pt(100.0), chars).count(), 0);
        assert_eq!(wrap_greedy(" \n\t ", Pt(100.0), chars).count(), 0);
    }

    #[test]
    fn clones_restart_from_the_same_point() {
        let mut lines = wrap_greedy(DESCRIPTION, Pt(20.0), chars);
        let first = lines.next();
        let rest: Vec<String> = lines.clone().collect();
        assert!(first.is_some());
        assert_eq!(lines.collect::<Vec<_>>(), rest);
    }
}

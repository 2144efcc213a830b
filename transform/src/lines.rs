//! Line-ending-preserving line splitting for patch application (§4.4's
//! "line-ending style is preserved from the input file").

/// The line terminator a [`Line`] was followed by in its source text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LineEnding {
    /// `\n`.
    Lf,
    /// `\r\n`.
    Crlf,
    /// A bare `\r`.
    Cr,
    /// No terminator: the last line of a file with no trailing newline.
    None,
}

impl LineEnding {
    /// The literal bytes this ending renders as.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
            LineEnding::Cr => "\r",
            LineEnding::None => "",
        }
    }
}

/// One line of text, with its own terminator remembered so the file can be
/// reassembled without normalizing CR/LF/CRLF across a mixed-ending file.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Line {
    /// The line's content, excluding its terminator.
    pub content: String,
    /// The terminator this line was followed by in the source.
    pub ending: LineEnding,
}

/// Split `text` into lines, detecting CR, LF, and CRLF terminators independently per line.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            None => {
                lines.push(Line { content: rest.to_owned(), ending: LineEnding::None });
                break;
            }
            Some(idx) => {
                let content = rest[..idx].to_owned();
                let after = &rest[idx..];
                if after.starts_with("\r\n") {
                    lines.push(Line { content, ending: LineEnding::Crlf });
                    rest = &after[2..];
                } else if after.starts_with('\r') {
                    lines.push(Line { content, ending: LineEnding::Cr });
                    rest = &after[1..];
                } else {
                    lines.push(Line { content, ending: LineEnding::Lf });
                    rest = &after[1..];
                }
            }
        }
    }
    lines
}

/// Reassemble lines into text, writing each one's own terminator back.
pub fn join_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.content);
        out.push_str(line.ending.as_str());
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_mixed_endings() {
        let lines = split_lines("a\nb\r\nc\rd");
        assert_eq!(lines[0], Line { content: "a".into(), ending: LineEnding::Lf });
        assert_eq!(lines[1], Line { content: "b".into(), ending: LineEnding::Crlf });
        assert_eq!(lines[2], Line { content: "c".into(), ending: LineEnding::Cr });
        assert_eq!(lines[3], Line { content: "d".into(), ending: LineEnding::None });
    }

    #[test]
    fn round_trips_through_join() {
        let text = "a\r\nb\nc";
        let lines = split_lines(text);
        assert_eq!(join_lines(&lines), text);
    }
}

/// A terminated line found in a chunk of input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Bytes before the terminator.
    pub(crate) body: &'a [u8],
    /// `\n`, or `\r\n` when the line feed is preceded by a carriage return.
    pub(crate) terminator: &'a [u8],
    /// Offset just past the line feed.
    pub(crate) consumed: usize,
}

/// Find the first complete line in `data`. A lone `\r` does not end a line.
pub(crate) fn next_line(data: &[u8]) -> Option<Line<'_>> {
    let newline = memchr::memchr(b'\n', data)?;
    let line = &data[..newline];

    let body = line.strip_suffix(b"\r").unwrap_or(line);

    Some(Line {
        body,
        terminator: &data[body.len()..=newline],
        consumed: newline + 1,
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{
        next_line,
        Line,
    };

    #[test]
    fn no_newline() {
        assert_eq!(None, next_line(b""));
        assert_eq!(None, next_line(b"hello"));
    }

    #[test]
    fn lone_carriage_return() {
        assert_eq!(None, next_line(b"hello\rworld\r"));
    }

    #[test]
    fn line_feed() {
        let expected = Line {
            body: b"hello",
            terminator: b"\n",
            consumed: 6,
        };

        assert_eq!(Some(expected), next_line(b"hello\nworld"));
    }

    #[test]
    fn carriage_return_line_feed() {
        let expected = Line {
            body: b"hello",
            terminator: b"\r\n",
            consumed: 7,
        };

        assert_eq!(Some(expected), next_line(b"hello\r\nworld"));
    }

    #[test]
    fn only_one_carriage_return_is_terminator() {
        let expected = Line {
            body: b"hello\r",
            terminator: b"\r\n",
            consumed: 8,
        };

        assert_eq!(Some(expected), next_line(b"hello\r\r\n"));
    }

    #[test]
    fn empty_line() {
        let expected = Line {
            body: b"",
            terminator: b"\n",
            consumed: 1,
        };

        assert_eq!(Some(expected), next_line(b"\nhello\n"));
    }
}

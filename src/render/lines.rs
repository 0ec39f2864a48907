/// Line-wise text building for column-aligned help sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMapper {
    lines: Vec<String>,
}

impl LineMapper {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Append lines.
    #[must_use]
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Append one line.
    #[must_use]
    pub fn add(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Prefix every line.
    #[must_use]
    pub fn indent(mut self, indent: &str) -> Self {
        for line in &mut self.lines {
            line.insert_str(0, indent);
        }
        self
    }

    /// Pad every line with `fill` to exactly `width` characters, truncating
    /// longer lines.
    #[must_use]
    pub fn pad(mut self, width: usize, fill: char) -> Self {
        for line in &mut self.lines {
            let len = line.chars().count();
            if len > width {
                *line = line.chars().take(width).collect();
            } else {
                line.extend(std::iter::repeat_n(fill, width - len));
            }
        }
        self
    }

    /// Append `suffixes[i]` to line `i`; lines without a suffix are unchanged.
    #[must_use]
    pub fn concat<S: AsRef<str>>(mut self, suffixes: &[S]) -> Self {
        for (line, suffix) in self.lines.iter_mut().zip(suffixes) {
            line.push_str(suffix.as_ref());
        }
        self
    }

    /// Strip trailing whitespace from every line.
    #[must_use]
    pub fn trim(mut self) -> Self {
        for line in &mut self.lines {
            line.truncate(line.trim_end().len());
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn join(&self, delimiter: &str) -> String {
        self.lines.join(delimiter)
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lines_and_add_append() {
        let mapper = LineMapper::new(["a"]).lines(["b", "c"]).add("d");
        assert_eq!(mapper.into_lines(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_indent() {
        let mapper = LineMapper::new(["foo", "bar"]).indent("  ");
        assert_eq!(mapper.join("\n"), "  foo\n  bar");
    }

    #[test]
    fn test_pad_fills_and_truncates() {
        let mapper = LineMapper::new(["ab", "abcdef", ""]).pad(4, '.');
        assert_eq!(mapper.into_lines(), vec!["ab..", "abcd", "...."]);
    }

    #[test]
    fn test_concat_by_index() {
        let mapper = LineMapper::new(["<size>  ", "[<colour>]"]).concat(&["Size"]);
        assert_eq!(mapper.into_lines(), vec!["<size>  Size", "[<colour>]"]);
    }

    #[test]
    fn test_trim_trailing_only() {
        let mapper = LineMapper::new(["  a  ", "\tb\t"]).trim();
        assert_eq!(mapper.into_lines(), vec!["  a", "\tb"]);
    }

    #[test]
    fn test_join_empty() {
        assert!(LineMapper::default().is_empty());
        assert_eq!(LineMapper::default().join("\n"), "");
    }
}

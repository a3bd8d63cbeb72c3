//! core::tokens
//!
//! Whitespace tokenization of command input.
//!
//! Tokens remember their byte offsets so that a trailing free-text
//! parameter can take the rest of the input verbatim, internal spacing
//! included.

/// Whitespace-delimited tokens over a borrowed input.
///
/// # Example
///
/// ```
/// use armada::core::tokens::Tokens;
///
/// let tokens = Tokens::new("say  hello   world ");
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens.get(1), Some("hello"));
/// assert_eq!(tokens.rest(1), "hello   world");
/// ```
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    spans: Vec<(usize, usize)>,
}

impl<'a> Tokens<'a> {
    /// Tokenize `input`. Blank input yields no tokens.
    pub fn new(input: &'a str) -> Self {
        let mut spans = Vec::new();
        let mut start = None;

        for (i, c) in input.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    spans.push((s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push((s, input.len()));
        }

        Self { input, spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The token at `index`.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        let input = self.input;
        self.spans.get(index).map(|&(s, e)| &input[s..e])
    }

    /// Input from the start of token `index` to the end, trailing whitespace trimmed.
    ///
    /// Empty when `index` is past the last token.
    pub fn rest(&self, index: usize) -> &'a str {
        match self.spans.get(index) {
            Some(&(s, _)) => {
                let input = self.input;
                input[s..].trim_end()
            }
            None => "",
        }
    }

    /// Owned copies of the tokens from `index` on.
    pub fn tail(&self, index: usize) -> Vec<String> {
        self.iter().skip(index).map(str::to_string).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let input = self.input;
        self.spans.iter().map(move |&(s, e)| &input[s..e])
    }
}

/// Split trimmed input into the command name and the argument tail.
///
/// The split happens on the first whitespace run; missing parts are `""`.
///
/// ```
/// use armada::core::tokens::split_command;
///
/// assert_eq!(split_command("test arg1  arg2"), ("test", "arg1  arg2"));
/// assert_eq!(split_command("test"), ("test", ""));
/// assert_eq!(split_command(""), ("", ""));
/// ```
pub fn split_command(command: &str) -> (&str, &str) {
    let command = command.trim();
    match command.find(char::is_whitespace) {
        Some(i) => (&command[..i], command[i..].trim_start()),
        None => (command, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_has_no_tokens() {
        assert!(Tokens::new("").is_empty());
        assert!(Tokens::new("   \t ").is_empty());
        assert_eq!(Tokens::new("  ").rest(0), "");
    }

    #[test]
    fn tokens_split_on_any_whitespace() {
        let tokens = Tokens::new("a\tb\n c");
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rest_preserves_inner_spacing() {
        let tokens = Tokens::new("one two   three");
        assert_eq!(tokens.rest(0), "one two   three");
        assert_eq!(tokens.rest(2), "three");
        assert_eq!(tokens.rest(3), "");
    }

    #[test]
    fn tail_collects_remaining() {
        let tokens = Tokens::new("This is a few args");
        assert_eq!(tokens.tail(2), vec!["a", "few", "args"]);
    }

    #[test]
    fn multibyte_tokens() {
        let tokens = Tokens::new("héllo wörld");
        assert_eq!(tokens.get(1), Some("wörld"));
    }

    #[test]
    fn split_command_cases() {
        assert_eq!(split_command("test arg"), ("test", "arg"));
        assert_eq!(split_command("  test   arg  "), ("test", "arg"));
        assert_eq!(split_command("test arg1 arg2"), ("test", "arg1 arg2"));
    }
}

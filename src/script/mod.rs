//! Command-script parsing.
//!
//! A script is a plain-text file with one directive per line. Lines are
//! whitespace-tokenized; the first token is the verb, the rest are
//! positional arguments. Lines starting with `#` are comments, and a line
//! starting with `/*` opens a block comment that runs until a line
//! starting with `*/`.

use std::fmt;
use std::path::Path;
use tracing::warn;

/// A single parsed script line: a verb followed by positional arguments.
///
/// No validation happens at parse time; argument counts and types are
/// checked when the directive is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    tokens: Vec<String>,
}

impl Directive {
    /// Builds a directive from pre-split tokens. Panics if `tokens` is
    /// empty; the parser only produces directives from non-blank lines.
    pub fn new(tokens: Vec<String>) -> Self {
        assert!(!tokens.is_empty(), "directive requires at least a verb");
        Self { tokens }
    }

    pub fn verb(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Reads a command script and returns its directives in file order.
///
/// Comment and blank lines contribute nothing. An unreadable file yields
/// an empty script: "no directives" is a valid outcome at this boundary,
/// and the caller decides whether that is worth reporting.
pub fn parse(path: &Path) -> Vec<Directive> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("could not read command file {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    parse_lines(&text)
}

fn parse_lines(text: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut in_comment_block = false;

    for line in text.lines() {
        let line = line.trim();

        // Block markers must be at least two characters, so a lone `/` or
        // `*` never opens or closes a block.
        if !in_comment_block && line.starts_with("/*") {
            in_comment_block = true;
        } else if in_comment_block && line.starts_with("*/") {
            in_comment_block = false;
        } else if in_comment_block {
            // Skipped regardless of content.
        } else if !line.is_empty() && !line.starts_with('#') {
            let tokens = line.split_whitespace().map(String::from).collect();
            directives.push(Directive::new(tokens));
        }
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_script(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{contents}").expect("Failed to write script");
        file.flush().expect("Failed to flush");
        file
    }

    #[test]
    fn test_parse_preserves_line_order() {
        let file = write_script("open_db a.db\nimport_images_from_directory pics cats 64 64\nclose_db\nexit\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 4, "Should parse all four directives");
        assert_eq!(script[0].verb(), "open_db");
        assert_eq!(script[1].verb(), "import_images_from_directory");
        assert_eq!(script[2].verb(), "close_db");
        assert_eq!(script[3].verb(), "exit");
    }

    #[test]
    fn test_tokens_split_on_whitespace() {
        let file = write_script("import_images_from_directory   ./pics \t cats  64 64\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 1);
        assert_eq!(script[0].verb(), "import_images_from_directory");
        assert_eq!(script[0].args(), ["./pics", "cats", "64", "64"]);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let file = write_script("\n# a comment\nopen_db a.db\n\n   \n# another\nclose_db\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 2, "Only non-comment, non-blank lines remain");
        assert_eq!(script[0].verb(), "open_db");
        assert_eq!(script[1].verb(), "close_db");
    }

    #[test]
    fn test_block_comment_skips_everything_inside() {
        let file = write_script(
            "open_db a.db\n/*\nthis is ignored\nopen_db b.db\n# even comments\n*/\nclose_db\n",
        );
        let script = parse(file.path());

        assert_eq!(script.len(), 2, "Block content contributes zero directives");
        assert_eq!(script[0].verb(), "open_db");
        assert_eq!(script[0].args(), ["a.db"]);
        assert_eq!(script[1].verb(), "close_db");
    }

    #[test]
    fn test_block_markers_with_trailing_text() {
        let file = write_script("/* start of block\nhidden\n*/ end of block\nopen_db a.db\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 1, "Marker lines themselves are consumed");
        assert_eq!(script[0].verb(), "open_db");
    }

    #[test]
    fn test_close_marker_outside_block_is_a_directive() {
        let file = write_script("*/ stray\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 1, "`*/` outside a block is not special");
        assert_eq!(script[0].verb(), "*/");
    }

    #[test]
    fn test_single_character_lines() {
        // A lone `#` is a line comment; a lone `/` is too short to open a
        // block and becomes a directive.
        let file = write_script("#\n/\n");
        let script = parse(file.path());

        assert_eq!(script.len(), 1);
        assert_eq!(script[0].verb(), "/");
        assert!(script[0].args().is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_script() {
        let script = parse(Path::new("/nonexistent/commands.txt"));
        assert!(script.is_empty(), "Unreadable file should yield no directives");
    }

    #[test]
    fn test_directive_display_joins_tokens() {
        let file = write_script("open_db some.db\n");
        let script = parse(file.path());
        assert_eq!(script[0].to_string(), "open_db some.db");
    }
}

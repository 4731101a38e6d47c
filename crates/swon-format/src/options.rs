//! Formatting options for SWON output.

/// Options for SWON output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level in multi-line output (default: 4).
    /// Zero disables indentation but keeps line breaks.
    pub indentation: usize,

    /// Write spaces after `,` and `:` and break complex collections over
    /// several lines (default: true). When off, output is a single line with
    /// no optional whitespace.
    pub pretty_print: bool,

    /// Write dictionary entries in ascending key order instead of insertion
    /// order (default: false).
    pub sort_keys: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indentation: 4,
            pretty_print: true,
            sort_keys: false,
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output without optional whitespace.
    pub fn compact(mut self) -> Self {
        self.pretty_print = false;
        self
    }

    /// Human-readable output.
    pub fn pretty(mut self) -> Self {
        self.pretty_print = true;
        self
    }

    /// Set the number of spaces per nesting level.
    pub fn indentation(mut self, spaces: usize) -> Self {
        self.indentation = spaces;
        self
    }

    /// Write dictionary keys in ascending order.
    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}

//! Options for opening documents and extracting text.

/// Options for opening PDF documents.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Error handling mode for whole-document operations
    pub error_mode: ErrorMode,

    /// Skip the `%PDF-` header check before loading
    pub skip_header_check: bool,

    /// Text extraction settings used by [`Page::extract_text`](super::Page::extract_text)
    pub extract: ExtractOptions,
}

impl OpenOptions {
    /// Create new open options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (log and skip pages that fail).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Load even if the header is missing or malformed.
    pub fn skip_header_check(mut self) -> Self {
        self.skip_header_check = true;
        self
    }

    /// Set text extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }
}

/// Error handling mode for operations that span several pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log the failure and continue with the next page
    Lenient,
}

/// Text extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Apply Unicode NFC normalization to the result
    pub normalize: bool,

    /// Strip leading and trailing whitespace from every line
    pub trim_lines: bool,

    /// TJ adjustment (thousandths of text space) above which a space is inserted
    pub space_threshold: f32,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep text exactly as decoded.
    pub fn raw() -> Self {
        Self {
            normalize: false,
            trim_lines: false,
            ..Self::default()
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_trim_lines(mut self, trim: bool) -> Self {
        self.trim_lines = trim;
        self
    }

    pub fn with_space_threshold(mut self, threshold: f32) -> Self {
        self.space_threshold = threshold;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            trim_lines: true,
            space_threshold: 200.0,
        }
    }
}

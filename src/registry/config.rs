//! Registry configuration.

/// Number of arena slots reserved up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Longest label kept, in characters.
pub const DEFAULT_MAX_LABEL_LEN: usize = 64;

/// Tunables for a `Registry`.
///
/// None of these affect authorization; they only shape memory use and
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Arena slots reserved when the registry is created.
    pub initial_capacity: usize,
    /// Labels longer than this many characters are truncated.
    pub max_label_len: usize,
}

impl RegistryConfig {
    /// Configuration with the default values.
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
        }
    }

    /// Set the number of slots reserved up front.
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the label length limit.
    pub const fn with_max_label_len(mut self, len: usize) -> Self {
        self.max_label_len = len;
        self
    }

    /// Apply the label limit, cutting at a char boundary.
    pub(crate) fn clip_label<'a>(&self, label: &'a str) -> &'a str {
        match label.char_indices().nth(self.max_label_len) {
            Some((end, _)) => &label[..end],
            None => label,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

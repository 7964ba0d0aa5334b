use pgmodel_core::NullStyle;

/// Pattern used when the caller selects no tables.
pub const DEFAULT_PATTERN: &str = "public.*";

/// Options that control how schema resolution behaves.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// `schema.table` or `schema.*` patterns.
    pub patterns: Vec<String>,
    /// Add tables reachable through foreign keys to the requested set.
    pub follow_foreign_keys: bool,
    pub null_style: NullStyle,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            follow_foreign_keys: false,
            null_style: NullStyle::Pointer,
        }
    }
}

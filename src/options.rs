//! Configuration options for rendering.
//!
//! [`RenderOptions`] controls how deep the renderer descends, how many
//! sequence items it prints and which type annotations it adds.
//!
//! ## Examples
//!
//! ```rust
//! use propstring::{to_string_with_options, RenderOptions};
//!
//! let numbers = vec![1, 2, 3, 4, 5];
//!
//! let options = RenderOptions::new().with_max_collection_item_count(2);
//! assert_eq!(to_string_with_options(&numbers, options), "[1, 2, +3 more]");
//!
//! let options = RenderOptions::new().with_root_actual_type(true);
//! assert_eq!(to_string_with_options(&15789632, options), "i32 :: 15789632");
//! ```
//!
//! Options can also be loaded from configuration files:
//!
//! ```rust
//! use propstring::RenderOptions;
//!
//! let options: RenderOptions =
//!     serde_json::from_str(r#"{ "max_recursion_level": 3 }"#).unwrap();
//! assert_eq!(options.max_recursion_level, Some(3));
//! assert!(options.render_complex_properties);
//! ```

use serde::{Deserialize, Serialize};

/// Depth limit applied by [`RenderOptions::default`].
pub const DEFAULT_MAX_RECURSION_LEVEL: usize = 10;

/// Configuration options for rendering.
///
/// `None` for a limit means unlimited. The recursion limit is on by
/// default; [`RenderOptions::unbounded`] turns both limits off.
///
/// # Examples
///
/// ```rust
/// use propstring::RenderOptions;
///
/// // Defaults: complex properties expanded, no annotations, depth 10
/// let options = RenderOptions::new();
///
/// // Every type annotation switched on
/// let options = RenderOptions::typed();
///
/// // Custom configuration
/// let options = RenderOptions::new()
///     .with_max_collection_item_count(10)
///     .with_max_recursion_level(Some(3))
///     .with_member_type(true);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Expand nested objects; when `false` they render their `describe()` text.
    pub render_complex_properties: bool,
    /// Annotate properties with their declared type.
    pub render_member_type: bool,
    /// Annotate nested values with their runtime type.
    pub render_actual_type: bool,
    /// Annotate the root value with its runtime type.
    pub render_root_actual_type: bool,
    pub max_collection_item_count: Option<usize>,
    pub max_recursion_level: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            render_complex_properties: true,
            render_member_type: false,
            render_actual_type: false,
            render_root_actual_type: false,
            max_collection_item_count: None,
            max_recursion_level: Some(DEFAULT_MAX_RECURSION_LEVEL),
        }
    }
}

impl RenderOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::RenderOptions;
    ///
    /// let options = RenderOptions::new();
    /// assert!(options.render_complex_properties);
    /// assert_eq!(options.max_collection_item_count, None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with every type annotation enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::RenderOptions;
    ///
    /// let options = RenderOptions::typed();
    /// assert!(options.render_member_type);
    /// assert!(options.render_actual_type);
    /// assert!(options.render_root_actual_type);
    /// ```
    #[must_use]
    pub fn typed() -> Self {
        RenderOptions {
            render_member_type: true,
            render_actual_type: true,
            render_root_actual_type: true,
            ..Default::default()
        }
    }

    /// Creates options without depth or collection limits.
    ///
    /// Cycles are still detected, but a very deep acyclic graph can exhaust
    /// the stack.
    #[must_use]
    pub fn unbounded() -> Self {
        RenderOptions {
            max_recursion_level: None,
            max_collection_item_count: None,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_complex_properties(mut self, enabled: bool) -> Self {
        self.render_complex_properties = enabled;
        self
    }

    #[must_use]
    pub fn with_member_type(mut self, enabled: bool) -> Self {
        self.render_member_type = enabled;
        self
    }

    #[must_use]
    pub fn with_actual_type(mut self, enabled: bool) -> Self {
        self.render_actual_type = enabled;
        self
    }

    #[must_use]
    pub fn with_root_actual_type(mut self, enabled: bool) -> Self {
        self.render_root_actual_type = enabled;
        self
    }

    /// Caps how many items of each sequence are rendered.
    ///
    /// Items past the cap are summarised as `+N more`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::RenderOptions;
    ///
    /// let options = RenderOptions::new().with_max_collection_item_count(5);
    /// assert_eq!(options.max_collection_item_count, Some(5));
    /// ```
    #[must_use]
    pub fn with_max_collection_item_count(mut self, count: usize) -> Self {
        self.max_collection_item_count = Some(count);
        self
    }

    /// Sets the depth past which nested objects and sequences are replaced
    /// by the recursion marker. `None` removes the limit.
    #[must_use]
    pub fn with_max_recursion_level(mut self, level: Option<usize>) -> Self {
        self.max_recursion_level = level;
        self
    }

    pub(crate) fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_recursion_level.map_or(false, |max| depth > max)
    }

    pub(crate) fn truncates_at(&self, rendered: usize) -> bool {
        self.max_collection_item_count
            .map_or(false, |max| rendered >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(options.render_complex_properties);
        assert!(!options.render_member_type);
        assert!(!options.render_actual_type);
        assert!(!options.render_root_actual_type);
        assert_eq!(options.max_collection_item_count, None);
        assert_eq!(
            options.max_recursion_level,
            Some(DEFAULT_MAX_RECURSION_LEVEL)
        );
    }

    #[test]
    fn test_depth_limit() {
        let options = RenderOptions::new().with_max_recursion_level(Some(2));
        assert!(!options.exceeds_depth(2));
        assert!(options.exceeds_depth(3));
        assert!(!RenderOptions::unbounded().exceeds_depth(usize::MAX));
    }

    #[test]
    fn test_collection_limit() {
        let options = RenderOptions::new().with_max_collection_item_count(0);
        assert!(options.truncates_at(0));
        assert!(!RenderOptions::new().truncates_at(1_000_000));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{ "render_member_type": true }"#).unwrap();
        assert!(options.render_member_type);
        assert_eq!(
            options.max_recursion_level,
            Some(DEFAULT_MAX_RECURSION_LEVEL)
        );
    }

    #[test]
    fn test_null_limit_in_config_means_unlimited() {
        let options: RenderOptions =
            serde_json::from_str(r#"{ "max_recursion_level": null }"#).unwrap();
        assert_eq!(options.max_recursion_level, None);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let result: std::result::Result<RenderOptions, _> =
            serde_json::from_str(r#"{ "max_collection_item_count": -1 }"#);
        assert!(result.is_err());
    }
}

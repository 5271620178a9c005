//! Configurable limits for bounded header decoding.

/// Header-level limits for decoding.
///
/// These limits are checked against every count read from the header
/// before iterating, so a corrupt or hostile header cannot force large
/// allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of dimensions.
    pub max_dimensions: usize,

    /// Maximum number of attributes in one attribute list.
    pub max_attributes: usize,

    /// Maximum number of variables.
    pub max_variables: usize,

    /// Maximum number of dimensions a single variable may reference.
    pub max_rank: usize,

    /// Maximum length of a name in bytes.
    pub max_name_len: usize,

    /// Maximum number of elements in one attribute value.
    pub max_attribute_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dimensions: 1024,
            max_attributes: 4096,
            max_variables: 8192,
            max_rank: 1024,
            max_name_len: 256,
            max_attribute_len: 1 << 20,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_dimensions: 16,
            max_attributes: 16,
            max_variables: 16,
            max_rank: 8,
            max_name_len: 32,
            max_attribute_len: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_dimensions: usize::MAX,
            max_attributes: usize::MAX,
            max_variables: usize::MAX,
            max_rank: usize::MAX,
            max_name_len: usize::MAX,
            max_attribute_len: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_fit_fixture() {
        let limits = Limits::default();
        assert!(limits.max_dimensions >= 5);
        assert!(limits.max_variables >= 5);
        assert!(limits.max_rank >= 5);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_dimensions < default_limits.max_dimensions);
        assert!(test_limits.max_attributes < default_limits.max_attributes);
        assert!(test_limits.max_variables < default_limits.max_variables);
        assert!(test_limits.max_name_len < default_limits.max_name_len);
        assert!(test_limits.max_attribute_len < default_limits.max_attribute_len);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_dimensions, usize::MAX);
        assert_eq!(limits.max_attribute_len, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_rank, 8);
    }
}

use serde::{Deserialize, Serialize};
use crate::errors::AssetIntelError;

/// How many entries a truncated view may show.
///
/// `Unbounded` is the only way to ask for everything; `AtMost(0)` is a literal
/// request for zero entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Unbounded,
    AtMost(usize),
}

impl Limit {
    /// Convert a user-supplied count. Non-positive counts are rejected; callers
    /// that mean "everything" pass `Limit::Unbounded` instead.
    pub fn from_count(count: i64) -> Result<Self, AssetIntelError> {
        if count <= 0 {
            return Err(AssetIntelError::InvalidArgument(format!(
                "count must be a positive integer, got {}",
                count
            )));
        }
        usize::try_from(count)
            .map(Limit::AtMost)
            .map_err(|_| AssetIntelError::InvalidArgument(format!("count {} is too large", count)))
    }

    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Limit::AtMost(n) = self {
            items.truncate(*n);
        }
        items
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Unbounded => f.write_str("all"),
            Limit::AtMost(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_count_rejects_non_positive() {
        assert!(matches!(Limit::from_count(0), Err(AssetIntelError::InvalidArgument(_))));
        assert!(matches!(Limit::from_count(-3), Err(AssetIntelError::InvalidArgument(_))));
        assert_eq!(Limit::from_count(5).unwrap(), Limit::AtMost(5));
    }

    #[test]
    fn test_apply() {
        assert_eq!(Limit::AtMost(2).apply(vec![1, 2, 3]), vec![1, 2]);
        assert_eq!(Limit::AtMost(0).apply(vec![1, 2, 3]), Vec::<i32>::new());
        assert_eq!(Limit::Unbounded.apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}

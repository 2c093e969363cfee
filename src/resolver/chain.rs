//! The `SelectorChain` value type.

use serde::{Deserialize, Serialize};

/// Ordered list of CSS selector candidates for one field.
///
/// Semantics are positional: earlier entries take precedence over later ones.
/// Chains are plain data so selector tables can be loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorChain(Vec<String>);

impl SelectorChain {
    /// Builds a chain from any sequence of selector strings.
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(selectors.into_iter().map(Into::into).collect())
    }

    /// Iterates the selectors in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of selectors in the chain.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the chain has no selectors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[&str]> for SelectorChain {
    fn from(selectors: &[&str]) -> Self {
        Self::new(selectors.iter().copied())
    }
}

impl From<Vec<String>> for SelectorChain {
    fn from(selectors: Vec<String>) -> Self {
        Self(selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_preserves_order() {
        let chain = SelectorChain::new(["#a", ".b", "c d"]);
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec!["#a", ".b", "c d"]);
        assert_eq!(chain.len(), 3);
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_chain_serde_is_a_plain_array() {
        let chain = SelectorChain::from(&["#productTitle", ".product-title"][..]);
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(json, r##"["#productTitle",".product-title"]"##);
        let back: SelectorChain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);
    }
}

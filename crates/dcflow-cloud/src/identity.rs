//! Logical name to live resource resolution

use crate::error::{CloudError, Result};
use crate::remote::ResourceKind;
use tracing::debug;

/// Reduce the resources found for a name to at most one
///
/// Zero matches is absence, not an error. More than one match is
/// [`CloudError::Ambiguous`]: the engine cannot pick one deterministically.
pub fn resolve_unique<T>(kind: ResourceKind, name: &str, found: Vec<T>) -> Result<Option<T>> {
    let count = found.len();
    match count {
        0 => {
            debug!(%kind, %name, "Not found");
            Ok(None)
        }
        1 => Ok(found.into_iter().next()),
        _ => Err(CloudError::Ambiguous {
            kind,
            name: name.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_zero_matches_is_absent() {
        let found: Vec<u32> = vec![];
        let resolved = resolve_unique(ResourceKind::Subnet, "x", found).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_single_match_is_returned() {
        let resolved = resolve_unique(ResourceKind::Subnet, "x", vec![7]).unwrap();
        assert_eq!(resolved, Some(7));
    }

    #[test]
    fn test_two_matches_are_ambiguous() {
        let err = resolve_unique(ResourceKind::Network, "x", vec![1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ambiguity);
        assert!(matches!(err, CloudError::Ambiguous { count: 2, .. }));
    }
}

//! AWS error classification
//!
//! SDK failures are reduced to a [`ProviderError`] carrying the service
//! error code. The code decides the kind; the engine only looks at kinds.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use dcflow_cloud::{ProviderError, ProviderErrorKind};
use std::error::Error;
use std::fmt::Debug;

/// Kind of failure an AWS error code stands for
pub fn classify(code: &str) -> ProviderErrorKind {
    match code {
        c if c.ends_with("NotFound") => ProviderErrorKind::NotFound,
        "NoSuchHostedZone" | "NoSuchChange" => ProviderErrorKind::NotFound,
        "DependencyViolation"
        | "IncorrectState"
        | "InvalidChangeBatch"
        | "Resource.AlreadyAssociated"
        | "RouteAlreadyExists" => ProviderErrorKind::Conflict,
        c if c.ends_with(".Duplicate") || c.ends_with(".InUse") => ProviderErrorKind::Conflict,
        _ => ProviderErrorKind::Other,
    }
}

/// Convert an SDK failure, keeping the service code when there is one
pub(crate) fn sdk_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    match code {
        Some(code) => ProviderError::new(classify(&code), message).with_code(code),
        None => ProviderError::other(message),
    }
}

/// A response without a field the call always returns
pub(crate) fn missing_field(operation: &str, field: &str) -> ProviderError {
    ProviderError::other(format!("{} returned no {}", operation, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        assert_eq!(classify("InvalidVpcID.NotFound"), ProviderErrorKind::NotFound);
        assert_eq!(classify("InvalidAMIID.NotFound"), ProviderErrorKind::NotFound);
        assert_eq!(classify("NoSuchHostedZone"), ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_conflict_codes() {
        assert_eq!(classify("DependencyViolation"), ProviderErrorKind::Conflict);
        assert_eq!(classify("InvalidKeyPair.Duplicate"), ProviderErrorKind::Conflict);
        assert_eq!(classify("InvalidGroup.InUse"), ProviderErrorKind::Conflict);
    }

    #[test]
    fn test_unknown_code_is_other() {
        assert_eq!(classify("UnauthorizedOperation"), ProviderErrorKind::Other);
        assert_eq!(classify("RequestLimitExceeded"), ProviderErrorKind::Other);
    }
}

//! Error types for the distmemo core library.
//!
//! Defines the error enum exposed by the public API, its stable codes and a
//! convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by [`crate::DistanceMap`] queries.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DistanceMapError {
    /// Every registered element was excluded, or nothing is registered.
    #[error("no eligible candidates: {registered} registered, {excluded} excluded")]
    NoEligibleCandidates {
        /// Number of elements registered when the query ran.
        registered: usize,
        /// Number of exclusions supplied by the caller.
        excluded: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DistanceMapError`] variants.
    enum DistanceMapErrorCode for DistanceMapError {
        /// Every registered element was excluded, or nothing is registered.
        NoEligibleCandidates => NoEligibleCandidates { .. } => "DISTMEMO_NO_ELIGIBLE_CANDIDATES",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DistanceMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_eligible_candidates_exposes_stable_code() {
        let err = DistanceMapError::NoEligibleCandidates {
            registered: 2,
            excluded: 2,
        };
        assert_eq!(err.code(), DistanceMapErrorCode::NoEligibleCandidates);
        assert_eq!(err.code().as_str(), "DISTMEMO_NO_ELIGIBLE_CANDIDATES");
        assert_eq!(
            err.to_string(),
            "no eligible candidates: 2 registered, 2 excluded"
        );
    }
}

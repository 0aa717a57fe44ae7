/// Classification of a swallowed failure.
///
/// Nothing below the fallback resolver raises. Every failure is logged with
/// its kind and then turned into an absent value.
///
/// | Kind | Typical cause | Outcome at the adapter boundary |
/// |------|---------------|---------------------------------|
/// | `Transport` | DNS, timeout, non-2xx, quota note | `None` / empty |
/// | `SchemaMismatch` | field missing or unparseable | `None` / empty |
/// | `NotFound` | provider has no data for the symbol | `None` / empty |
/// | `Cancelled` | caller dropped interest in the request | `None` / empty |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Network or HTTP-level failure, including provider throttling.
    Transport,

    /// The payload was not in the shape the normalizer expects.
    SchemaMismatch,

    /// The provider answered but had nothing for the request.
    NotFound,

    /// The caller cancelled the request.
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::SchemaMismatch => "schema_mismatch",
            Self::NotFound => "not_found",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Copy lineage rules for administrative documents.
//!
//! A document is either an original or one of three kinds of copy. Which
//! copies may be produced from a document depends only on its own kind:
//!
//! | source              | may produce                         |
//! |---------------------|-------------------------------------|
//! | original            | certified true copy, extract copy   |
//! | certified true copy | registered copy                     |
//! | registered copy     | nothing                             |
//! | extract copy        | nothing                             |
//! | unrecognised code   | nothing                             |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::{BlockReason, DomainError, DomainResult};

/// Copy type recorded on a document when it is created.
///
/// Stored codes go through the same parser as user input; a stored code
/// that names no known kind loads as [`CopyKind::Unknown`] and is blocked
/// by the authorizer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum CopyKind {
    /// Not a copy of anything.
    #[default]
    Original,
    /// Complete, faithful reproduction of an original ("sao y").
    CertifiedTrueCopy,
    /// Reproduction of a cited portion of an original ("trích sao").
    ExtractCopy,
    /// Copy of a certified true copy, registered as such ("sao lục").
    RegisteredCopy,
    /// Stored code this version does not recognise.
    Unknown,
}

impl CopyKind {
    /// Every known kind.
    pub const ALL: [CopyKind; 4] = [
        CopyKind::Original,
        CopyKind::CertifiedTrueCopy,
        CopyKind::ExtractCopy,
        CopyKind::RegisteredCopy,
    ];

    /// Canonical textual code.
    pub fn code(&self) -> &'static str {
        match self {
            CopyKind::Original => "original",
            CopyKind::CertifiedTrueCopy => "certified-true-copy",
            CopyKind::ExtractCopy => "extract-copy",
            CopyKind::RegisteredCopy => "registered-copy",
            CopyKind::Unknown => "unknown",
        }
    }

    /// Registry abbreviation used in copy symbols. Originals have none.
    pub fn abbreviation(&self) -> Option<&'static str> {
        match self {
            CopyKind::Original | CopyKind::Unknown => None,
            CopyKind::CertifiedTrueCopy => Some("SY"),
            CopyKind::ExtractCopy => Some("TrS"),
            CopyKind::RegisteredCopy => Some("SL"),
        }
    }

    /// Anything but an original; unknown kinds are assumed to be copies.
    pub fn is_copy(&self) -> bool {
        !matches!(self, CopyKind::Original)
    }

    /// Whether producing this kind needs extracted content from the caller.
    pub fn requires_extracted_content(&self) -> bool {
        matches!(self, CopyKind::ExtractCopy)
    }
}

impl fmt::Display for CopyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CopyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "original" | "none" => Ok(CopyKind::Original),
            "certified-true-copy" | "sao-y" | "saoy" | "sy" => Ok(CopyKind::CertifiedTrueCopy),
            "extract-copy" | "trich-sao" | "trichsao" | "trs" => Ok(CopyKind::ExtractCopy),
            "registered-copy" | "sao-luc" | "saoluc" | "sl" => Ok(CopyKind::RegisteredCopy),
            _ => Err(format!("unknown copy kind: {}", s)),
        }
    }
}

impl From<String> for CopyKind {
    fn from(code: String) -> Self {
        code.parse().unwrap_or_else(|_| {
            warn!("unknown stored copy kind '{}', treating as blocked", code);
            CopyKind::Unknown
        })
    }
}

impl From<CopyKind> for String {
    fn from(kind: CopyKind) -> Self {
        kind.code().to_string()
    }
}

/// Non-empty, ordered set of copy kinds a document may produce.
///
/// The first entry is the default choice offered to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKinds(Vec<CopyKind>);

impl AuthorizedKinds {
    pub fn contains(&self, kind: CopyKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn default_choice(&self) -> CopyKind {
        self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = CopyKind> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[CopyKind] {
        &self.0
    }
}

/// Copy kinds that may legally be produced from a document of kind `source`.
pub fn authorized_copy_kinds(source: CopyKind) -> DomainResult<AuthorizedKinds> {
    match source {
        CopyKind::Original => Ok(AuthorizedKinds(vec![
            CopyKind::CertifiedTrueCopy,
            CopyKind::ExtractCopy,
        ])),
        CopyKind::CertifiedTrueCopy => Ok(AuthorizedKinds(vec![CopyKind::RegisteredCopy])),
        CopyKind::RegisteredCopy | CopyKind::ExtractCopy => Err(DomainError::Blocked {
            kind: source.to_string(),
            reason: BlockReason::TerminalCopy,
        }),
        CopyKind::Unknown => Err(DomainError::Blocked {
            kind: source.to_string(),
            reason: BlockReason::UnknownKind,
        }),
    }
}

/// Like [`authorized_copy_kinds`] for a raw recorded code.
///
/// Codes that do not name a known kind are blocked.
pub fn authorize_code(code: &str) -> DomainResult<AuthorizedKinds> {
    match code.parse::<CopyKind>() {
        Ok(kind) => authorized_copy_kinds(kind),
        Err(_) => Err(DomainError::Blocked {
            kind: code.to_string(),
            reason: BlockReason::UnknownKind,
        }),
    }
}

/// Check that `requested` may be produced from `source` and that any
/// payload the requested kind demands is present.
pub fn validate_copy_request(
    source: CopyKind,
    requested: CopyKind,
    extracted_content: Option<&str>,
) -> DomainResult<()> {
    let allowed = authorized_copy_kinds(source)?;
    if !allowed.contains(requested) {
        return Err(DomainError::KindNotPermitted {
            kind: source.to_string(),
            requested: requested.to_string(),
        });
    }
    if requested.requires_extracted_content()
        && extracted_content.map_or(true, |s| s.trim().is_empty())
    {
        return Err(DomainError::MissingRequiredField {
            kind: requested.to_string(),
            field: "extracted content",
        });
    }
    Ok(())
}

/// Registry symbol of a copy, e.g. `05/SY-UBND`.
///
/// Returns `None` for kinds without a registry abbreviation.
pub fn copy_symbol(number: u32, kind: CopyKind, org_abbreviation: &str) -> Option<String> {
    kind.abbreviation()
        .map(|abbr| format!("{:02}/{}-{}", number, abbr, org_abbreviation))
}

/// Id of the original that a new copy made from `source` descends from.
pub fn lineage_root(source_id: &str, source_kind: CopyKind, source_original: Option<&str>) -> String {
    match (source_kind, source_original) {
        (CopyKind::Original, _) | (_, None) => source_id.to_string(),
        (_, Some(original)) => original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sao-y", CopyKind::CertifiedTrueCopy)]
    #[case("SY", CopyKind::CertifiedTrueCopy)]
    #[case("Registered_Copy", CopyKind::RegisteredCopy)]
    #[case("trs", CopyKind::ExtractCopy)]
    #[case(" original ", CopyKind::Original)]
    fn given_known_code_when_parsing_then_returns_kind(#[case] code: &str, #[case] expected: CopyKind) {
        assert_eq!(code.parse::<CopyKind>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_code_when_parsing_then_errors() {
        assert!("photocopy".parse::<CopyKind>().is_err());
        assert!("unknown".parse::<CopyKind>().is_err());
    }

    #[rstest]
    #[case("SY", CopyKind::CertifiedTrueCopy)]
    #[case("TrS", CopyKind::ExtractCopy)]
    #[case("sao_luc", CopyKind::RegisteredCopy)]
    #[case("ban-dien-tu", CopyKind::Unknown)]
    fn given_stored_code_when_converting_then_never_fails(
        #[case] code: &str,
        #[case] expected: CopyKind,
    ) {
        assert_eq!(CopyKind::from(code.to_string()), expected);
    }

    #[test]
    fn given_unknown_kind_when_authorizing_then_blocked() {
        assert_eq!(
            authorized_copy_kinds(CopyKind::Unknown),
            Err(DomainError::Blocked {
                kind: "unknown".into(),
                reason: BlockReason::UnknownKind,
            })
        );
    }

    #[test]
    fn given_original_when_lineage_root_then_is_source_id() {
        assert_eq!(lineage_root("doc-1", CopyKind::Original, None), "doc-1");
    }

    #[test]
    fn given_copy_with_original_when_lineage_root_then_inherits_original() {
        assert_eq!(
            lineage_root("copy-1", CopyKind::CertifiedTrueCopy, Some("doc-1")),
            "doc-1"
        );
    }

    #[test]
    fn given_original_kind_when_formatting_symbol_then_none() {
        assert_eq!(copy_symbol(1, CopyKind::Original, "UBND"), None);
    }
}

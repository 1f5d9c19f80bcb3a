//! Tests for copy lineage authorization

use rstest::rstest;

use doclineage::domain::{
    authorize_code, authorized_copy_kinds, copy_symbol, validate_copy_request, BlockReason,
    CopyKind, DomainError,
};

// ============================================================
// Rule table
// ============================================================

#[test]
fn given_original_when_authorizing_then_allows_certified_and_extract() {
    let allowed = authorized_copy_kinds(CopyKind::Original).unwrap();

    assert_eq!(
        allowed.as_slice(),
        &[CopyKind::CertifiedTrueCopy, CopyKind::ExtractCopy]
    );
    assert_eq!(allowed.default_choice(), CopyKind::CertifiedTrueCopy);
}

#[test]
fn given_certified_true_copy_when_authorizing_then_allows_registered_only() {
    let allowed = authorized_copy_kinds(CopyKind::CertifiedTrueCopy).unwrap();

    assert_eq!(allowed.as_slice(), &[CopyKind::RegisteredCopy]);
    assert!(!allowed.contains(CopyKind::CertifiedTrueCopy));
    assert!(!allowed.contains(CopyKind::ExtractCopy));
}

#[rstest]
#[case(CopyKind::RegisteredCopy)]
#[case(CopyKind::ExtractCopy)]
fn given_terminal_copy_when_authorizing_then_blocked(#[case] source: CopyKind) {
    let err = authorized_copy_kinds(source).unwrap_err();

    assert_eq!(
        err,
        DomainError::Blocked {
            kind: source.to_string(),
            reason: BlockReason::TerminalCopy,
        }
    );
}

#[test]
fn given_any_kind_when_authorizing_then_never_empty_and_within_table() {
    for source in CopyKind::ALL {
        if let Ok(allowed) = authorized_copy_kinds(source) {
            assert!(!allowed.as_slice().is_empty(), "{} produced an empty set", source);
            assert!(allowed.iter().all(|k| k.is_copy()));
        }
    }
}

#[test]
fn given_unknown_code_when_authorizing_then_fails_closed() {
    let err = authorize_code("photocopy").unwrap_err();

    assert!(matches!(
        err,
        DomainError::Blocked {
            reason: BlockReason::UnknownKind,
            ..
        }
    ));
    assert!(err.to_string().contains("photocopy"));
}

#[test]
fn given_vietnamese_code_when_authorizing_then_uses_rule_table() {
    let allowed = authorize_code("sao-y").unwrap();
    assert_eq!(allowed.as_slice(), &[CopyKind::RegisteredCopy]);
    assert!(authorize_code("sao-luc").is_err());
}

// ============================================================
// Copy requests
// ============================================================

#[test]
fn given_extract_without_content_when_validating_then_missing_required_field() {
    let err =
        validate_copy_request(CopyKind::Original, CopyKind::ExtractCopy, None).unwrap_err();

    assert!(matches!(err, DomainError::MissingRequiredField { .. }));
}

#[test]
fn given_extract_with_blank_content_when_validating_then_missing_required_field() {
    let result = validate_copy_request(CopyKind::Original, CopyKind::ExtractCopy, Some("  \n"));

    assert!(matches!(
        result,
        Err(DomainError::MissingRequiredField { .. })
    ));
}

#[test]
fn given_extract_with_content_when_validating_then_ok() {
    let result = validate_copy_request(
        CopyKind::Original,
        CopyKind::ExtractCopy,
        Some("Article 3, clause 2"),
    );

    assert!(result.is_ok());
}

#[test]
fn given_registered_from_original_when_validating_then_not_permitted() {
    let err =
        validate_copy_request(CopyKind::Original, CopyKind::RegisteredCopy, None).unwrap_err();

    assert_eq!(
        err,
        DomainError::KindNotPermitted {
            kind: "original".into(),
            requested: "registered-copy".into(),
        }
    );
}

#[test]
fn given_blocked_source_when_validating_then_blocked() {
    let result =
        validate_copy_request(CopyKind::ExtractCopy, CopyKind::CertifiedTrueCopy, None);

    assert!(matches!(result, Err(DomainError::Blocked { .. })));
}

#[test]
fn given_content_on_non_extract_when_validating_then_ignored() {
    let result = validate_copy_request(
        CopyKind::CertifiedTrueCopy,
        CopyKind::RegisteredCopy,
        Some("unused"),
    );

    assert!(result.is_ok());
}

// ============================================================
// Copy symbols
// ============================================================

#[rstest]
#[case(5, CopyKind::CertifiedTrueCopy, "UBND", "05/SY-UBND")]
#[case(12, CopyKind::ExtractCopy, "BNV", "12/TrS-BNV")]
#[case(123, CopyKind::RegisteredCopy, "UBND", "123/SL-UBND")]
fn given_copy_kind_when_formatting_symbol_then_pads_number(
    #[case] number: u32,
    #[case] kind: CopyKind,
    #[case] org: &str,
    #[case] expected: &str,
) {
    assert_eq!(copy_symbol(number, kind, org).as_deref(), Some(expected));
}

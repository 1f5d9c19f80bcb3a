//! Document copy service
//!
//! Offers the copy kinds a document may produce and creates copies,
//! re-checking the lineage rules against the stored source right before
//! the copy is persisted.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    authorized_copy_kinds, copy_symbol, lineage_root, validate_copy_request, AuthorizedKinds,
    CopyDetails, CopyKind, CopyLineageRecord, DomainError,
};
use crate::infrastructure::traits::DocumentStore;

/// Everything needed to produce one copy.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub source_id: String,
    pub kind: CopyKind,
    /// Name of the person signing the copy
    pub copied_by: String,
    pub signing_title: String,
    pub recipients: Vec<String>,
    /// Required for extract copies, ignored otherwise
    pub extracted_content: Option<String>,
    pub copy_date: NaiveDate,
}

/// Service for authorizing and creating document copies.
pub struct CopyService {
    documents: Arc<dyn DocumentStore>,
    org_abbreviation: String,
}

impl CopyService {
    /// Create a new copy service.
    pub fn new(documents: Arc<dyn DocumentStore>, org_abbreviation: impl Into<String>) -> Self {
        Self {
            documents,
            org_abbreviation: org_abbreviation.into(),
        }
    }

    /// Copy kinds the stored document `source_id` may produce.
    #[instrument(level = "debug", skip(self))]
    pub fn authorized_kinds(&self, source_id: &str) -> ApplicationResult<AuthorizedKinds> {
        let source = self.load(source_id)?;
        Ok(authorized_copy_kinds(source.copy_kind)?)
    }

    /// Validate `request` against the current source and persist the copy.
    #[instrument(level = "debug", skip(self, request), fields(source = %request.source_id, kind = %request.kind))]
    pub fn create_copy(&self, request: &CopyRequest) -> ApplicationResult<CopyLineageRecord> {
        // The source is read again here; what the caller was offered earlier
        // is not trusted.
        let source = self.load(&request.source_id)?;
        validate_copy_request(
            source.copy_kind,
            request.kind,
            request.extracted_content.as_deref(),
        )?;

        let copied_by = request.copied_by.trim();
        if copied_by.is_empty() {
            return Err(missing(request.kind, "signer name"));
        }
        let recipients: Vec<String> = request
            .recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if recipients.is_empty() {
            return Err(missing(request.kind, "recipient list"));
        }

        if request.kind.abbreviation().is_none() {
            return Err(DomainError::KindNotPermitted {
                kind: source.copy_kind.to_string(),
                requested: request.kind.to_string(),
            }
            .into());
        }

        let extracted_content = if request.kind.requires_extracted_content() {
            request.extracted_content.as_deref().map(|s| s.trim().to_string())
        } else {
            None
        };
        let original_id = lineage_root(
            &source.id,
            source.copy_kind,
            source.original_id.as_deref(),
        );
        let id = Uuid::new_v4().to_string();

        let build = |copy_number: u32| {
            // abbreviation checked above
            let symbol = copy_symbol(copy_number, request.kind, &self.org_abbreviation)
                .unwrap_or_default();
            debug!("allocated copy number {} -> {}", copy_number, symbol);
            CopyLineageRecord {
                id: id.clone(),
                title: source.title.clone(),
                number: source.number.clone(),
                copy_kind: request.kind,
                original_id: Some(original_id.clone()),
                copy: Some(CopyDetails {
                    copy_number,
                    symbol,
                    copy_date: request.copy_date,
                    copied_by: copied_by.to_string(),
                    signing_title: request.signing_title.trim().to_string(),
                    recipients: recipients.clone(),
                    extracted_content: extracted_content.clone(),
                }),
            }
        };

        let record = self
            .documents
            .insert_copy(request.copy_date.year(), &build)
            .with_context("insert copy", &id)?;
        info!("created {} copy {} of {}", record.copy_kind, record.id, source.id);
        Ok(record)
    }

    /// All copies descending from the original `original_id`.
    pub fn copies_of(&self, original_id: &str) -> ApplicationResult<Vec<CopyLineageRecord>> {
        self.documents
            .copies_of(original_id)
            .with_context("list copies", original_id)
    }

    fn load(&self, id: &str) -> ApplicationResult<CopyLineageRecord> {
        self.documents
            .get(id)
            .with_context("load document", id)?
            .ok_or_else(|| ApplicationError::DocumentNotFound(id.to_string()))
    }
}

fn missing(kind: CopyKind, field: &'static str) -> ApplicationError {
    DomainError::MissingRequiredField {
        kind: kind.to_string(),
        field,
    }
    .into()
}

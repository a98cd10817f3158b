//! Pasted and uploaded documents.

use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::extraction::{start_extraction, IdeaExtractor};
use crate::models::document::{
    Document, DocumentPurpose, DocumentType, NewDocument, ProcessingStatus,
};
use crate::store::{ContentStore, DocumentStore, ProfileStore, SharedStore};

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub document_type: DocumentType,
    pub purpose: DocumentPurpose,
}

/// Metadata sent alongside an uploaded file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub document_type: DocumentType,
    pub purpose: DocumentPurpose,
    pub file: UploadedFile,
}

/// One file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self.file_name.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Plain text of an upload: PDF via `pdf-extract`, anything else as UTF-8.
pub fn extract_text(file: &UploadedFile) -> Result<String, AppError> {
    let text = if file.is_pdf() {
        pdf_extract::extract_text_from_mem(&file.bytes).map_err(|e| {
            AppError::Validation(format!("Could not read PDF '{}': {e}", file.file_name))
        })?
    } else {
        String::from_utf8(file.bytes.to_vec()).map_err(|_| {
            AppError::Validation(format!("'{}' is not a PDF or UTF-8 text file", file.file_name))
        })?
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!(
            "'{}' contains no readable text",
            file.file_name
        )));
    }
    Ok(text.to_string())
}

fn validate_input(input: &DocumentInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Document title is required".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(AppError::Validation("Document content is required".to_string()));
    }
    Ok(())
}

async fn insert_document(
    store: &dyn ContentStore,
    input: DocumentInput,
    file_key: Option<String>,
) -> Result<Document, AppError> {
    validate_input(&input)?;
    let tenant_id = store
        .get_user(input.user_id)
        .await?
        .and_then(|user| user.tenant_id);

    let document = store
        .create_document(NewDocument {
            user_id: input.user_id,
            tenant_id,
            title: input.title.trim().to_string(),
            content: input.content,
            document_type: input.document_type,
            purpose: input.purpose,
            file_key,
        })
        .await?;

    info!(document_id = %document.id, user_id = %document.user_id, "Created document");
    Ok(document)
}

pub async fn create_pasted_document(
    store: &dyn ContentStore,
    input: DocumentInput,
) -> Result<Document, AppError> {
    insert_document(store, input, None).await
}

fn upload_key(user_id: Uuid, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("documents/{user_id}/{}/{safe_name}", Uuid::new_v4())
}

/// Extracts text, stores the original bytes in object storage, then records the document.
pub async fn upload_document(
    store: &dyn ContentStore,
    s3: &S3Client,
    bucket: &str,
    upload: UploadRequest,
) -> Result<Document, AppError> {
    let UploadRequest {
        user_id,
        title,
        document_type,
        purpose,
        file,
    } = upload;
    let content = extract_text(&file)?;
    let key = upload_key(user_id, &file.file_name);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(file.bytes.clone()))
        .content_type(
            file.content_type
                .as_deref()
                .unwrap_or("application/octet-stream"),
        )
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Upload of {key} failed: {e}")))?;

    info!("Uploaded document original to s3://{bucket}/{key}");

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(file.file_name);
    insert_document(
        store,
        DocumentInput {
            user_id,
            title,
            content,
            document_type,
            purpose,
        },
        Some(key),
    )
    .await
}

/// Starts background extraction for an existing document and returns it as
/// `processing`. A document another extraction already holds is rejected.
pub async fn trigger_extraction(
    store: SharedStore,
    extractor: Arc<dyn IdeaExtractor>,
    document_id: Uuid,
) -> Result<Document, AppError> {
    let mut document = store
        .get_document(document_id)
        .await?
        .ok_or_else(|| AppError::not_found("Document", document_id))?;

    if start_extraction(store, extractor, document.clone())
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "Document {document_id} is already being processed"
        )));
    }

    info!(%document_id, "Started idea extraction");
    document.processing_status = ProcessingStatus::Processing;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::extraction::testing::StaticExtractor;
    use crate::models::idea::IdeaSource;
    use crate::store::memory::MemoryStore;
    use crate::store::IdeaStore;

    fn text_file(name: &str, body: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::copy_from_slice(body),
        }
    }

    #[test]
    fn test_plain_text_upload_is_decoded() {
        let text = extract_text(&text_file("notes.txt", b"  Customer call notes \n")).unwrap();
        assert_eq!(text, "Customer call notes");
    }

    #[test]
    fn test_binary_upload_is_rejected() {
        let err = extract_text(&text_file("image.bin", &[0xff, 0xfe, 0x00])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        let err = extract_text(&text_file("empty.txt", b"   ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_pdf_detected_by_extension() {
        let file = UploadedFile {
            file_name: "Report.PDF".to_string(),
            content_type: None,
            bytes: Bytes::from_static(b"not really a pdf"),
        };
        assert!(file.is_pdf());
    }

    #[test]
    fn test_upload_key_is_scoped_to_user() {
        let user_id = Uuid::new_v4();
        let key = upload_key(user_id, "Q3 plan (final).pdf");
        assert!(key.starts_with(&format!("documents/{user_id}/")));
        assert!(key.ends_with("/Q3_plan__final_.pdf"));
    }

    #[tokio::test]
    async fn test_pasted_document_requires_content() {
        let store = MemoryStore::new();
        let err = create_pasted_document(
            &store,
            DocumentInput {
                user_id: Uuid::new_v4(),
                title: "Blog".to_string(),
                content: "  ".to_string(),
                document_type: DocumentType::Blog,
                purpose: DocumentPurpose::WritingSample,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_trigger_extraction_runs_for_pasted_document() {
        let store = Arc::new(MemoryStore::new());
        let document = create_pasted_document(
            store.as_ref(),
            DocumentInput {
                user_id: Uuid::new_v4(),
                title: "Pricing memo".to_string(),
                content: "We raised prices and churn fell.".to_string(),
                document_type: DocumentType::Other,
                purpose: DocumentPurpose::ContentIdea,
            },
        )
        .await
        .unwrap();

        trigger_extraction(
            store.clone(),
            Arc::new(StaticExtractor::ideas(&["Raise prices"])),
            document.id,
        )
        .await
        .unwrap();

        for _ in 0..100 {
            let current = store.get_document(document.id).await.unwrap().unwrap();
            if current.processing_status == ProcessingStatus::Completed {
                let ideas = store.list_ideas(document.user_id, None).await.unwrap();
                assert_eq!(ideas[0].source, IdeaSource::Other);
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("extraction did not complete");
    }

    #[tokio::test]
    async fn test_back_to_back_triggers_extract_once() {
        let store = Arc::new(MemoryStore::new());
        let document = create_pasted_document(
            store.as_ref(),
            DocumentInput {
                user_id: Uuid::new_v4(),
                title: "Hiring notes".to_string(),
                content: "Two engineers joined from support.".to_string(),
                document_type: DocumentType::Other,
                purpose: DocumentPurpose::ContentIdea,
            },
        )
        .await
        .unwrap();
        let extractor: Arc<dyn IdeaExtractor> =
            Arc::new(StaticExtractor::ideas(&["Support to engineering"]));

        let first = trigger_extraction(store.clone(), extractor.clone(), document.id)
            .await
            .unwrap();
        let second = trigger_extraction(store.clone(), extractor, document.id).await;

        assert_eq!(first.processing_status, ProcessingStatus::Processing);
        assert!(matches!(second, Err(AppError::Validation(_))));

        for _ in 0..100 {
            let current = store.get_document(document.id).await.unwrap().unwrap();
            if current.processing_status == ProcessingStatus::Completed {
                assert_eq!(store.idea_count(), 1);
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("extraction did not complete");
    }
}

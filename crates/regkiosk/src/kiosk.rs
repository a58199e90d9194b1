//! Capture-view orchestration.
//!
//! `Kiosk` ties the registration form, the signature pad, and an injected
//! storage gateway together. The gateway is owned here rather than held
//! as ambient state, and views only ever see re-fetched copies of the
//! collection.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::pad::SignaturePad;
use crate::records::{self, ExportFile};
use crate::registrant::{Registrant, RegistrationForm};

/// The registration kiosk: one capture surface over one record store.
pub struct Kiosk {
    gateway: Box<dyn Gateway>,
    pad: SignaturePad,
    key_includes_department: bool,
}

impl std::fmt::Debug for Kiosk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kiosk")
            .field("pad", &self.pad)
            .field("key_includes_department", &self.key_includes_department)
            .finish_non_exhaustive()
    }
}

impl Kiosk {
    /// Build a kiosk over the given gateway and pad.
    #[must_use]
    pub fn new(gateway: Box<dyn Gateway>, pad: SignaturePad, key_includes_department: bool) -> Self {
        Self {
            gateway,
            pad,
            key_includes_department,
        }
    }

    /// The signature pad, for feeding pointer input.
    pub fn pad_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    /// The signature pad, read-only.
    #[must_use]
    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    /// Submit a registration.
    ///
    /// Validates the form, requires a non-empty signature, derives the
    /// registration key, and persists through the gateway. On success the
    /// pad is cleared for the next registrant. Every error is terminal
    /// for this submission only and leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank required fields or an empty
    /// pad, `DuplicateKey` when the key is already registered, or a
    /// gateway error when persistence fails.
    pub async fn submit(&mut self, form: RegistrationForm) -> Result<Registrant> {
        form.validate()?;
        if self.pad.is_empty() {
            return Err(Error::EmptySignature);
        }

        let key = form.key(self.key_includes_department);
        let record = form.into_registrant(key, self.pad.snapshot());

        match self.gateway.create(&record).await {
            Ok(()) => {
                info!(id = %record.id, "Registration stored");
                self.pad.clear();
                Ok(record)
            }
            Err(err) => {
                if err.is_duplicate() {
                    warn!(id = %record.id, "Duplicate registration rejected");
                }
                Err(err)
            }
        }
    }

    /// All records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be queried.
    pub async fn records(&self) -> Result<Vec<Registrant>> {
        self.gateway.list().await
    }

    /// Records matching a search term, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be queried.
    pub async fn search(&self, term: &str) -> Result<Vec<Registrant>> {
        Ok(records::search(term, &self.gateway.list().await?))
    }

    /// A dated CSV export of all records.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be queried.
    pub async fn export(&self) -> Result<ExportFile> {
        Ok(records::export_file(&self.gateway.list().await?))
    }

    /// Delete one record. The caller confirms first.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be updated.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway.delete(id).await
    }

    /// Wipe the entire collection. The caller confirms first.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be updated.
    pub async fn wipe(&self) -> Result<()> {
        self.gateway.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LocalGateway;
    use crate::pad::{PointerEvent, SurfaceFrame, DEFAULT_STROKE_WIDTH};
    use crate::registrant::Department;

    fn test_kiosk() -> Kiosk {
        let gateway = LocalGateway::open_in_memory().expect("in-memory gateway");
        let pad = SignaturePad::new(SurfaceFrame::sized(64, 32), DEFAULT_STROKE_WIDTH);
        Kiosk::new(Box::new(gateway), pad, false)
    }

    fn sign(kiosk: &mut Kiosk) {
        let pad = kiosk.pad_mut();
        pad.begin_stroke(&PointerEvent::mouse(5.0, 5.0)).unwrap();
        pad.extend_stroke(&PointerEvent::mouse(30.0, 20.0)).unwrap();
        pad.end_stroke().unwrap();
    }

    fn ana_cruz() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ana".to_string(),
            middle_name: String::new(),
            last_name: "Cruz".to_string(),
            department: Department::It,
            section: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_record_with_derived_key() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);

        let record = kiosk.submit(ana_cruz()).await.unwrap();
        assert_eq!(record.id, "ana--cruz");
        assert_eq!(record.first_name, "Ana");
        assert!(!record.signature_image.is_empty());

        let records = kiosk.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
    }

    #[tokio::test]
    async fn test_submit_grows_collection_by_exactly_one() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();

        let before = kiosk.records().await.unwrap().len();
        sign(&mut kiosk);
        let mut form = ana_cruz();
        form.first_name = "Ben".to_string();
        kiosk.submit(form).await.unwrap();

        assert_eq!(kiosk.records().await.unwrap().len(), before + 1);
    }

    #[tokio::test]
    async fn test_resubmitting_identical_names_is_a_duplicate() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();

        sign(&mut kiosk);
        let err = kiosk.submit(ana_cruz()).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(kiosk.records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_department_qualified_key() {
        let gateway = LocalGateway::open_in_memory().unwrap();
        let pad = SignaturePad::new(SurfaceFrame::sized(64, 32), DEFAULT_STROKE_WIDTH);
        let mut kiosk = Kiosk::new(Box::new(gateway), pad, true);
        sign(&mut kiosk);

        let record = kiosk.submit(ana_cruz()).await.unwrap();
        assert_eq!(record.id, "ana--cruz-it");
    }

    #[tokio::test]
    async fn test_blank_field_aborts_without_state_change() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);

        let mut form = ana_cruz();
        form.last_name = "  ".to_string();
        let err = kiosk.submit(form).await.unwrap_err();
        assert!(err.is_validation());
        assert!(kiosk.records().await.unwrap().is_empty());
        // The signature survives a failed submission.
        assert!(!kiosk.pad().is_empty());
    }

    #[tokio::test]
    async fn test_empty_signature_aborts() {
        let mut kiosk = test_kiosk();
        let err = kiosk.submit(ana_cruz()).await.unwrap_err();
        assert!(matches!(err, Error::EmptySignature));
        assert!(kiosk.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pad_cleared_after_successful_submission() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();
        assert!(kiosk.pad().is_empty());
    }

    #[tokio::test]
    async fn test_search_through_kiosk() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();

        assert_eq!(kiosk.search("ana").await.unwrap().len(), 1);
        assert!(kiosk.search("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_wipe() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();

        kiosk.delete("ana--cruz").await.unwrap();
        assert!(kiosk.records().await.unwrap().is_empty());

        for name in ["Ana", "Ben", "Carla", "Dan", "Eve"] {
            sign(&mut kiosk);
            let mut form = ana_cruz();
            form.first_name = name.to_string();
            kiosk.submit(form).await.unwrap();
        }
        assert_eq!(kiosk.records().await.unwrap().len(), 5);

        kiosk.wipe().await.unwrap();
        assert!(kiosk.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_through_kiosk() {
        let mut kiosk = test_kiosk();
        sign(&mut kiosk);
        kiosk.submit(ana_cruz()).await.unwrap();

        let export = kiosk.export().await.unwrap();
        assert_eq!(export.mime_type, "text/csv");
        assert_eq!(export.contents.lines().count(), 2);
    }
}

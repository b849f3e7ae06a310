use uuid::Uuid;

use super::{
    dto::{CreateSupplierRequest, UpdateSupplierRequest},
    repo::SupplierRepository,
    repo_types::{NewSupplier, Supplier, SupplierChanges},
};
use crate::{
    error::AppError,
    validation::{required, required_if_present},
};

pub async fn create_supplier(
    repo: &dyn SupplierRepository,
    req: CreateSupplierRequest,
) -> Result<Supplier, AppError> {
    repo.insert(NewSupplier {
        name: required("name", req.name)?,
        contact: req.contact,
        email: req.email,
        phone: req.phone,
    })
    .await
}

pub async fn update_supplier(
    repo: &dyn SupplierRepository,
    id: Uuid,
    req: UpdateSupplierRequest,
) -> Result<Supplier, AppError> {
    let changes = SupplierChanges {
        name: required_if_present("name", req.name)?,
        contact: req.contact,
        email: req.email,
        phone: req.phone,
    };
    repo.update(id, changes).await?.ok_or_else(not_found)
}

pub fn not_found() -> AppError {
    AppError::NotFound("Supplier not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suppliers::repo::memory::MemorySupplierRepo;

    #[tokio::test]
    async fn only_name_is_required() {
        let repo = MemorySupplierRepo::default();
        let s = create_supplier(
            &repo,
            CreateSupplierRequest {
                name: Some("Acme".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(s.name, "Acme");
        assert!(s.contact.is_none() && s.email.is_none() && s.phone.is_none());

        let err = create_supplier(
            &repo,
            CreateSupplierRequest {
                phone: Some("555-0100".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_rejects_blank_name_and_keeps_absent_fields() {
        let repo = MemorySupplierRepo::default();
        let s = create_supplier(
            &repo,
            CreateSupplierRequest {
                name: Some("Acme".into()),
                email: Some("sales@acme.test".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let blank = UpdateSupplierRequest {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_supplier(&repo, s.id, blank).await,
            Err(AppError::Validation(_))
        ));

        let updated = update_supplier(
            &repo,
            s.id,
            UpdateSupplierRequest {
                phone: Some("555-0199".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0199"));
        assert_eq!(updated.email.as_deref(), Some("sales@acme.test"));
    }
}

//! Payloads of the customer mutation endpoints.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::customer::PaymentType;
use crate::domain::types::CustomerId;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
/// Body of `PUT /api/admin/customers/update-payment-type`.
pub struct UpdatePaymentTypeForm {
    pub customer_id: String,
    pub payment_type: u8,
}

/// Validated payment type change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTypeChange {
    pub customer_id: CustomerId,
    pub payment_type: PaymentType,
}

impl TryFrom<UpdatePaymentTypeForm> for PaymentTypeChange {
    type Error = FormError;

    fn try_from(form: UpdatePaymentTypeForm) -> Result<Self, Self::Error> {
        let customer_id =
            CustomerId::new(form.customer_id).map_err(|_| FormError::InvalidCustomerId)?;
        let payment_type =
            PaymentType::try_from(form.payment_type).map_err(|_| FormError::InvalidPaymentType)?;
        Ok(Self {
            customer_id,
            payment_type,
        })
    }
}

#[derive(MultipartForm)]
/// Multipart body of `POST /api/admin/customers/uploadCustomers`.
pub struct UploadCustomersForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

/// Uploaded workbook read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedWorkbook {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadCustomersForm {
    /// Reads the uploaded temp file.
    pub fn into_workbook(self) -> Result<UploadedWorkbook, FormError> {
        let filename = self
            .file
            .file_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or(FormError::MissingFileName)?;

        let bytes =
            std::fs::read(self.file.file.path()).map_err(|err| FormError::Io(err.to_string()))?;

        Ok(UploadedWorkbook { filename, bytes })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn upload(name: Option<&str>, contents: &[u8]) -> UploadCustomersForm {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        UploadCustomersForm {
            file: TempFile {
                file,
                content_type: None,
                file_name: name.map(str::to_string),
                size: contents.len(),
            },
        }
    }

    #[test]
    fn upload_is_read_into_memory() {
        let workbook = upload(Some("customers.xlsx"), b"PK\x03\x04").into_workbook().unwrap();
        assert_eq!(workbook.filename, "customers.xlsx");
        assert_eq!(workbook.bytes, b"PK\x03\x04".to_vec());
    }

    #[test]
    fn upload_without_file_name_is_rejected() {
        assert!(matches!(
            upload(None, b"data").into_workbook(),
            Err(FormError::MissingFileName)
        ));
        assert!(matches!(
            upload(Some("  "), b"data").into_workbook(),
            Err(FormError::MissingFileName)
        ));
    }

    #[test]
    fn payment_type_change_from_form() {
        let change = PaymentTypeChange::try_from(UpdatePaymentTypeForm {
            customer_id: "65f0a1".into(),
            payment_type: 3,
        })
        .unwrap();
        assert_eq!(change.payment_type, PaymentType::PartPayment);
        assert_eq!(change.customer_id.as_str(), "65f0a1");
    }

    #[test]
    fn rejects_unknown_payment_type_and_blank_id() {
        let bad_type = PaymentTypeChange::try_from(UpdatePaymentTypeForm {
            customer_id: "65f0a1".into(),
            payment_type: 7,
        });
        assert!(matches!(bad_type, Err(FormError::InvalidPaymentType)));

        let bad_id = PaymentTypeChange::try_from(UpdatePaymentTypeForm {
            customer_id: "  ".into(),
            payment_type: 1,
        });
        assert!(matches!(bad_id, Err(FormError::InvalidCustomerId)));
    }
}

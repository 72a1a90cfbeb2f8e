use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{NewContact, UpdateContact};
use crate::domain::import::CsvContactRow;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Form data for creating a contact.
pub struct AddContactForm {
    pub company_id: Option<i32>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
}

impl AddContactForm {
    pub fn into_new_contact(self, owner_id: i32) -> NewContact {
        NewContact::new(
            self.company_id,
            owner_id,
            self.name,
            self.email,
            self.phone,
            self.position,
            self.address,
        )
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing contact.
pub struct SaveContactForm {
    pub id: i32,
    pub company_id: Option<i32>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub address: Option<String>,
}

impl From<SaveContactForm> for UpdateContact {
    fn from(form: SaveContactForm) -> Self {
        UpdateContact::new(
            form.company_id,
            form.name,
            form.email,
            form.phone,
            form.position,
            form.address,
        )
    }
}

#[derive(MultipartForm)]
pub struct UploadContactsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadContactsForm {
    /// Parses the uploaded CSV into rows for the import worker. The header
    /// row names the columns; unknown columns are ignored. Row validation is
    /// left to the worker so that bad rows land in the failure report
    /// instead of rejecting the whole file.
    pub fn parse(&mut self) -> Result<Vec<CsvContactRow>, FormError> {
        let mut rdr = csv::Reader::from_path(self.csv.file.path())?;

        let headers = rdr.headers()?.clone();
        let mut rows = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;

            let mut row = CsvContactRow {
                row_number: idx as i32 + 1,
                name: String::new(),
                email: None,
                phone: None,
                position: None,
                address: None,
                company: None,
            };

            for (i, field) in record.iter().enumerate() {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                match headers.get(i) {
                    Some("name") => row.name = field.to_string(),
                    Some("email") => row.email = Some(field.to_string()),
                    Some("phone") => row.phone = Some(field.to_string()),
                    Some("position") => row.position = Some(field.to_string()),
                    Some("address") => row.address = Some(field.to_string()),
                    Some("company") => row.company = Some(field.to_string()),
                    _ => continue,
                }
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_requires_name() {
        let form = AddContactForm {
            company_id: None,
            name: String::new(),
            email: None,
            phone: None,
            position: None,
            address: None,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn add_form_rejects_bad_email() {
        let form = AddContactForm {
            company_id: None,
            name: "Jane".to_string(),
            email: Some("not-an-email".to_string()),
            phone: None,
            position: None,
            address: None,
        };
        assert!(form.validate().is_err());
    }
}

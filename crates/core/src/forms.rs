//! Subsidiary-specific onboarding form payloads.
//!
//! Each subsidiary collects a different statutory data shape. All fields
//! are optional at the type level so employees can save partial drafts;
//! completeness (`is_complete`) is *derived* from the payload rather than
//! asserted by the client, and submission requires a complete form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::onboarding::Subsidiary;

/// Statutory and payroll data collected for hires in India.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IndiaForm {
    #[validate(length(equal = 10))]
    pub pan: Option<String>,
    #[validate(length(equal = 12))]
    pub aadhaar: Option<String>,
    /// Universal Account Number; absent for first-time employees.
    #[validate(length(equal = 12))]
    pub uan: Option<String>,
    #[validate(length(min = 1))]
    pub bank_account_number: Option<String>,
    #[validate(length(equal = 11))]
    pub bank_ifsc: Option<String>,
    #[validate(length(min = 1))]
    pub permanent_address: Option<String>,
    #[validate(length(min = 1))]
    pub current_address: Option<String>,
    #[validate(length(min = 1))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(min = 7))]
    pub emergency_contact_phone: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

/// Payroll data collected for hires in Canada.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CanadaForm {
    #[validate(length(equal = 9))]
    pub sin: Option<String>,
    #[validate(length(equal = 3))]
    pub bank_institution_number: Option<String>,
    #[validate(length(equal = 5))]
    pub bank_transit_number: Option<String>,
    #[validate(length(min = 1))]
    pub bank_account_number: Option<String>,
    #[validate(length(min = 1))]
    pub home_address: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

/// Payroll data collected for hires in the USA.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UsaForm {
    #[validate(length(equal = 9))]
    pub ssn: Option<String>,
    #[validate(length(equal = 9))]
    pub bank_routing_number: Option<String>,
    #[validate(length(min = 1))]
    pub bank_account_number: Option<String>,
    #[validate(length(min = 1))]
    pub home_address: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

/// A parsed form payload, shape selected by subsidiary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormPayload {
    India(IndiaForm),
    Canada(CanadaForm),
    Usa(UsaForm),
}

impl FormPayload {
    /// Parse a raw JSON payload into the shape for the given subsidiary,
    /// then run field-level validation.
    pub fn parse(subsidiary: Subsidiary, value: serde_json::Value) -> Result<Self, CoreError> {
        let payload = match subsidiary {
            Subsidiary::India => serde_json::from_value::<IndiaForm>(value)
                .map(FormPayload::India)
                .map_err(|e| CoreError::Validation(format!("Malformed India form: {e}")))?,
            Subsidiary::Canada => serde_json::from_value::<CanadaForm>(value)
                .map(FormPayload::Canada)
                .map_err(|e| CoreError::Validation(format!("Malformed Canada form: {e}")))?,
            Subsidiary::Usa => serde_json::from_value::<UsaForm>(value)
                .map(FormPayload::Usa)
                .map_err(|e| CoreError::Validation(format!("Malformed USA form: {e}")))?,
        };
        payload.validate_fields()?;
        Ok(payload)
    }

    fn validate_fields(&self) -> Result<(), CoreError> {
        let result = match self {
            FormPayload::India(f) => f.validate(),
            FormPayload::Canada(f) => f.validate(),
            FormPayload::Usa(f) => f.validate(),
        };
        result.map_err(|e| CoreError::Validation(format!("Invalid form data: {e}")))
    }

    /// Whether every required field is present and non-empty.
    ///
    /// UAN (India) and date of birth are the only optional fields.
    pub fn is_complete(&self) -> bool {
        fn filled(field: &Option<String>) -> bool {
            field.as_deref().is_some_and(|v| !v.trim().is_empty())
        }
        match self {
            FormPayload::India(f) => {
                filled(&f.pan)
                    && filled(&f.aadhaar)
                    && filled(&f.bank_account_number)
                    && filled(&f.bank_ifsc)
                    && filled(&f.permanent_address)
                    && filled(&f.current_address)
                    && filled(&f.emergency_contact_name)
                    && filled(&f.emergency_contact_phone)
            }
            FormPayload::Canada(f) => {
                filled(&f.sin)
                    && filled(&f.bank_institution_number)
                    && filled(&f.bank_transit_number)
                    && filled(&f.bank_account_number)
                    && filled(&f.home_address)
            }
            FormPayload::Usa(f) => {
                filled(&f.ssn)
                    && filled(&f.bank_routing_number)
                    && filled(&f.bank_account_number)
                    && filled(&f.home_address)
            }
        }
    }

    /// Serialize back to the JSON stored in the record.
    pub fn to_value(&self) -> serde_json::Value {
        // Serialization of plain structs with serializable fields cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_india_payload() -> serde_json::Value {
        json!({
            "pan": "ABCDE1234F",
            "aadhaar": "123412341234",
            "bankAccountNumber": "00123456789",
            "bankIfsc": "HDFC0001234",
            "permanentAddress": "12 MG Road, Bengaluru",
            "currentAddress": "12 MG Road, Bengaluru",
            "emergencyContactName": "R. Sharma",
            "emergencyContactPhone": "+919812345678"
        })
    }

    #[test]
    fn full_india_form_is_complete() {
        let form = FormPayload::parse(Subsidiary::India, full_india_payload()).unwrap();
        assert!(form.is_complete());
    }

    #[test]
    fn partial_draft_parses_but_is_incomplete() {
        let form = FormPayload::parse(
            Subsidiary::India,
            json!({ "pan": "ABCDE1234F" }),
        )
        .unwrap();
        assert!(!form.is_complete());
    }

    #[test]
    fn uan_is_optional_for_completeness() {
        let mut payload = full_india_payload();
        payload["uan"] = json!("123456789012");
        let form = FormPayload::parse(Subsidiary::India, payload).unwrap();
        assert!(form.is_complete());
    }

    #[test]
    fn wrong_length_field_fails_validation() {
        let mut payload = full_india_payload();
        payload["pan"] = json!("SHORT");
        assert!(FormPayload::parse(Subsidiary::India, payload).is_err());
    }

    #[test]
    fn shape_is_selected_by_subsidiary() {
        let payload = json!({ "sin": "123456789" });
        let form = FormPayload::parse(Subsidiary::Canada, payload).unwrap();
        assert!(matches!(form, FormPayload::Canada(_)));
        assert!(!form.is_complete());
    }

    #[test]
    fn unknown_fields_are_rejected_gracefully() {
        // serde ignores unknown fields by default; the payload still parses.
        let mut payload = full_india_payload();
        payload["favouriteColour"] = json!("green");
        assert!(FormPayload::parse(Subsidiary::India, payload).is_ok());
    }

    #[test]
    fn whitespace_only_fields_do_not_count_as_filled() {
        let mut payload = full_india_payload();
        payload["permanentAddress"] = json!("   ");
        let form = FormPayload::parse(Subsidiary::India, payload).unwrap();
        assert!(!form.is_complete());
    }
}

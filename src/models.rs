use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::err::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier as the API hands it out: numeric or opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => Value::from(n),
            RecordId::Text(text) => Value::String(text),
        }
    }
}

/// Certificate status. Values outside the known set are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CertificateStatus {
    #[default]
    Active,
    Expired,
    Revoked,
    Other(String),
}

impl CertificateStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CertificateStatus::Active => "Active",
            CertificateStatus::Expired => "Expired",
            CertificateStatus::Revoked => "Revoked",
            CertificateStatus::Other(raw) => raw,
        }
    }

    /// Exact-match decoding used for API payloads.
    pub fn from_wire(raw: String) -> Self {
        match raw.as_str() {
            "Active" => CertificateStatus::Active,
            "Expired" => CertificateStatus::Expired,
            "Revoked" => CertificateStatus::Revoked,
            _ => CertificateStatus::Other(raw),
        }
    }
}

impl Display for CertificateStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Strict parsing for user input: only the known statuses are accepted.
impl FromStr for CertificateStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CertificateStatus::Active),
            "expired" => Ok(CertificateStatus::Expired),
            "revoked" => Ok(CertificateStatus::Revoked),
            _ => Err(Error::invalid_payload(format!(
                "unknown certificate status `{}`",
                s
            ))),
        }
    }
}

impl Serialize for CertificateStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CertificateStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(CertificateStatus::from_wire)
    }
}

/// A certificate as the remote API stores it.
///
/// Decoding never fails on field content: anything absent stays `None`, and
/// anything the typed fields cannot hold (unknown keys, odd ids, non-date
/// strings in date fields, `null`s) is kept in `extra` and written back as
/// received. A staged edit therefore resubmits the listed record unchanged
/// apart from what was edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Certificate {
    pub id: Option<RecordId>,
    pub student_id: Option<RecordId>,
    pub certificate_name: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    pub status: Option<CertificateStatus>,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl Certificate {
    /// Value copy used when a listed record is staged for editing.
    pub fn staged_copy(&self) -> Certificate {
        self.clone()
    }
}

impl From<Map<String, Value>> for Certificate {
    fn from(mut fields: Map<String, Value>) -> Self {
        Certificate {
            id: take(&mut fields, "id", read_id),
            student_id: take(&mut fields, "studentId", read_id),
            certificate_name: take(&mut fields, "certificateName", read_text),
            issuing_organization: take(&mut fields, "issuingOrganization", read_text),
            issue_date: take(&mut fields, "issueDate", read_date),
            expiration_date: take(&mut fields, "expirationDate", read_date),
            renewal_date: take(&mut fields, "renewalDate", read_date),
            status: take(&mut fields, "status", |v| {
                read_text(v).map(CertificateStatus::from_wire)
            }),
            description: take(&mut fields, "description", read_text),
            extra: fields,
        }
    }
}

impl From<Certificate> for Map<String, Value> {
    fn from(cert: Certificate) -> Self {
        let mut fields = cert.extra;
        put(&mut fields, "id", cert.id.map(Value::from));
        put(&mut fields, "studentId", cert.student_id.map(Value::from));
        put(&mut fields, "certificateName", cert.certificate_name.map(Value::String));
        put(
            &mut fields,
            "issuingOrganization",
            cert.issuing_organization.map(Value::String),
        );
        put(&mut fields, "issueDate", cert.issue_date.map(date_value));
        put(&mut fields, "expirationDate", cert.expiration_date.map(date_value));
        put(&mut fields, "renewalDate", cert.renewal_date.map(date_value));
        put(
            &mut fields,
            "status",
            cert.status.map(|s| Value::String(s.as_str().to_string())),
        );
        put(&mut fields, "description", cert.description.map(Value::String));
        fields
    }
}

/// Removes `key` from `fields` only when `read` understands its value.
fn take<T, F>(fields: &mut Map<String, Value>, key: &str, read: F) -> Option<T>
where
    F: FnOnce(&Value) -> Option<T>,
{
    let parsed = read(fields.get(key)?)?;
    fields.remove(key);
    Some(parsed)
}

fn put(fields: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value);
    }
}

fn read_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(n) => n.as_u64().map(RecordId::Number),
        Value::String(text) if !text.is_empty() => Some(RecordId::Text(text.clone())),
        _ => None,
    }
}

fn read_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn read_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT).ok()
}

fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

/// Register form contents: a certificate without its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<RecordId>,
    pub certificate_name: String,
    pub issuing_organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<NaiveDate>,
    pub status: CertificateStatus,
    pub description: String,
}

impl CertificateForm {
    pub fn new(default_status: CertificateStatus) -> Self {
        Self {
            status: default_status,
            ..Default::default()
        }
    }

    pub fn clear(&mut self, default_status: CertificateStatus) {
        *self = Self::new(default_status);
    }

    /// Length bounds as the form markup applies them: lengths are UTF-16
    /// code units, and an empty description is not held to the minimum.
    pub fn check_description(&self, min: usize, max: usize) -> Result<(), Error> {
        let len = self.description.encode_utf16().count();
        if len > max {
            return Err(Error::invalid_payload(format!(
                "description is {} characters, at most {} allowed",
                len, max
            )));
        }
        if len > 0 && len < min {
            return Err(Error::invalid_payload(format!(
                "description is {} characters, at least {} required",
                len, min
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_known_fields() {
        let cert: Certificate = serde_json::from_value(json!({
            "id": 4,
            "studentId": 1021,
            "certificateName": "AWS Solutions Architect",
            "issuingOrganization": "Amazon",
            "issueDate": "2024-03-01",
            "status": "Revoked",
            "description": "Associate level"
        }))
        .unwrap();

        assert_eq!(cert.id, Some(RecordId::Number(4)));
        assert_eq!(cert.student_id, Some(RecordId::Number(1021)));
        assert_eq!(cert.certificate_name.as_deref(), Some("AWS Solutions Architect"));
        assert_eq!(cert.issue_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cert.status, Some(CertificateStatus::Revoked));
        assert!(cert.extra.is_empty());
    }

    #[test]
    fn mixed_list_still_decodes() {
        let certs: Vec<Certificate> = serde_json::from_value(json!([
            { "id": 1, "status": "Active" },
            { "id": 2, "status": "Pending" },
            { "id": "a1b2", "studentId": "S-7" },
            { "id": -3, "issueDate": "01/02/2024" }
        ]))
        .unwrap();

        assert_eq!(certs.len(), 4);
        assert_eq!(certs[0].status, Some(CertificateStatus::Active));
        assert_eq!(
            certs[1].status,
            Some(CertificateStatus::Other("Pending".to_string()))
        );
        assert_eq!(certs[2].id, Some(RecordId::Text("a1b2".to_string())));
        assert_eq!(certs[2].student_id, Some(RecordId::Text("S-7".to_string())));
        assert_eq!(certs[2].status, None);
        assert_eq!(certs[3].id, None);
        assert_eq!(certs[3].issue_date, None);
        assert_eq!(certs[3].extra["id"], json!(-3));
        assert_eq!(certs[3].extra["issueDate"], json!("01/02/2024"));
    }

    #[test]
    fn listed_record_is_written_back_unchanged() {
        let listed = json!({
            "id": 3,
            "certificateName": "Rust",
            "createdAt": "2025-01-01",
            "verified": true
        });
        let cert: Certificate = serde_json::from_value(listed.clone()).unwrap();
        assert_eq!(cert.status, None);
        assert_eq!(serde_json::to_value(cert.staged_copy()).unwrap(), listed);

        let odd = json!({
            "id": 5,
            "status": "",
            "renewalDate": "",
            "expirationDate": "2027-03-01T00:00:00Z",
            "studentId": null,
            "description": "Pending review",
            "status_history": ["Active", "Pending"]
        });
        let cert: Certificate = serde_json::from_value(odd.clone()).unwrap();
        assert_eq!(serde_json::to_value(cert).unwrap(), odd);
    }

    #[test]
    fn edited_fields_replace_the_received_ones() {
        let mut cert: Certificate = serde_json::from_value(json!({
            "id": 3,
            "issueDate": "2024-03-01T00:00:00Z",
            "verified": true
        }))
        .unwrap();
        cert.issue_date = NaiveDate::from_ymd_opt(2024, 4, 1);
        cert.status = Some(CertificateStatus::Expired);

        assert_eq!(
            serde_json::to_value(cert).unwrap(),
            json!({
                "id": 3,
                "issueDate": "2024-04-01",
                "status": "Expired",
                "verified": true
            })
        );
    }

    #[test]
    fn form_serializes_camel_case_without_blank_dates() {
        let form = CertificateForm {
            certificate_name: "X".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 10, 1),
            ..CertificateForm::new(CertificateStatus::Active)
        };
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({
                "certificateName": "X",
                "issuingOrganization": "",
                "issueDate": "2025-10-01",
                "status": "Active",
                "description": ""
            })
        );
    }

    #[test]
    fn description_bounds() {
        let mut form = CertificateForm::default();
        assert!(form.check_description(10, 20).is_ok());

        form.description = "too short".to_string();
        assert!(form.check_description(10, 20).is_err());

        form.description = "just about right".to_string();
        assert!(form.check_description(10, 20).is_ok());

        form.description = "x".repeat(21);
        assert!(form.check_description(10, 20).is_err());
    }

    #[test]
    fn description_length_counts_utf16_units() {
        let form = CertificateForm {
            description: "🎓🎓".to_string(),
            ..Default::default()
        };
        assert!(form.check_description(4, 4).is_ok());
        assert!(form.check_description(1, 3).is_err());
        assert!(form.check_description(5, 10).is_err());
    }

    #[test]
    fn clear_restores_default_status() {
        let mut form = CertificateForm {
            certificate_name: "X".to_string(),
            status: CertificateStatus::Revoked,
            ..Default::default()
        };
        form.clear(CertificateStatus::Expired);
        assert_eq!(form, CertificateForm::new(CertificateStatus::Expired));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("revoked".parse::<CertificateStatus>().unwrap(), CertificateStatus::Revoked);
        assert_eq!(CertificateStatus::Expired.to_string(), "Expired");
    }

    #[test]
    fn unknown_status_error_quotes_the_input() {
        let err = "Pending".parse::<CertificateStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid payload: unknown certificate status `Pending`");
    }

    #[test]
    fn record_ids_parse_numbers_first() {
        assert_eq!("17".parse::<RecordId>().unwrap(), RecordId::Number(17));
        assert_eq!("a1b2".parse::<RecordId>().unwrap(), RecordId::Text("a1b2".to_string()));
        assert_eq!(RecordId::Text("a1b2".to_string()).to_string(), "a1b2");
    }
}

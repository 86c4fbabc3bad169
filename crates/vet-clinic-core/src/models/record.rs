//! Derived clinical records (append-only).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::appointment::AppointmentType;

/// Treatment entry derived from a completed Treatment appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    pub id: String,
    pub appointment_id: String,
    pub pet_id: String,
    pub treatment_details: String,
    /// SHA-256 of the record's canonical JSON (digest field blanked)
    pub digest: String,
    pub created_at: String,
}

/// Vaccination entry derived from a completed Vaccination appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub id: String,
    pub appointment_id: String,
    pub pet_id: String,
    #[serde(rename = "type")]
    pub record_type: AppointmentType,
    pub vaccine_name: String,
    /// Time the vaccination was recorded
    pub date: String,
    pub digest: String,
    pub created_at: String,
}

/// Either kind of derived record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClinicalRecord {
    Treatment(TreatmentRecord),
    Vaccination(VaccinationRecord),
}

impl ClinicalRecord {
    pub fn id(&self) -> &str {
        match self {
            ClinicalRecord::Treatment(r) => &r.id,
            ClinicalRecord::Vaccination(r) => &r.id,
        }
    }

    pub fn appointment_id(&self) -> &str {
        match self {
            ClinicalRecord::Treatment(r) => &r.appointment_id,
            ClinicalRecord::Vaccination(r) => &r.appointment_id,
        }
    }

    pub fn digest(&self) -> &str {
        match self {
            ClinicalRecord::Treatment(r) => &r.digest,
            ClinicalRecord::Vaccination(r) => &r.digest,
        }
    }

    /// Hash the record with its digest field blanked.
    pub fn compute_digest(&self) -> Result<String, serde_json::Error> {
        let mut blank = self.clone();
        match &mut blank {
            ClinicalRecord::Treatment(r) => r.digest.clear(),
            ClinicalRecord::Vaccination(r) => r.digest.clear(),
        }
        let payload = serde_json::to_string(&blank)?;
        Ok(hex::encode(Sha256::digest(payload.as_bytes())))
    }

    /// Fill in the digest.
    pub fn seal(mut self) -> Result<Self, serde_json::Error> {
        let digest = self.compute_digest()?;
        match &mut self {
            ClinicalRecord::Treatment(r) => r.digest = digest,
            ClinicalRecord::Vaccination(r) => r.digest = digest,
        }
        Ok(self)
    }

    /// Check the stored digest against the record contents.
    pub fn verify_digest(&self) -> bool {
        self.compute_digest()
            .map(|digest| digest == self.digest())
            .unwrap_or(false)
    }
}

/// Clinical history of one pet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalHistory {
    pub pet_id: String,
    pub treatments: Vec<TreatmentRecord>,
    pub vaccinations: Vec<VaccinationRecord>,
}

impl ClinicalHistory {
    pub fn len(&self) -> usize {
        self.treatments.len() + self.vaccinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treatment() -> ClinicalRecord {
        ClinicalRecord::Treatment(TreatmentRecord {
            id: "rec-1".into(),
            appointment_id: "appt-1".into(),
            pet_id: "pet-1".into(),
            treatment_details: "Dental cleaning".into(),
            digest: String::new(),
            created_at: "2025-08-09T00:00:00.000Z".into(),
        })
    }

    #[test]
    fn test_seal_then_verify() {
        let sealed = treatment().seal().unwrap();
        assert_eq!(sealed.digest().len(), 64);
        assert!(sealed.verify_digest());
    }

    #[test]
    fn test_tampering_breaks_digest() {
        let mut sealed = treatment().seal().unwrap();
        if let ClinicalRecord::Treatment(r) = &mut sealed {
            r.treatment_details = "Nothing happened".into();
        }
        assert!(!sealed.verify_digest());
    }

    #[test]
    fn test_wire_format_is_tagged() {
        let json = serde_json::to_value(treatment()).unwrap();
        assert_eq!(json["kind"], "treatment");
        assert_eq!(json["appointmentId"], "appt-1");
    }
}

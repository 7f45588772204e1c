//! Target schemas a source file can be mapped onto.

use std::fmt;
use std::str::FromStr;

use claims_model::CanonicalField;
use serde::{Deserialize, Serialize};

/// A target field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    /// camelCase identifier.
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Common source spellings, compared after normalization.
    pub synonyms: &'static [&'static str],
}

const CLAIMS_FIELDS: &[SchemaField] = &[
    SchemaField {
        name: "claimantId",
        label: "Claimant ID",
        required: true,
        synonyms: &[
            "member id",
            "member number",
            "subscriber id",
            "patient id",
            "customer id",
            "employee id",
            "person id",
        ],
    },
    SchemaField {
        name: "claimDate",
        label: "Claim Date",
        required: true,
        synonyms: &[
            "service date",
            "date of service",
            "dos",
            "incurred date",
            "fill date",
            "paid date",
        ],
    },
    SchemaField {
        name: "serviceType",
        label: "Service Type",
        required: true,
        synonyms: &[
            "claim type",
            "benefit type",
            "coverage type",
            "service category",
            "svc type",
        ],
    },
    SchemaField {
        name: "medicalAmount",
        label: "Medical Amount",
        required: false,
        synonyms: &["medical paid", "medical cost", "paid amount", "med amt"],
    },
    SchemaField {
        name: "pharmacyAmount",
        label: "Pharmacy Amount",
        required: false,
        synonyms: &["rx paid", "pharmacy paid", "pharmacy cost", "rx amt", "plan paid"],
    },
    SchemaField {
        name: "totalAmount",
        label: "Total Amount",
        required: false,
        synonyms: &["total paid", "total cost", "billed amount", "total"],
    },
    SchemaField {
        name: "icdCode",
        label: "ICD Code",
        required: false,
        synonyms: &["diagnosis code", "dx code", "icd10", "diagnosis"],
    },
    SchemaField {
        name: "medicalDesc",
        label: "Medical Description",
        required: false,
        synonyms: &["diagnosis description", "icd description", "description"],
    },
    SchemaField {
        name: "laymanTerm",
        label: "Layman Term",
        required: false,
        synonyms: &["condition", "plain language", "common name"],
    },
    SchemaField {
        name: "provider",
        label: "Provider",
        required: false,
        synonyms: &["provider name", "rendering provider", "pharmacy name", "facility"],
    },
    SchemaField {
        name: "location",
        label: "Location",
        required: false,
        synonyms: &["state", "place of service", "region", "city"],
    },
];

const EXPERIENCE_FIELDS: &[SchemaField] = &[
    SchemaField {
        name: "month",
        label: "Month",
        required: true,
        synonyms: &["period", "incurred month", "month key", "paid month"],
    },
    SchemaField {
        name: "medicalClaims",
        label: "Medical Claims",
        required: true,
        synonyms: &["medical", "medical paid", "med claims"],
    },
    SchemaField {
        name: "pharmacyClaims",
        label: "Pharmacy Claims",
        required: true,
        synonyms: &["pharmacy", "rx", "rx claims", "rx paid"],
    },
    SchemaField {
        name: "premium",
        label: "Premium",
        required: false,
        synonyms: &["premiums", "premium paid", "contribution"],
    },
    SchemaField {
        name: "enrollment",
        label: "Enrollment",
        required: false,
        synonyms: &["members", "enrolled", "employees", "member months"],
    },
    SchemaField {
        name: "stopLossReimbursement",
        label: "Stop-Loss Reimbursement",
        required: false,
        synonyms: &["stop loss", "reimbursement", "stoploss reimb"],
    },
];

/// Which kind of file is being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Claim-level rows (the canonical claim fields).
    #[default]
    Claims,
    /// Monthly experience summaries.
    Experience,
}

impl SchemaType {
    pub const ALL: [SchemaType; 2] = [Self::Claims, Self::Experience];

    pub fn fields(&self) -> &'static [SchemaField] {
        match self {
            Self::Claims => CLAIMS_FIELDS,
            Self::Experience => EXPERIENCE_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static SchemaField> {
        self.fields()
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static SchemaField> {
        self.fields().iter().filter(|field| field.required)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claims => "claims",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claims" | "claim" => Ok(Self::Claims),
            "experience" | "exp" => Ok(Self::Experience),
            other => Err(format!("unknown schema type: {other}")),
        }
    }
}

/// Claims schema field names agree with [`CanonicalField::as_str`].
pub fn canonical_field(name: &str) -> Option<CanonicalField> {
    name.parse().ok()
}

use serde::{Deserialize, Serialize};

/// Phone numbers of the two companies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// Company A's number (E.164).
    #[serde(default)]
    pub a_number: String,

    /// Company B's number (E.164).
    #[serde(default)]
    pub b_number: String,
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two companies the dialer can call on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Company {
    /// Company A, also the fallback for any unrecognized selector.
    #[default]
    A,
    /// Company B.
    B,
}

impl Company {
    /// Resolve a raw selector coming from a form or query string.
    ///
    /// Only an exact `"B"` selects company B; absent, empty and unknown
    /// selectors all resolve to company A.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("B") => Company::B,
            _ => Company::A,
        }
    }

    /// Selector string used on the wire (`"A"` or `"B"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Company::A => "A",
            Company::B => "B",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The phone numbers owned by each company, used as caller ID and as the
/// filter for call history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyNumbers {
    /// Company A's number in E.164 form.
    pub a: String,
    /// Company B's number in E.164 form.
    pub b: String,
}

impl CompanyNumbers {
    /// Create the number table.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Number configured for `company`.
    pub fn number_for(&self, company: Company) -> &str {
        match company {
            Company::A => &self.a,
            Company::B => &self.b,
        }
    }
}

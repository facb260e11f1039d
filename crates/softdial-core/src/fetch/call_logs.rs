use crate::{
    CoreResult,
    model::{CallLogs, CallRecord, Company, CompanyNumbers},
    telephony::{CallQuery, TelephonyApi, UpstreamCall},
};

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, info, instrument};

/// Calls requested upstream for each direction of each company number.
pub const CALLS_PER_DIRECTION: usize = 25;

/// Most recent calls kept per company after merging both directions.
pub const MAX_CALLS_PER_COMPANY: usize = 50;

/// Builds the per-company call history shown in the dialer.
pub struct CallLogFetcher {
    telephony: Arc<dyn TelephonyApi>,
}

impl CallLogFetcher {
    /// Create a fetcher over `telephony`.
    pub fn new(telephony: Arc<dyn TelephonyApi>) -> Self {
        Self { telephony }
    }

    /// Fetch recent calls to and from both company numbers.
    ///
    /// Both companies are queried concurrently. Any upstream failure fails
    /// the whole fetch; partial histories are never returned.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the platform cannot be queried.
    #[instrument(skip(self))]
    pub async fn fetch_call_logs(&self, numbers: &CompanyNumbers) -> CoreResult<CallLogs> {
        let (a, b) = tokio::try_join!(
            self.fetch_company(Company::A, numbers.number_for(Company::A)),
            self.fetch_company(Company::B, numbers.number_for(Company::B)),
        )?;

        info!(company_a = a.len(), company_b = b.len(), "Call logs fetched");

        Ok(CallLogs { a, b })
    }

    #[instrument(skip(self))]
    async fn fetch_company(&self, company: Company, number: &str) -> CoreResult<Vec<CallRecord>> {
        let (outbound, inbound) = tokio::try_join!(
            self.telephony
                .list_calls(CallQuery::from_number(number, CALLS_PER_DIRECTION)),
            self.telephony
                .list_calls(CallQuery::to_number(number, CALLS_PER_DIRECTION)),
        )?;

        debug!(
            company = %company,
            outbound = outbound.len(),
            inbound = inbound.len(),
            "Company calls listed"
        );

        Ok(merge_call_history(outbound, inbound))
    }
}

/// Merge both directions of one number's calls into a single history.
///
/// Newest first by start time (creation time when the call never started).
/// The sort is stable, so calls with equal or missing timestamps keep the
/// platform's order. A call listed in both directions appears once, and the
/// result is capped at [`MAX_CALLS_PER_COMPANY`].
pub fn merge_call_history(outbound: Vec<UpstreamCall>, inbound: Vec<UpstreamCall>) -> Vec<CallRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<UpstreamCall> = outbound
        .into_iter()
        .chain(inbound)
        .filter(|call| seen.insert(call.sid.clone()))
        .collect();

    merged.sort_by(|x, y| y.sort_time().cmp(&x.sort_time()));
    merged.truncate(MAX_CALLS_PER_COMPANY);

    merged.into_iter().map(UpstreamCall::into_record).collect()
}

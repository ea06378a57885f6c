//! Overdue loan sweep.
//!
//! Scans the ledger for unreturned loans past the threshold and notifies
//! every affected customer in a single gateway call. There is no persisted
//! "already notified" state: a loan that stays overdue is re-notified on
//! every run until it is returned.

use std::sync::Arc;

use crate::{
    config::SweepConfig,
    error::AppResult,
    services::{email::NotificationGateway, loans::LoansService},
};

/// Policy constant: a loan is overdue once it is at least this many days old.
pub const OVERDUE_THRESHOLD_DAYS: i64 = 3;

#[derive(Clone)]
pub struct OverdueSweep {
    loans: LoansService,
    notifier: Arc<dyn NotificationGateway>,
    config: SweepConfig,
}

impl OverdueSweep {
    pub fn new(
        loans: LoansService,
        notifier: Arc<dyn NotificationGateway>,
        config: SweepConfig,
    ) -> Self {
        Self {
            loans,
            notifier,
            config,
        }
    }

    /// One sweep invocation. A gateway failure propagates and aborts this
    /// run only; the next scheduled run is unaffected.
    pub async fn run(&self) -> AppResult<()> {
        let overdue = self.loans.overdue_loans(OVERDUE_THRESHOLD_DAYS).await?;

        if overdue.is_empty() {
            tracing::debug!("Overdue sweep: no overdue loans");
            return Ok(());
        }

        let recipients: Vec<String> = overdue
            .iter()
            .map(|loan| loan.customer_email.clone())
            .collect();

        tracing::info!(count = recipients.len(), "Overdue sweep: notifying customers");

        self.notifier
            .send(
                &self.config.overdue_subject,
                &self.config.overdue_message,
                &recipients,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        error::AppError,
        models::loan::Loan,
        repository::{MockBookStore, MockLoanStore, Repository},
        services::email::MockNotificationGateway,
    };

    fn loan_aged(id: i64, days: i64, returned: Option<bool>) -> Loan {
        Loan {
            id,
            book_id: id,
            isbn: format!("isbn-{}", id),
            customer: format!("customer-{}", id),
            customer_email: format!("customer-{}@example.com", id),
            loan_date: Utc::now().date_naive() - Duration::days(days),
            returned,
        }
    }

    fn sweep(loans: MockLoanStore, notifier: MockNotificationGateway) -> OverdueSweep {
        let repository = Repository::from_parts(Arc::new(MockBookStore::new()), Arc::new(loans));
        OverdueSweep::new(
            LoansService::new(repository),
            Arc::new(notifier),
            SweepConfig::default(),
        )
    }

    #[tokio::test]
    async fn notifies_every_overdue_customer_in_one_call() {
        // Store-side filtering already excluded the fresh and returned
        // loans; the sweep forwards exactly what the ledger reports.
        let mut loans = MockLoanStore::new();
        loans.expect_find_overdue_before().return_once(|_| {
            Ok(vec![
                loan_aged(1, 10, None),
                loan_aged(2, 8, Some(false)),
                loan_aged(3, 14, None),
            ])
        });

        let mut notifier = MockNotificationGateway::new();
        notifier
            .expect_send()
            .withf(|_, _, recipients| {
                recipients.iter().map(String::as_str).eq([
                    "customer-1@example.com",
                    "customer-2@example.com",
                    "customer-3@example.com",
                ])
            })
            .return_once(|_, _, _| Ok(()));

        sweep(loans, notifier).run().await.unwrap();
    }

    #[tokio::test]
    async fn skips_the_gateway_when_nothing_is_overdue() {
        let mut loans = MockLoanStore::new();
        loans.expect_find_overdue_before().return_once(|_| Ok(vec![]));

        let mut notifier = MockNotificationGateway::new();
        notifier.expect_send().never();

        sweep(loans, notifier).run().await.unwrap();
    }

    #[tokio::test]
    async fn gateway_failure_aborts_the_run() {
        let mut loans = MockLoanStore::new();
        loans
            .expect_find_overdue_before()
            .return_once(|_| Ok(vec![loan_aged(1, 10, None)]));

        let mut notifier = MockNotificationGateway::new();
        notifier
            .expect_send()
            .return_once(|_, _, _| Err(AppError::Internal("smtp down".to_string())));

        let err = sweep(loans, notifier).run().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}

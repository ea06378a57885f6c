//! Business logic services

pub mod catalog;
pub mod email;
pub mod loans;
pub mod overdue;

use std::sync::Arc;

use crate::{config::EmailConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub notifier: Arc<dyn email::NotificationGateway>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, email_config: EmailConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
            notifier: Arc::new(email::EmailService::new(email_config)),
        }
    }

    #[cfg(test)]
    pub fn with_notifier(
        repository: Repository,
        notifier: Arc<dyn email::NotificationGateway>,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
            notifier,
        }
    }
}

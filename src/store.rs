// src/store.rs

use crate::domain::record::AnalyzedProperty;
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// The session's portfolio: one uploaded CRM export, already derived.
/// Replaced wholesale by the next upload; never persisted.
#[derive(Debug)]
pub struct Portfolio {
    pub properties: Vec<AnalyzedProperty>,
    pub uploaded_at: DateTime<Utc>,
    /// Rows dropped at ingest for having no identity.
    pub skipped_rows: usize,
}

/// Cheap cloneable handle to the in-memory portfolio, passed into the serve
/// closure and threaded through route handlers the way a database handle
/// would be.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Option<Portfolio>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a freshly processed portfolio, dropping the previous one.
    pub fn replace(&self, portfolio: Portfolio) -> Result<(), ServerError> {
        let mut slot = self.inner.write().map_err(|_| ServerError::InternalError)?;
        *slot = Some(portfolio);
        Ok(())
    }

    /// Read access for views and exports. Errors with `NoPortfolio` until
    /// the first successful upload, which routes render as an inline
    /// "upload a CSV first" message.
    pub fn with_portfolio<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Portfolio) -> Result<T, ServerError>,
    {
        let slot = self.inner.read().map_err(|_| ServerError::InternalError)?;
        match slot.as_ref() {
            Some(portfolio) => f(portfolio),
            None => Err(ServerError::NoPortfolio),
        }
    }

    /// Write access, used only by the CRM enrichment pass.
    pub fn with_portfolio_mut<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Portfolio) -> Result<T, ServerError>,
    {
        let mut slot = self.inner.write().map_err(|_| ServerError::InternalError)?;
        match slot.as_mut() {
            Some(portfolio) => f(portfolio),
            None => Err(ServerError::NoPortfolio),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_no_portfolio() {
        let store = Store::new();
        assert!(!store.is_loaded());
        let err = store.with_portfolio(|_| Ok(())).unwrap_err();
        assert!(matches!(err, ServerError::NoPortfolio));
    }

    #[test]
    fn replace_publishes_and_clones_share_state() {
        let store = Store::new();
        let handle = store.clone();

        store
            .replace(Portfolio {
                properties: Vec::new(),
                uploaded_at: Utc::now(),
                skipped_rows: 2,
            })
            .unwrap();

        let skipped = handle
            .with_portfolio(|p| Ok(p.skipped_rows))
            .unwrap();
        assert_eq!(skipped, 2);
    }
}

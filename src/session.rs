//! One dashboard session: configuration, adapters and the current table.

use std::path::Path;

use log::warn;

use crate::backup::{backup, storage_from_config, RemoteStorage};
use crate::config::DashboardConfig;
use crate::error::AdapterResult;
use crate::filter::{effective_period, filter_leads};
use crate::metrics::summarize;
use crate::notify::{notifier_from_config, notify_all, Notifier};
use crate::render::DashboardView;
use crate::report::build_report;
use crate::sentiment::{classifier_from_config, classify_all, SentimentClassifier};
use crate::source::{load, source_from_config, LeadSource};
use crate::types::{FilterCriteria, Lead, LeadTable, NotifyReport};

pub const DASHBOARD_TITLE: &str = "Social Seller Dashboard";

pub struct Session {
    config: DashboardConfig,
    source: Box<dyn LeadSource>,
    classifier: Box<dyn SentimentClassifier>,
    notifier: Box<dyn Notifier>,
    storage: Box<dyn RemoteStorage>,
    table: LeadTable,
}

impl Session {
    /// Build the adapters named in `config`; the table starts empty until [`Session::refresh`]
    pub fn from_config(root: &Path, config: DashboardConfig) -> AdapterResult<Self> {
        let source = source_from_config(root, &config.source)?;
        let classifier = classifier_from_config(&config.sentiment)?;
        let notifier = notifier_from_config(&config.notify.channel)?;
        let storage = storage_from_config(&config.backup)?;
        Ok(Self::with_adapters(config, source, classifier, notifier, storage))
    }

    pub fn with_adapters(
        config: DashboardConfig,
        source: Box<dyn LeadSource>,
        classifier: Box<dyn SentimentClassifier>,
        notifier: Box<dyn Notifier>,
        storage: Box<dyn RemoteStorage>,
    ) -> Self {
        Self {
            config,
            source,
            classifier,
            notifier,
            storage,
            table: LeadTable::empty(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &LeadTable {
        &self.table
    }

    /// Reload from the data source.
    ///
    /// An empty reload never replaces a table that has rows. Returns a
    /// warning for the user when the reload produced nothing.
    pub fn refresh(&mut self) -> Option<String> {
        let fresh = load(self.source.as_ref());

        if !fresh.is_empty() {
            self.table = fresh;
            return None;
        }

        let message = if self.table.is_empty() {
            format!("Lead data is unavailable from {}", self.source.describe())
        } else {
            format!(
                "Reload from {} returned no rows; keeping the {} leads loaded earlier",
                self.source.describe(),
                self.table.len()
            )
        };
        warn!("{}", message);
        Some(message)
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Lead> {
        filter_leads(&self.table.leads, criteria)
    }

    pub fn view(&self, criteria: &FilterCriteria) -> DashboardView {
        DashboardView::build(DASHBOARD_TITLE, &self.table, criteria, self.classifier.as_ref())
    }

    /// Message every lead matching `criteria`
    pub fn notify(&self, criteria: &FilterCriteria) -> NotifyReport {
        notify_all(
            &self.filtered(criteria),
            &self.config.notify.template,
            self.notifier.as_ref(),
        )
    }

    /// PDF summary of the leads matching `criteria`
    pub fn report(&self, criteria: &FilterCriteria) -> Vec<u8> {
        let subset = self.filtered(criteria);
        let sentiments = classify_all(self.classifier.as_ref(), &subset);
        let summary = summarize(&subset, &sentiments);
        let period = effective_period(&self.table.leads, criteria);
        build_report(&self.config.report, &summary, &period)
    }

    pub fn backup(&self, path: &Path) -> bool {
        backup(self.storage.as_ref(), path)
    }
}

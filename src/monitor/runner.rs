//! The check pass and the scheduled monitor loop
//!
//! One pass scrapes BIS and fetches 311 complaints for every monitored
//! address, diffs against the stored snapshots, persists, and notifies
//! owners. Failures are per-address: a dead upstream or an unparseable
//! address never aborts the run.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, ConfigStore};
use crate::domain::address::parser;
use crate::domain::complaint::service::ComplaintService;
use crate::domain::owner::service::OwnerService;
use crate::domain::status::service::StatusService;
use crate::notify::DiscordAlert;
use crate::scrape::{BisClient, OpenDataClient};
use crate::utils::AppError;

use super::report::{diff_violations, BisChange, CheckOutcome, NewComplaints};

/// Addresses scraped between pauses; BIS is a shared municipal server.
const BATCH_SIZE: usize = 10;
const BATCH_DELAY: Duration = Duration::from_secs(3);

/// Attempts per address within a pass, with a short pause between them.
const BIS_ATTEMPTS: u32 = 2;
const BIS_ATTEMPT_DELAY: Duration = Duration::from_secs(2);

/// Pause before the second pass over addresses whose BIS scrape failed.
const RETRY_PASS_DELAY: Duration = Duration::from_secs(60);

/// Pause after an unexpected top-level error before looping again.
const ERROR_BACKOFF: Duration = Duration::from_secs(300);

const COMPLAINT_FETCH_LIMIT: u32 = 20;

pub struct CheckRunner {
    db: DatabaseConnection,
    config: AppConfig,
    files: ConfigStore,
    alert: DiscordAlert,
}

impl CheckRunner {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let files = ConfigStore::new(config.config_dir.clone());
        Self {
            db,
            config,
            files,
            alert: DiscordAlert::new(),
        }
    }

    /// The scheduled daemon loop. Runs a check, then sleeps until the
    /// next hour in the (re-read) schedule file. A failed pass backs
    /// off for five minutes instead of waiting for the next slot.
    pub async fn run_loop(&self) {
        loop {
            match self.run_check(None).await {
                Ok(outcome) => {
                    info!(
                        checked = outcome.checked_addresses.len(),
                        failed = outcome.failed_addresses.len(),
                        "Check pass completed"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Check pass failed; retrying in 5 minutes");
                    if self.config.run_once {
                        return;
                    }
                    sleep(ERROR_BACKOFF).await;
                    continue;
                }
            }

            if self.config.run_once {
                info!("MONITOR_RUN_ONCE set; exiting after single check");
                return;
            }

            let schedule = self.files.load_schedule();
            let next = schedule.next_run_after(Utc::now());
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            info!(next_run = %next, "Next check scheduled");
            sleep(wait).await;
        }
    }

    /// Run one check pass. `owner_scope` restricts the pass to one
    /// owner's addresses and notifies only that owner.
    pub async fn run_check(&self, owner_scope: Option<i64>) -> Result<CheckOutcome, AppError> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, owner_scope = ?owner_scope, "Starting building monitor check");

        let addresses = match owner_scope {
            Some(owner_id) => OwnerService::owner_addresses(&self.db, owner_id).await?,
            None => self.files.load_addresses(),
        };
        if addresses.is_empty() {
            warn!("No addresses found to check");
            return Ok(CheckOutcome::default());
        }

        let bis_client = BisClient::new(
            &self.config.bis_base_url,
            self.files.load_proxy().as_deref(),
        )?;
        let open_data = OpenDataClient::new(&self.config.open_data_base_url)?;

        let previous = StatusService::violation_snapshot(&self.db).await?;
        let mut known_ids = ComplaintService::known_incident_ids(&self.db).await?;

        let mut outcome = CheckOutcome {
            checked_addresses: addresses.clone(),
            ..Default::default()
        };
        let mut bis_retry: Vec<String> = Vec::new();

        for (batch_index, batch) in addresses.chunks(BATCH_SIZE).enumerate() {
            if batch_index > 0 {
                sleep(BATCH_DELAY).await;
            }
            for address in batch {
                self.check_address(
                    address,
                    &bis_client,
                    &open_data,
                    &previous,
                    &mut known_ids,
                    &mut outcome,
                    &mut bis_retry,
                )
                .await;
            }
        }

        // Second chance for addresses whose BIS scrape failed; the
        // servlet recovers from overload quickly.
        if !bis_retry.is_empty() {
            warn!(
                count = bis_retry.len(),
                "Retrying failed addresses in 60 seconds"
            );
            sleep(RETRY_PASS_DELAY).await;
            for address in &bis_retry {
                // Everything on the retry list parsed on the first pass
                let Ok(parsed) = parser::parse_for_bis(address) else {
                    continue;
                };
                let recovered = self
                    .check_bis(address, &parsed, &bis_client, &previous, &mut outcome)
                    .await;
                if !recovered {
                    mark_failed(&mut outcome, address);
                }
            }
        }

        self.notify(&outcome, owner_scope).await?;

        info!(run_id = %run_id, "Building monitor check completed");
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    async fn check_address(
        &self,
        address: &str,
        bis_client: &BisClient,
        open_data: &OpenDataClient,
        previous: &std::collections::HashMap<String, (i32, i32)>,
        known_ids: &mut HashSet<String>,
        outcome: &mut CheckOutcome,
        bis_retry: &mut Vec<String>,
    ) {
        info!(address = %address, "Processing address");

        // BIS counters
        match parser::parse_for_bis(address) {
            Ok(parsed) => {
                let ok = self
                    .check_bis(address, &parsed, bis_client, previous, outcome)
                    .await;
                if !ok {
                    bis_retry.push(address.to_string());
                    warn!(address = %address, "Added to retry list");
                }
            }
            Err(e) => {
                error!(address = %address, error = %e, "Skipping BIS check due to parse error");
            }
        }

        // 311 complaints
        match parser::parse_for_311(address) {
            Ok(parsed) => {
                if let Err(e) = self
                    .check_311(address, &parsed, open_data, known_ids, outcome)
                    .await
                {
                    error!(address = %address, error = %e, "Failed 311 check");
                    mark_failed(outcome, address);
                }
            }
            Err(e) => {
                error!(address = %address, error = %e, "Skipping 311 check due to parse error");
            }
        }
    }

    /// Scrape BIS for one address, diff, and persist. Returns whether
    /// the scrape succeeded; the caller decides about retries.
    async fn check_bis(
        &self,
        address: &str,
        parsed: &parser::BisAddress,
        bis_client: &BisClient,
        previous: &std::collections::HashMap<String, (i32, i32)>,
        outcome: &mut CheckOutcome,
    ) -> bool {
        let mut summary = None;
        for attempt in 1..=BIS_ATTEMPTS {
            match bis_client.property_summary(parsed).await {
                Ok(s) => {
                    summary = Some(s);
                    break;
                }
                Err(e) => {
                    error!(
                        address = %address,
                        attempt,
                        error = %e,
                        "Failed BIS check"
                    );
                    if attempt < BIS_ATTEMPTS {
                        sleep(BIS_ATTEMPT_DELAY).await;
                    }
                }
            }
        }
        let Some(summary) = summary else {
            return false;
        };

        let owners = match OwnerService::owners_for_address(&self.db, address).await {
            Ok(owners) => owners,
            Err(e) => {
                error!(address = %address, error = %e, "Failed to resolve owners");
                vec![]
            }
        };

        let changes = diff_violations(previous.get(address).copied(), &summary);
        if !changes.is_empty() {
            info!(address = %address, changes = changes.len(), "Found BIS changes");
            outcome.record_bis_change(
                &owners,
                BisChange {
                    address: address.to_string(),
                    changes,
                    new_totals: summary,
                },
            );
        }

        if let Err(e) =
            StatusService::upsert_snapshot(&self.db, address, &summary, Utc::now().naive_utc())
                .await
        {
            error!(address = %address, error = %e, "Failed to store snapshot");
            return false;
        }

        // Grab the BIN on the first successful check; the violation
        // detail endpoints need it.
        self.backfill_bin(address, parsed, bis_client).await;

        true
    }

    async fn backfill_bin(
        &self,
        address: &str,
        parsed: &parser::BisAddress,
        bis_client: &BisClient,
    ) {
        match StatusService::get_bin(&self.db, address).await {
            Ok(Some(_)) => {}
            Ok(None) => match bis_client.building_identification_number(parsed).await {
                Ok(Some(bin)) => {
                    if let Err(e) = StatusService::set_bin(&self.db, address, &bin).await {
                        error!(address = %address, error = %e, "Failed to store BIN");
                    }
                }
                Ok(None) => {
                    warn!(address = %address, "No BIN found on BIS page");
                }
                Err(e) => {
                    warn!(address = %address, error = %e, "BIN scrape failed");
                }
            },
            Err(e) => {
                error!(address = %address, error = %e, "Failed to read stored BIN");
            }
        }
    }

    async fn check_311(
        &self,
        address: &str,
        parsed: &parser::Complaint311Address,
        open_data: &OpenDataClient,
        known_ids: &mut HashSet<String>,
        outcome: &mut CheckOutcome,
    ) -> Result<(), AppError> {
        let complaints = open_data
            .recent_complaints(parsed, COMPLAINT_FETCH_LIMIT)
            .await?;

        let new_complaints: Vec<_> = complaints
            .into_iter()
            .filter(|c| {
                c.incident_id
                    .as_deref()
                    .is_some_and(|id| !known_ids.contains(id))
            })
            .collect();

        if new_complaints.is_empty() {
            info!(address = %address, "No new 311 complaints found");
            return Ok(());
        }

        info!(
            address = %address,
            count = new_complaints.len(),
            "Found new 311 complaints"
        );

        let mut inserted = Vec::new();
        for complaint in &new_complaints {
            if ComplaintService::insert_complaint(&self.db, address, complaint).await? {
                if let Some(id) = &complaint.incident_id {
                    known_ids.insert(id.clone());
                }
                inserted.push(complaint.clone());
            }
        }
        if inserted.is_empty() {
            return Ok(());
        }

        let last_date = inserted
            .iter()
            .filter_map(|c| c.created_date.clone())
            .max();

        let owners = OwnerService::owners_for_address(&self.db, address).await?;
        outcome.record_new_complaints(
            &owners,
            NewComplaints {
                address: address.to_string(),
                last_date,
                complaints: inserted,
            },
        );
        Ok(())
    }

    /// Send one embed per owner with a webhook, plus the global summary
    /// to the fallback webhook. Send failures are logged and skipped; a
    /// missed message is not worth failing the pass.
    async fn notify(&self, outcome: &CheckOutcome, owner_scope: Option<i64>) -> Result<(), AppError> {
        let owners = OwnerService::list_owners(&self.db).await?;

        for owner in owners {
            if owner_scope.is_some_and(|scope| scope != owner.id) {
                continue;
            }
            let Some(webhook_url) = owner
                .discord_webhook
                .as_deref()
                .filter(|url| !url.is_empty())
            else {
                warn!(owner = %owner.name, "No webhook URL configured for owner");
                continue;
            };

            let owner_addresses: HashSet<String> =
                OwnerService::owner_addresses(&self.db, owner.id)
                    .await?
                    .into_iter()
                    .collect();
            let checked_count = outcome
                .checked_addresses
                .iter()
                .filter(|a| owner_addresses.contains(*a))
                .count();

            let report = outcome.report_for_owner(owner.id);
            info!(owner = %owner.name, "Sending notification to owner");
            if let Err(e) = self
                .alert
                .send_check_report(
                    webhook_url,
                    &owner.name,
                    checked_count,
                    &report,
                    &outcome.failed_addresses,
                )
                .await
            {
                error!(owner = %owner.name, error = %e, "Failed to notify owner");
            }
        }

        // Global summary covers addresses nobody owns.
        if owner_scope.is_none() {
            if let Some(webhook_url) = self.files.load_webhook() {
                if let Err(e) = self
                    .alert
                    .send_check_report(
                        &webhook_url,
                        "All addresses",
                        outcome.checked_addresses.len(),
                        &outcome.global,
                        &outcome.failed_addresses,
                    )
                    .await
                {
                    error!(error = %e, "Failed to send global summary");
                }
            }
        }

        Ok(())
    }
}

fn mark_failed(outcome: &mut CheckOutcome, address: &str) {
    if !outcome.failed_addresses.iter().any(|a| a == address) {
        outcome.failed_addresses.push(address.to_string());
    }
}

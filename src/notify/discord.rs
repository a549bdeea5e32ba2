//! Discord webhook notifications
//!
//! Sends the per-owner check report as a structured embed. Owners carry
//! their own webhook URL; a fallback URL from `webhook.txt` receives the
//! global summary.

use chrono::Utc;
use chrono_tz::America::New_York;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::monitor::report::RecipientReport;
use crate::utils::AppError;

/// Discord webhook message payload
#[derive(Debug, Serialize)]
pub struct DiscordMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<DiscordEmbed>>,
}

/// Discord embed for rich messages
#[derive(Debug, Clone, Serialize)]
pub struct DiscordEmbed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Color (as decimal integer)
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<DiscordEmbedField>>,
    /// Timestamp (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Discord embed field
#[derive(Debug, Clone, Serialize)]
pub struct DiscordEmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Discord color constants (decimal)
pub mod colors {
    /// Check report - blue
    pub const REPORT: u32 = 3447003; // #3498DB
}

/// Discord alert sender
#[derive(Debug, Clone)]
pub struct DiscordAlert {
    client: Client,
    /// Whether sends actually go out; tests run with this off
    enabled: bool,
}

impl Default for DiscordAlert {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordAlert {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            enabled: true,
        }
    }

    /// Create a disabled alert sender (for testing)
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            enabled: false,
        }
    }

    /// Send a check report embed to a webhook URL.
    pub async fn send_check_report(
        &self,
        webhook_url: &str,
        recipient: &str,
        checked_count: usize,
        report: &RecipientReport,
        failed_addresses: &[String],
    ) -> Result<(), AppError> {
        if !self.enabled {
            debug!("Discord alerts disabled, skipping");
            return Ok(());
        }

        let embed = build_check_embed(recipient, checked_count, report, failed_addresses);
        let payload = DiscordMessage {
            content: None,
            embeds: Some(vec![embed]),
        };
        self.send_payload(webhook_url, &payload).await
    }

    /// Send raw Discord message payload
    async fn send_payload(
        &self,
        webhook_url: &str,
        payload: &DiscordMessage,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .post(webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send Discord webhook");
                AppError::upstream_error(format!("Failed to send Discord webhook: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Discord webhook returned error");
            return Err(AppError::upstream_error(format!(
                "Discord webhook error: {} - {}",
                status, body
            )));
        }

        info!("Discord alert sent successfully");
        Ok(())
    }
}

/// Build the check report embed for one recipient.
pub fn build_check_embed(
    recipient: &str,
    checked_count: usize,
    report: &RecipientReport,
    failed_addresses: &[String],
) -> DiscordEmbed {
    let now_utc = Utc::now();
    let local = now_utc.with_timezone(&New_York);
    let title = format!(
        "Building Monitor Stats - {} - {}",
        local.format("%-m/%-d"),
        local.format("%-I:%M %P")
    );

    let mut fields = vec![
        DiscordEmbedField {
            name: "Owner".to_string(),
            value: recipient.to_string(),
            inline: false,
        },
        DiscordEmbedField {
            name: "Addresses Checked".to_string(),
            value: checked_count.to_string(),
            inline: true,
        },
        DiscordEmbedField {
            name: "BIS Changes".to_string(),
            value: report.bis_changes.len().to_string(),
            inline: true,
        },
        DiscordEmbedField {
            name: "New 311 Complaints".to_string(),
            value: report.new_complaints.len().to_string(),
            inline: true,
        },
        DiscordEmbedField {
            name: "Failed Addresses".to_string(),
            value: failed_addresses.len().to_string(),
            inline: true,
        },
    ];

    for change in &report.bis_changes {
        let mut value = String::new();
        for counter in &change.changes {
            value.push_str(&format!(
                "{}: {} → {}\n",
                counter.field, counter.old, counter.new
            ));
        }
        value.push_str(&format!(
            "New Totals: Complaints={}, Violations-DOB={}, Violations-OATH/ECB={}",
            change.new_totals.complaints,
            change.new_totals.dob_violations,
            change.new_totals.ecb_violations
        ));
        fields.push(DiscordEmbedField {
            name: format!("BIS Change: {}", change.address),
            value,
            inline: false,
        });
    }

    for batch in &report.new_complaints {
        let last_date = batch.last_date.as_deref().unwrap_or("N/A");
        for complaint in &batch.complaints {
            let field = |v: &Option<String>| v.as_deref().unwrap_or("N/A").to_string();
            let value = format!(
                "Date: {}\nType: {}\nDescriptor: {}\nAgency: {}\nStatus: {}\nClosed Date: {}\nResolution: {}\nIncident ID: {}",
                field(&complaint.created_date),
                field(&complaint.complaint_type),
                field(&complaint.descriptor),
                field(&complaint.agency),
                field(&complaint.status),
                field(&complaint.closed_date),
                field(&complaint.resolution_description),
                field(&complaint.incident_id),
            );
            fields.push(DiscordEmbedField {
                name: format!("311 Complaint: {} (Last: {})", batch.address, last_date),
                value,
                inline: false,
            });
        }
    }

    if !failed_addresses.is_empty() {
        fields.push(DiscordEmbedField {
            name: "Failed Addresses".to_string(),
            value: failed_addresses.join("\n"),
            inline: false,
        });
    }

    let description = if report.is_all_clear() && failed_addresses.is_empty() {
        Some(
            "All addresses checked. No new complaints or violations. \
             All properties are in good standing."
                .to_string(),
        )
    } else {
        None
    };

    DiscordEmbed {
        title,
        description,
        color: colors::REPORT,
        fields: Some(fields),
        timestamp: Some(now_utc.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::report::{BisChange, CounterChange, NewComplaints};
    use crate::scrape::bis::BisSummary;
    use crate::scrape::open_data::Complaint311Record;

    #[test]
    fn should_build_all_clear_embed() {
        // Arrange
        let report = RecipientReport::default();

        // Act
        let embed = build_check_embed("Alice", 3, &report, &[]);

        // Assert
        assert!(embed.description.is_some());
        let fields = embed.fields.expect("Embed has fields");
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].value, "Alice");
        assert_eq!(fields[1].value, "3");
    }

    #[test]
    fn should_add_field_per_bis_change() {
        // Arrange
        let report = RecipientReport {
            bis_changes: vec![BisChange {
                address: "952A Greene Ave".to_string(),
                changes: vec![CounterChange {
                    field: "Violations-DOB",
                    old: 2,
                    new: 3,
                }],
                new_totals: BisSummary {
                    complaints: 4,
                    dob_violations: 3,
                    ecb_violations: 7,
                },
            }],
            new_complaints: vec![],
        };

        // Act
        let embed = build_check_embed("Alice", 1, &report, &[]);

        // Assert
        assert!(embed.description.is_none());
        let fields = embed.fields.expect("Embed has fields");
        let change_field = fields
            .iter()
            .find(|f| f.name == "BIS Change: 952A Greene Ave")
            .expect("Change field present");
        assert!(change_field.value.contains("Violations-DOB: 2 → 3"));
        assert!(change_field.value.contains("New Totals: Complaints=4"));
    }

    #[test]
    fn should_add_field_per_new_complaint() {
        // Arrange
        let report = RecipientReport {
            bis_changes: vec![],
            new_complaints: vec![NewComplaints {
                address: "952A Greene Ave".to_string(),
                last_date: Some("2026-08-01T09:00:00.000".to_string()),
                complaints: vec![Complaint311Record {
                    incident_id: Some("NYC311-1".to_string()),
                    complaint_type: Some("Noise".to_string()),
                    ..Default::default()
                }],
            }],
        };

        // Act
        let embed = build_check_embed("Alice", 1, &report, &[]);

        // Assert
        let fields = embed.fields.expect("Embed has fields");
        let complaint_field = fields
            .iter()
            .find(|f| f.name.starts_with("311 Complaint: 952A Greene Ave"))
            .expect("Complaint field present");
        assert!(complaint_field.value.contains("Type: Noise"));
        assert!(complaint_field.value.contains("Incident ID: NYC311-1"));
        assert!(complaint_field.value.contains("Agency: N/A"));
    }

    #[test]
    fn should_list_failed_addresses() {
        // Arrange
        let report = RecipientReport::default();
        let failed = vec!["1 Bad St".to_string(), "2 Bad St".to_string()];

        // Act
        let embed = build_check_embed("Alice", 2, &report, &failed);

        // Assert
        assert!(embed.description.is_none());
        let fields = embed.fields.expect("Embed has fields");
        let failed_field = fields
            .iter()
            .rfind(|f| f.name == "Failed Addresses")
            .expect("Failed field present");
        assert_eq!(failed_field.value, "1 Bad St\n2 Bad St");
    }

    #[tokio::test]
    async fn should_skip_send_when_disabled() {
        // Arrange
        let alert = DiscordAlert::disabled();

        // Act: URL is never contacted when the sender is disabled
        let result = alert
            .send_check_report(
                "https://discord.invalid/api/webhooks/0/nope",
                "Alice",
                0,
                &RecipientReport::default(),
                &[],
            )
            .await;

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn should_skip_none_payload_parts_when_serializing() {
        // Arrange
        let payload = DiscordMessage {
            content: None,
            embeds: Some(vec![build_check_embed(
                "Alice",
                0,
                &RecipientReport::default(),
                &[],
            )]),
        };

        // Act
        let json = serde_json::to_string(&payload).expect("Failed to serialize");

        // Assert
        assert!(!json.contains("\"content\""));
        assert!(json.contains("\"embeds\""));
    }
}

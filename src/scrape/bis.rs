//! BIS property profile scraper
//!
//! The Building Information System has no API; the property profile
//! overview page is fetched and reduced to plain text, and the three
//! counters (Complaints, Violations-DOB, Violations-OATH/ECB) are pulled
//! out with label regexes. The same page carries the building's BIN.

use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::address::parser::BisAddress;
use crate::utils::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The BIS servlet rejects default client user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const COMPLAINTS_LABEL: &str = "Complaints";
const DOB_VIOLATIONS_LABEL: &str = "Violations-DOB";
const ECB_VIOLATIONS_LABEL: &str = "Violations-OATH/ECB";

/// Counters extracted from one property profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BisSummary {
    pub complaints: i32,
    pub dob_violations: i32,
    pub ecb_violations: i32,
}

#[derive(Debug, Clone)]
pub struct BisClient {
    http: reqwest::Client,
    base_url: String,
}

impl BisClient {
    /// Create a client; `proxy` routes BIS traffic through an outbound
    /// proxy when the scraping target starts blocking the host.
    pub fn new(base_url: impl Into<String>, proxy: Option<&str>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                AppError::internal_error(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| AppError::internal_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the property profile page and extract the three counters.
    pub async fn property_summary(&self, address: &BisAddress) -> Result<BisSummary, AppError> {
        let text = self.fetch_profile_text(address).await?;

        let complaints = extract_count(&text, COMPLAINTS_LABEL);
        let dob_violations = extract_count(&text, DOB_VIOLATIONS_LABEL);
        let ecb_violations = extract_count(&text, ECB_VIOLATIONS_LABEL);

        match (complaints, dob_violations, ecb_violations) {
            (Some(complaints), Some(dob_violations), Some(ecb_violations)) => {
                info!(
                    house_no = %address.house_no,
                    street = %address.street,
                    complaints,
                    dob_violations,
                    ecb_violations,
                    "Fetched BIS summary"
                );
                Ok(BisSummary {
                    complaints,
                    dob_violations,
                    ecb_violations,
                })
            }
            _ => Err(AppError::scrape_failed(format!(
                "Failed to extract one or more counters from BIS page for {} {}, boro {}",
                address.house_no, address.street, address.boro_code
            ))),
        }
    }

    /// Extract the Building Identification Number from the profile page.
    pub async fn building_identification_number(
        &self,
        address: &BisAddress,
    ) -> Result<Option<String>, AppError> {
        let text = self.fetch_profile_text(address).await?;

        let re = Regex::new(r"BIN#\s*(\d+)").expect("static regex");
        let bin = re
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        if bin.is_none() {
            debug!(
                house_no = %address.house_no,
                street = %address.street,
                "No BIN found on BIS page"
            );
        }
        Ok(bin)
    }

    async fn fetch_profile_text(&self, address: &BisAddress) -> Result<String, AppError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("boro", address.boro_code.to_string()),
                ("houseno", address.house_no.clone()),
                ("street", address.street.replace(' ', "+")),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::scrape_failed(format!(
                    "BIS request failed for {} {}: {}",
                    address.house_no, address.street, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::scrape_failed(format!(
                "BIS returned {} for {} {}",
                status, address.house_no, address.street
            )));
        }

        let body = response.text().await.map_err(|e| {
            AppError::scrape_failed(format!(
                "Failed to read BIS response for {} {}: {}",
                address.house_no, address.street, e
            ))
        })?;

        Ok(strip_tags(&body))
    }
}

/// Extract `<label> <number>` from the stripped page text.
fn extract_count(text: &str, label: &str) -> Option<i32> {
    let pattern = format!(r"{}\s+(\d+)", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Reduce an HTML document to its text content: tags become line breaks
/// (so label/value pairs split across elements still match `\s+`), and
/// the handful of entities BIS actually emits are decoded.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push('\n');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
        <td class="maininfo">BIN# 3039851</td>
        <table>
          <tr><td>Complaints</td><td>4</td></tr>
          <tr><td>Violations-DOB</td><td>2</td></tr>
          <tr><td>Violations-OATH/ECB</td><td>7</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn should_extract_all_three_counters() {
        // Arrange
        let text = strip_tags(SAMPLE_PAGE);

        // Act & Assert
        assert_eq!(extract_count(&text, COMPLAINTS_LABEL), Some(4));
        assert_eq!(extract_count(&text, DOB_VIOLATIONS_LABEL), Some(2));
        assert_eq!(extract_count(&text, ECB_VIOLATIONS_LABEL), Some(7));
    }

    #[test]
    fn should_return_none_for_missing_counter() {
        // Arrange
        let text = strip_tags("<html><body>Complaints 3</body></html>");

        // Act & Assert
        assert_eq!(extract_count(&text, DOB_VIOLATIONS_LABEL), None);
    }

    #[test]
    fn should_extract_bin_from_page_text() {
        // Arrange
        let text = strip_tags(SAMPLE_PAGE);
        let re = Regex::new(r"BIN#\s*(\d+)").expect("static regex");

        // Act
        let bin = re.captures(&text).and_then(|c| c.get(1)).map(|m| m.as_str());

        // Assert
        assert_eq!(bin, Some("3039851"));
    }

    #[test]
    fn should_decode_entities_when_stripping_tags() {
        // Arrange & Act
        let text = strip_tags("<p>Fish&nbsp;&amp;&nbsp;Chips</p>");

        // Assert
        assert!(text.contains("Fish & Chips"));
    }

    #[test]
    fn should_split_adjacent_elements_with_whitespace() {
        // Counters commonly sit in a sibling cell; the label regex has
        // to match across the element boundary.
        let text = strip_tags("<td>Complaints</td><td>12</td>");
        assert_eq!(extract_count(&text, COMPLAINTS_LABEL), Some(12));
    }
}

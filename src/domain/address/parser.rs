//! Monitored-address parsing
//!
//! Addresses are configured as a single display string, e.g.
//! `952A Greene Ave, Brooklyn, NY 11221`, and have to be decomposed
//! differently for the two upstreams: BIS wants house number, street and
//! a borough code; the 311 dataset filters on upper-cased street
//! address, borough and ZIP.

use crate::utils::AppError;

/// Borough name to BIS borough code.
const BIS_BORO_CODES: [(&str, &str); 5] = [
    ("MANHATTAN", "1"),
    ("BRONX", "2"),
    ("BROOKLYN", "3"),
    ("QUEENS", "4"),
    ("STATEN ISLAND", "5"),
];

pub fn boro_code(borough: &str) -> Option<&'static str> {
    let needle = borough.trim().to_uppercase();
    BIS_BORO_CODES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, code)| *code)
}

/// Address decomposed for the BIS property profile query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisAddress {
    pub house_no: String,
    pub street: String,
    pub boro_code: &'static str,
}

/// Address decomposed for the 311 complaints filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint311Address {
    pub incident_address: String,
    pub borough: String,
    pub zip: String,
}

/// Parse `"952A Greene Ave, Brooklyn, NY 11221"` into BIS query parts.
pub fn parse_for_bis(address: &str) -> Result<BisAddress, AppError> {
    let mut parts = address.split(',');
    let house_street = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| parse_error(address, "missing street part"))?;
    let borough = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| parse_error(address, "missing borough part"))?;

    let mut tokens = house_street.split_whitespace();
    let house_no = tokens
        .next()
        .ok_or_else(|| parse_error(address, "missing house number"))?
        .to_string();
    let street = tokens.collect::<Vec<_>>().join(" ");
    if street.is_empty() {
        return Err(parse_error(address, "missing street name"));
    }

    let boro_code = boro_code(borough)
        .ok_or_else(|| parse_error(address, &format!("unknown borough: {}", borough)))?;

    Ok(BisAddress {
        house_no,
        street,
        boro_code,
    })
}

/// Parse `"952A Greene Ave, Brooklyn, NY 11221"` into the 311 filter parts.
pub fn parse_for_311(address: &str) -> Result<Complaint311Address, AppError> {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(parse_error(address, "expected street, borough and state/ZIP"));
    }

    let incident_address = parts[0].to_uppercase();
    let borough = parts[1].to_uppercase();
    let zip = parts[2]
        .split_whitespace()
        .last()
        .filter(|z| !z.is_empty())
        .ok_or_else(|| parse_error(address, "missing ZIP code"))?
        .to_string();

    if incident_address.is_empty() || borough.is_empty() {
        return Err(parse_error(address, "empty street or borough"));
    }

    Ok(Complaint311Address {
        incident_address,
        borough,
        zip,
    })
}

fn parse_error(address: &str, reason: &str) -> AppError {
    AppError::ValidationError(format!("Failed to parse address '{}': {}", address, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_address_for_bis() {
        // Arrange
        let address = "952A Greene Ave, Brooklyn, NY 11221";

        // Act
        let parsed = parse_for_bis(address).expect("Failed to parse");

        // Assert
        assert_eq!(parsed.house_no, "952A");
        assert_eq!(parsed.street, "Greene Ave");
        assert_eq!(parsed.boro_code, "3");
    }

    #[test]
    fn should_parse_address_for_311() {
        // Arrange
        let address = "952A Greene Ave, Brooklyn, NY 11221";

        // Act
        let parsed = parse_for_311(address).expect("Failed to parse");

        // Assert
        assert_eq!(parsed.incident_address, "952A GREENE AVE");
        assert_eq!(parsed.borough, "BROOKLYN");
        assert_eq!(parsed.zip, "11221");
    }

    #[test]
    fn should_map_all_boroughs_case_insensitively() {
        assert_eq!(boro_code("manhattan"), Some("1"));
        assert_eq!(boro_code("Bronx"), Some("2"));
        assert_eq!(boro_code("BROOKLYN"), Some("3"));
        assert_eq!(boro_code("queens"), Some("4"));
        assert_eq!(boro_code("Staten Island"), Some("5"));
        assert_eq!(boro_code("Yonkers"), None);
    }

    #[test]
    fn should_reject_address_without_borough() {
        let result = parse_for_bis("952A Greene Ave");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_address_without_street_name() {
        let result = parse_for_bis("952A, Brooklyn, NY 11221");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_311_address_without_zip_part() {
        let result = parse_for_311("952A Greene Ave, Brooklyn");
        assert!(result.is_err());
    }

    #[test]
    fn should_take_last_token_of_third_part_as_zip() {
        let parsed = parse_for_311("10 Fifth Ave, Manhattan, New York NY 10011")
            .expect("Failed to parse");
        assert_eq!(parsed.zip, "10011");
    }
}

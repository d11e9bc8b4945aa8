//! Address types.

use serde::{Deserialize, Serialize};

/// A delivery address found for a postal code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Street name.
    pub street: String,
    /// Extra line (block, apartment range, etc.).
    #[serde(default)]
    pub complement: String,
    /// Neighborhood.
    pub district: String,
    /// City.
    pub city: String,
    /// State code (e.g., "SP").
    pub state: String,
    /// Formatted postal code (e.g., "01310-100").
    pub postal_code: String,
}

impl Address {
    /// Street plus complement, when there is one.
    pub fn street_line(&self) -> String {
        if self.complement.is_empty() {
            self.street.clone()
        } else {
            format!("{}, {}", self.street, self.complement)
        }
    }

    /// City, state and postal code.
    pub fn city_line(&self) -> String {
        format!("{} - {}, {}", self.city, self.state, self.postal_code)
    }

    /// Format as multi-line.
    pub fn multi_line(&self) -> String {
        [self.street_line(), self.district.clone(), self.city_line()]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        self.multi_line().replace('\n', ", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> Address {
        Address {
            street: "Avenida Paulista".to_string(),
            complement: "de 612 a 1510 - lado par".to_string(),
            district: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            postal_code: "01310-100".to_string(),
        }
    }

    #[test]
    fn test_address_formatting() {
        let addr = paulista();
        assert_eq!(addr.city_line(), "São Paulo - SP, 01310-100");
        assert!(addr.street_line().contains("lado par"));
        assert_eq!(addr.multi_line().lines().count(), 3);
    }

    #[test]
    fn test_address_without_complement() {
        let mut addr = paulista();
        addr.complement.clear();
        addr.district.clear();
        assert_eq!(
            addr.one_line(),
            "Avenida Paulista, São Paulo - SP, 01310-100"
        );
    }
}

use serde::{Deserialize, Serialize};

/// Postal address shared by leads, accounts and contacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|part| super::non_blank(part.as_deref()).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_address_is_empty() {
        assert!(Address::default().is_empty());
        let blank = Address {
            city: Some("   ".to_string()),
            ..Address::default()
        };
        assert!(blank.is_empty());
        let real = Address {
            city: Some("Springfield".to_string()),
            ..Address::default()
        };
        assert!(!real.is_empty());
    }
}

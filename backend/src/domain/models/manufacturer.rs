use std::fmt;

/// Domain model for a car manufacturer
#[derive(Debug, Clone, PartialEq)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

/// A manufacturer that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewManufacturer {
    pub name: String,
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_display() {
        let manufacturer = Manufacturer {
            id: 1,
            name: "Alfa Romeo".to_string(),
            country: "Italy".to_string(),
        };

        assert_eq!(manufacturer.to_string(), "Alfa Romeo Italy");
    }
}

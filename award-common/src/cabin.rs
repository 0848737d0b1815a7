///! Cabin classes, ordered by service level
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cabin of service. Variant order matters: `Ord` ranks economy lowest and
/// first highest, which is what best-cabin resolution over a mixed-cabin
/// itinerary relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cabin {
    Economy,
    Premium,
    Business,
    First,
}

impl Cabin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cabin::Economy => "economy",
            Cabin::Premium => "premium",
            Cabin::Business => "business",
            Cabin::First => "first",
        }
    }
}

impl fmt::Display for Cabin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cabin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" => Ok(Cabin::Economy),
            "premium" => Ok(Cabin::Premium),
            "business" => Ok(Cabin::Business),
            "first" => Ok(Cabin::First),
            other => Err(format!("Unrecognized cabin: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cabin_ordering() {
        assert!(Cabin::First > Cabin::Business);
        assert!(Cabin::Business > Cabin::Premium);
        assert!(Cabin::Premium > Cabin::Economy);
        assert_eq!(
            [Cabin::Economy, Cabin::Business].iter().max(),
            Some(&Cabin::Business)
        );
    }

    #[test]
    fn test_cabin_parse() {
        assert_eq!("business".parse::<Cabin>(), Ok(Cabin::Business));
        assert_eq!(" First ".parse::<Cabin>(), Ok(Cabin::First));
        assert!("coach".parse::<Cabin>().is_err());
    }
}

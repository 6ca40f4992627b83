//! Redundancy policies, ranking strategies and loading bands.

use std::fmt;
use std::str::FromStr;

use crate::error::{ChillerError, ChillerResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Redundancy {
    NPlusOne,
    NPlusTwo,
    /// Spares cover this percentage of the operating units, at least one.
    NPlusPercent(f64),
}

impl Redundancy {
    pub fn spares(&self, operating: u32) -> u32 {
        match *self {
            Redundancy::NPlusOne => 1,
            Redundancy::NPlusTwo => 2,
            Redundancy::NPlusPercent(pct) => {
                let spares = (f64::from(operating) * pct / 100.0).ceil() as u32;
                spares.max(1)
            }
        }
    }

    pub fn validate(&self) -> ChillerResult<()> {
        if let Redundancy::NPlusPercent(pct) = *self
            && !(pct.is_finite() && pct > 0.0 && pct <= 100.0)
        {
            return Err(ChillerError::InvalidInput {
                what: "redundancy percent",
                value: pct,
                reason: "must be in (0, 100]",
            });
        }
        Ok(())
    }
}

impl fmt::Display for Redundancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redundancy::NPlusOne => f.write_str("N+1"),
            Redundancy::NPlusTwo => f.write_str("N+2"),
            Redundancy::NPlusPercent(pct) => write!(f, "N+{pct}%"),
        }
    }
}

impl FromStr for Redundancy {
    type Err = ChillerError;

    /// `N+1`, `N+2` or `N+<pct>%`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || ChillerError::Parse {
            what: "redundancy",
            input: s.to_string(),
        };
        let body = s
            .trim()
            .strip_prefix(['N', 'n'])
            .and_then(|rest| rest.trim_start().strip_prefix('+'))
            .map(str::trim)
            .ok_or_else(parse_err)?;

        match body {
            "1" => Ok(Redundancy::NPlusOne),
            "2" => Ok(Redundancy::NPlusTwo),
            _ => {
                let pct = body
                    .strip_suffix('%')
                    .and_then(|p| p.trim().parse::<f64>().ok())
                    .ok_or_else(parse_err)?;
                let policy = Redundancy::NPlusPercent(pct);
                policy.validate()?;
                Ok(policy)
            }
        }
    }
}

/// Ranking strategy. Every strategy is a pure score where lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    Balanced,
    /// Many small units.
    Modular,
    /// Least installed capacity, then fewest units.
    Central,
    /// Ten-year cost of ownership per MW.
    LifecycleCost,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::Modular,
        Strategy::Central,
        Strategy::LifecycleCost,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Modular => "modular",
            Strategy::Central => "central",
            Strategy::LifecycleCost => "lifecycle_cost",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = ChillerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let query = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|st| {
                st.key() == query || (query == "lifecycle" && *st == Strategy::LifecycleCost)
            })
            .ok_or(ChillerError::Parse {
                what: "strategy",
                input: s.to_string(),
            })
    }
}

/// Acceptable loading of the operating units, percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingBand {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl LoadingBand {
    pub fn new(min_pct: f64, max_pct: f64) -> ChillerResult<Self> {
        if !(min_pct.is_finite() && max_pct.is_finite())
            || min_pct < 0.0
            || max_pct > 100.0
            || min_pct >= max_pct
        {
            return Err(ChillerError::InvalidInput {
                what: "loading band",
                value: min_pct,
                reason: "need 0 <= min < max <= 100",
            });
        }
        Ok(Self { min_pct, max_pct })
    }

    pub fn contains(&self, loading_pct: f64) -> bool {
        (self.min_pct..=self.max_pct).contains(&loading_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spare_counts() {
        assert_eq!(Redundancy::NPlusOne.spares(10), 1);
        assert_eq!(Redundancy::NPlusTwo.spares(10), 2);
        assert_eq!(Redundancy::NPlusPercent(20.0).spares(10), 2);
        assert_eq!(Redundancy::NPlusPercent(20.0).spares(11), 3);
        assert_eq!(Redundancy::NPlusPercent(10.0).spares(2), 1);
        assert_eq!(Redundancy::NPlusPercent(100.0).spares(4), 4);
    }

    #[test]
    fn redundancy_parse_and_display() {
        assert_eq!("N+1".parse::<Redundancy>().unwrap(), Redundancy::NPlusOne);
        assert_eq!(" n + 2 ".parse::<Redundancy>().unwrap(), Redundancy::NPlusTwo);
        assert_eq!(
            "N+25%".parse::<Redundancy>().unwrap(),
            Redundancy::NPlusPercent(25.0)
        );
        assert_eq!(Redundancy::NPlusPercent(25.0).to_string(), "N+25%");
        for bad in ["", "N", "N+", "N+3", "N+0%", "N+150%", "2N"] {
            assert!(bad.parse::<Redundancy>().is_err(), "{bad}");
        }
    }

    #[test]
    fn strategy_parse() {
        for st in Strategy::ALL {
            assert_eq!(st.to_string().parse::<Strategy>().unwrap(), st);
        }
        assert_eq!("Lifecycle-Cost".parse::<Strategy>().unwrap(), Strategy::LifecycleCost);
        assert!("cheapest".parse::<Strategy>().is_err());
    }

    #[test]
    fn loading_band_bounds() {
        let band = LoadingBand::new(40.0, 80.0).unwrap();
        assert!(band.contains(40.0));
        assert!(band.contains(80.0));
        assert!(!band.contains(85.0));
        assert!(LoadingBand::new(80.0, 40.0).is_err());
        assert!(LoadingBand::new(-1.0, 40.0).is_err());
        assert!(LoadingBand::new(10.0, 120.0).is_err());
    }
}

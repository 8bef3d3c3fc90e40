//! Routing strategies for provider selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the manager picks among available providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Cycle an index over the available set
    #[default]
    RoundRobin,
    /// Lowest total request count first
    LeastUsed,
    /// Lowest running average latency first
    LowestLatency,
    /// Lowest combined per-1K price of the default model first
    LowestCost,
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RoundRobin => "round_robin",
            Self::LeastUsed => "least_used",
            Self::LowestLatency => "lowest_latency",
            Self::LowestCost => "lowest_cost",
        };
        f.write_str(name)
    }
}

impl FromStr for RoutingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_robin" => Ok(Self::RoundRobin),
            "least_used" => Ok(Self::LeastUsed),
            "lowest_latency" => Ok(Self::LowestLatency),
            "lowest_cost" => Ok(Self::LowestCost),
            other => Err(format!("unknown routing strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for strategy in [
            RoutingStrategy::RoundRobin,
            RoutingStrategy::LeastUsed,
            RoutingStrategy::LowestLatency,
            RoutingStrategy::LowestCost,
        ] {
            let parsed: RoutingStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("fastest_cheapest".parse::<RoutingStrategy>().is_err());
    }

    #[test]
    fn test_default_is_round_robin() {
        assert_eq!(RoutingStrategy::default(), RoutingStrategy::RoundRobin);
    }
}

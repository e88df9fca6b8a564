pub mod destination;
pub mod rules;

pub use destination::{assign_destinations, map_destination, DestinationMap, DestinationRule};
pub use rules::{Rule, RuleEngine, RuleSet};

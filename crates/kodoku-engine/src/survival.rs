//! Route survival
//!
//! A route is only as reliable as its worst chokepoint:
//! `survival = 100 - max(disruption of member chokepoints)`.

use crate::config::PropagationConfig;
use crate::propagation::ChokepointRisks;
use crate::reference::{Route, ROUTES};
use crate::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// A member chokepoint as seen from a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteChokepoint {
    pub id: String,
    pub name: String,
    pub disruption_risk: f64,
}

/// Survival assessment for one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub id: String,
    pub name: String,
    pub chokepoints: Vec<RouteChokepoint>,
    pub survival_rate: f64,
    pub critical_node: String,
    pub max_disruption_risk: f64,
    pub insight: String,
}

/// Severity band of a survival rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurvivalTier {
    Stable,
    Moderate,
    Degraded,
    Critical,
}

impl SurvivalTier {
    pub fn from_rate(survival_rate: f64) -> Self {
        if survival_rate >= 90.0 {
            SurvivalTier::Stable
        } else if survival_rate >= 70.0 {
            SurvivalTier::Moderate
        } else if survival_rate >= 50.0 {
            SurvivalTier::Degraded
        } else {
            SurvivalTier::Critical
        }
    }
}

impl fmt::Display for SurvivalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SurvivalTier::Stable => "stable",
            SurvivalTier::Moderate => "moderate",
            SurvivalTier::Degraded => "degraded",
            SurvivalTier::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Human-readable assessment of a route
pub fn generate_insight(
    route_name: &str,
    survival_rate: f64,
    critical_node: &str,
    disruption: f64,
    radius_km: f64,
) -> String {
    let (severity, recommendation) = match SurvivalTier::from_rate(survival_rate) {
        SurvivalTier::Stable => (
            "remains stable".to_string(),
            "No immediate rerouting action required.".to_string(),
        ),
        SurvivalTier::Moderate => (
            "is under moderate pressure".to_string(),
            "Monitoring is advised; contingency routes should be reviewed.".to_string(),
        ),
        SurvivalTier::Degraded => (
            format!("dropped to {:.1}%", survival_rate),
            format!(
                "Alternative routing (e.g., avoiding {}) is highly recommended.",
                critical_node
            ),
        ),
        SurvivalTier::Critical => (
            format!("critically declined to {:.1}%", survival_rate),
            format!(
                "Immediate rerouting away from {} is strongly urged. \
                 Supply-chain contingency plans should be activated.",
                critical_node
            ),
        ),
    };

    format!(
        "Survival rate for {} {}. Critical bottleneck at {} with {:.1}% disruption risk \
         due to intense conflicts within {:.0}km. {}",
        route_name, severity, critical_node, disruption, radius_km, recommendation
    )
}

fn assess_route(
    route: &Route,
    risks: &ChokepointRisks,
    config: &PropagationConfig,
) -> Option<RouteReport> {
    let members: Vec<RouteChokepoint> = route
        .chokepoints
        .iter()
        .filter_map(|id| match risks.get(id) {
            Some(d) => Some(RouteChokepoint {
                id: d.id.clone(),
                name: d.name.clone(),
                disruption_risk: d.disruption_risk,
            }),
            None => {
                warn!("Route {} references unknown chokepoint {}", route.id, id);
                None
            }
        })
        .collect();

    // Strict > keeps the first member on ties
    let mut critical = members.first()?;
    for member in &members[1..] {
        if member.disruption_risk > critical.disruption_risk {
            critical = member;
        }
    }

    let max_disruption = critical.disruption_risk;
    let survival_rate = round_to(100.000000000 - max_disruption, 1);
    let critical_node = critical.name.clone();
    let insight = generate_insight(
        route.name,
        survival_rate,
        &critical_node,
        max_disruption,
        config.influence_radius_km,
    );

    info!(
        "  Route '{}': survival={:.1}%  critical={} ({:.1}%)",
        route.name, survival_rate, critical_node, max_disruption
    );

    Some(RouteReport {
        id: route.id.to_string(),
        name: route.name.to_string(),
        chokepoints: members,
        survival_rate,
        critical_node,
        max_disruption_risk: max_disruption,
        insight,
    })
}

/// Survival for an arbitrary set of routes
///
/// Routes with no resolvable member chokepoint are omitted.
pub fn assess_routes(
    routes: &[Route],
    risks: &ChokepointRisks,
    config: &PropagationConfig,
) -> Vec<RouteReport> {
    routes
        .iter()
        .filter_map(|route| assess_route(route, risks, config))
        .collect()
}

/// Survival for every route in the registry
pub fn compute_route_survival(
    risks: &ChokepointRisks,
    config: &PropagationConfig,
) -> Vec<RouteReport> {
    assess_routes(&ROUTES, risks, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ChokepointDisruption;

    fn risks(entries: &[(&str, &str, f64)]) -> ChokepointRisks {
        ChokepointRisks::new(
            entries
                .iter()
                .map(|(id, name, d)| ChokepointDisruption {
                    id: id.to_string(),
                    name: name.to_string(),
                    disruption_risk: *d,
                    crisis_score_raw: d * 0.3,
                })
                .collect(),
        )
    }

    fn route(id: &'static str, chokepoints: &'static [&'static str]) -> Route {
        Route {
            id,
            name: "Test Route",
            chokepoints,
        }
    }

    #[test]
    fn test_bottleneck_rule() {
        let r = risks(&[
            ("hormuz", "Strait of Hormuz", 12.3),
            ("malacca", "Strait of Malacca", 4.0),
            ("taiwan", "Taiwan Strait", 0.0),
        ]);
        let reports = compute_route_survival(&r, &PropagationConfig::default());

        let japan = reports.iter().find(|r| r.id == "middle_east_to_japan").unwrap();
        assert_eq!(japan.survival_rate, 87.7);
        assert_eq!(japan.critical_node, "Strait of Hormuz");
        assert_eq!(japan.max_disruption_risk, 12.3);
        assert_eq!(japan.chokepoints.len(), 3);
        assert_eq!(japan.chokepoints[0].id, "hormuz");
    }

    #[test]
    fn test_tie_goes_to_first_in_route_order() {
        let r = risks(&[
            ("bosporus", "Bosporus Strait", 40.0),
            ("suez", "Suez Canal", 40.0),
        ]);
        let reports = compute_route_survival(&r, &PropagationConfig::default());

        let black_sea = reports
            .iter()
            .find(|r| r.id == "black_sea_to_mediterranean")
            .unwrap();
        assert_eq!(black_sea.critical_node, "Bosporus Strait");
        assert_eq!(black_sea.survival_rate, 60.0);
    }

    #[test]
    fn test_unresolved_route_omitted() {
        let r = risks(&[("panama", "Panama Canal", 5.0)]);
        let reports = compute_route_survival(&r, &PropagationConfig::default());

        // Only americas_to_asia has a resolvable member
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "americas_to_asia");
        assert_eq!(reports[0].chokepoints.len(), 1);
        assert_eq!(reports[0].critical_node, "Panama Canal");
    }

    #[test]
    fn test_unknown_member_skipped() {
        let r = risks(&[("suez", "Suez Canal", 22.0)]);
        let routes = [route("custom", &["atlantis", "suez"])];
        let reports = assess_routes(&routes, &r, &PropagationConfig::default());

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].chokepoints.len(), 1);
        assert_eq!(reports[0].survival_rate, 78.0);
    }

    #[test]
    fn test_empty_risks_yield_no_routes() {
        let reports = compute_route_survival(&ChokepointRisks::default(), &PropagationConfig::default());
        assert!(reports.is_empty());
    }

    #[test]
    fn test_routes_in_registry_order() {
        let all: Vec<(&str, &str, f64)> = crate::reference::CHOKE_POINTS
            .iter()
            .map(|cp| (cp.id, cp.name, 1.0))
            .collect();
        let reports = compute_route_survival(&risks(&all), &PropagationConfig::default());
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = ROUTES.iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(SurvivalTier::from_rate(100.0), SurvivalTier::Stable);
        assert_eq!(SurvivalTier::from_rate(90.0), SurvivalTier::Stable);
        assert_eq!(SurvivalTier::from_rate(89.9), SurvivalTier::Moderate);
        assert_eq!(SurvivalTier::from_rate(70.0), SurvivalTier::Moderate);
        assert_eq!(SurvivalTier::from_rate(69.9), SurvivalTier::Degraded);
        assert_eq!(SurvivalTier::from_rate(50.0), SurvivalTier::Degraded);
        assert_eq!(SurvivalTier::from_rate(49.9), SurvivalTier::Critical);
        assert_eq!(SurvivalTier::from_rate(0.0), SurvivalTier::Critical);
    }

    #[test]
    fn test_insight_stable() {
        let text = generate_insight("Energy Route", 95.5, "Strait of Hormuz", 4.5, 1500.0);
        assert_eq!(
            text,
            "Survival rate for Energy Route remains stable. Critical bottleneck at \
             Strait of Hormuz with 4.5% disruption risk due to intense conflicts within \
             1500km. No immediate rerouting action required."
        );
    }

    #[test]
    fn test_insight_moderate() {
        let text = generate_insight("R", 75.0, "Suez Canal", 25.0, 1500.0);
        assert!(text.contains("is under moderate pressure"));
        assert!(text.contains("Monitoring is advised"));
    }

    #[test]
    fn test_insight_degraded() {
        let text = generate_insight("R", 55.0, "Suez Canal", 45.0, 1500.0);
        assert!(text.contains("dropped to 55.0%"));
        assert!(text.contains("Alternative routing (e.g., avoiding Suez Canal) is highly recommended."));
        assert!(text.contains("with 45.0% disruption risk"));
    }

    #[test]
    fn test_insight_critical() {
        let text = generate_insight("R", 12.0, "Bab-el-Mandeb", 88.0, 1500.0);
        assert!(text.contains("critically declined to 12.0%"));
        assert!(text.ends_with(
            "Immediate rerouting away from Bab-el-Mandeb is strongly urged. \
             Supply-chain contingency plans should be activated."
        ));
    }

    #[test]
    fn test_insight_uses_configured_radius() {
        let text = generate_insight("R", 95.0, "X", 5.0, 2000.0);
        assert!(text.contains("within 2000km"));
    }
}

use crate::timeline::{render_timeline, TimelineView};
use crate::types::{Circuit, OptimizationResult, Strategy};

/// One ranked strategy ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStrategy {
    pub rank: usize,
    pub total_time: String,
    pub timeline: TimelineView,
}

/// Everything the display shows for a successful optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub total_time: String,
    pub pace_delta: Option<String>,
    pub safety_car: Option<String>,
    pub stints: Vec<String>,
    pub timeline: TimelineView,
    pub alternatives: Vec<RankedStrategy>,
}

pub fn total_time_line(strategy: &Strategy) -> String {
    format!("Total Time: {}s", strategy.total_time_s)
}

/// `None` when the service sent no delta; never rendered as zero.
/// Only a slower-than-baseline delta carries a `+`.
pub fn pace_delta_line(delta: Option<f64>) -> Option<String> {
    delta.map(|d| {
        let sign = if d > 0.0 { "+" } else { "" };
        // -0.0 prints as "-0.00" otherwise.
        let d = if d == 0.0 { 0.0 } else { d };
        format!("Pace Delta: {sign}{d:.2} s/lap")
    })
}

pub fn safety_car_line(periods: &[(u32, u32)]) -> Option<String> {
    if periods.is_empty() {
        return None;
    }
    let spans: Vec<String> = periods
        .iter()
        .map(|(start, end)| format!("{start}-{end}"))
        .collect();
    Some(format!("Safety Car: laps {}", spans.join(", ")))
}

pub fn stint_lines(strategy: &Strategy) -> Vec<String> {
    strategy
        .stints
        .iter()
        .map(|s| format!("{} - {} laps", s.compound, s.length))
        .collect()
}

pub fn summarize(result: &OptimizationResult, circuit: &Circuit) -> ResultSummary {
    let reference = Some(result.track_laps.unwrap_or(circuit.lap_count));

    let alternatives = result
        .alternatives
        .iter()
        .enumerate()
        .map(|(i, strategy)| RankedStrategy {
            rank: i + 1,
            total_time: format!("{}s", strategy.total_time_s),
            timeline: render_timeline(&strategy.stints, reference),
        })
        .collect();

    ResultSummary {
        total_time: total_time_line(&result.best),
        pace_delta: pace_delta_line(result.driver_pace_delta),
        safety_car: safety_car_line(&result.safety_car_periods),
        stints: stint_lines(&result.best),
        timeline: render_timeline(&result.best.stints, reference),
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::types::{Compound, Stint};
    use pretty_assertions::assert_eq;

    fn result(delta: Option<f64>, alternatives: Vec<Strategy>) -> OptimizationResult {
        OptimizationResult {
            best: Strategy {
                stints: vec![Stint::new(Compound::Hard, 57)],
                total_time_s: 5123.4,
            },
            alternatives,
            driver_pace_delta: delta,
            track_laps: Some(57),
            safety_car_periods: vec![],
        }
    }

    #[test]
    fn headline_and_missing_delta() {
        let monaco = catalog::lookup_circuit("Monaco").unwrap();
        let summary = summarize(&result(None, vec![]), &monaco);

        assert_eq!(summary.total_time, "Total Time: 5123.4s");
        assert_eq!(summary.pace_delta, None);
        assert_eq!(summary.safety_car, None);
        assert_eq!(summary.stints, vec!["HARD - 57 laps".to_string()]);
        assert!(summary.alternatives.is_empty());
        assert_eq!(summary.timeline.segments.len(), 1);
        assert_eq!(summary.timeline.caption.as_deref(), Some("57 / 57 laps"));
    }

    #[test]
    fn signed_pace_delta() {
        assert_eq!(pace_delta_line(Some(-0.35)).as_deref(), Some("Pace Delta: -0.35 s/lap"));
        assert_eq!(pace_delta_line(Some(0.25)).as_deref(), Some("Pace Delta: +0.25 s/lap"));
        assert_eq!(pace_delta_line(Some(0.0)).as_deref(), Some("Pace Delta: 0.00 s/lap"));
        assert_eq!(pace_delta_line(Some(-0.0)).as_deref(), Some("Pace Delta: 0.00 s/lap"));
    }

    #[test]
    fn alternatives_keep_service_order() {
        let slower = Strategy {
            stints: vec![Stint::new(Compound::Soft, 12), Stint::new(Compound::Hard, 45)],
            total_time_s: 5200.0,
        };
        let faster = Strategy {
            stints: vec![Stint::new(Compound::Soft, 20), Stint::new(Compound::Hard, 37)],
            total_time_s: 5150.5,
        };
        let bahrain = catalog::lookup_circuit("Bahrain").unwrap();
        let summary = summarize(&result(Some(-0.1), vec![slower, faster]), &bahrain);

        let ranks: Vec<_> = summary
            .alternatives
            .iter()
            .map(|a| (a.rank, a.total_time.as_str()))
            .collect();
        assert_eq!(ranks, vec![(1, "5200s"), (2, "5150.5s")]);
    }

    #[test]
    fn safety_car_periods_listed_in_order() {
        assert_eq!(
            safety_car_line(&[(4, 7), (30, 33)]).as_deref(),
            Some("Safety Car: laps 4-7, 30-33")
        );
    }
}

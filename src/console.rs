//! Line-oriented front end: pick a driver and a circuit from the catalog,
//! trigger the optimizer, paint the result.

use crossterm::style::{style, Color, Stylize};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::backend::OptimizerBackend;
use crate::catalog;
use crate::config::ClientConfig;
use crate::controller::{OptimizationController, RequestState};
use crate::selection::SelectionState;
use crate::summary::{summarize, ResultSummary};
use crate::timeline::TimelineView;
use crate::types::{Circuit, Compound, Driver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Drivers,
    Tracks,
    Driver(String),
    Track(String),
    Show,
    Optimize,
    Status,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let cmd = match (head.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("help" | "?", _) => Command::Help,
            ("drivers", true) => Command::Drivers,
            ("tracks", true) => Command::Tracks,
            ("driver", false) => Command::Driver(rest.to_string()),
            ("track", false) => Command::Track(rest.to_string()),
            ("show", true) => Command::Show,
            ("optimize" | "go", true) => Command::Optimize,
            ("status", true) => Command::Status,
            ("quit" | "exit", true) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(cmd)
    }
}

/// Driver by code, case-insensitive.
pub fn resolve_driver(input: &str) -> Option<Driver> {
    catalog::lookup_driver(&input.trim().to_ascii_uppercase()).ok()
}

/// Short name of a circuit: the part in parentheses ("Monza") and the
/// image stem ("spa", "yas_marina").
fn aliases(circuit: &Circuit) -> impl Iterator<Item = &'static str> {
    let paren = circuit
        .name
        .split_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'));
    let stem = circuit.image_key.split('.').next();
    paren.into_iter().chain(stem)
}

/// Circuit by exact name, then by short name ("monza", "spa"), else by a
/// unique case-insensitive substring ("jeddah", "vegas").
pub fn resolve_circuit(input: &str) -> Option<Circuit> {
    let input = input.trim();
    if let Ok(c) = catalog::lookup_circuit(input) {
        return Some(c);
    }
    if let Some(c) = catalog::circuits()
        .iter()
        .find(|c| aliases(c).any(|a| a.eq_ignore_ascii_case(input)))
    {
        return Some(*c);
    }
    let needle = input.to_lowercase();
    let mut hits = catalog::circuits()
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle));
    match (hits.next(), hits.next()) {
        (Some(c), None) => Some(*c),
        _ => None,
    }
}

// ---------- Painting ----------

pub fn compound_color(compound: Compound) -> Color {
    match compound {
        Compound::Soft => Color::Red,
        Compound::Medium => Color::Yellow,
        Compound::Hard => Color::White,
    }
}

/// Colored bar, a label row and the legend. Empty views paint nothing.
pub fn paint_timeline(view: &TimelineView, width: usize) -> String {
    if view.is_empty() {
        return String::new();
    }

    let cells = view.cell_widths(width);
    let mut bar = String::new();
    let mut labels = String::new();
    for (seg, n) in view.segments.iter().zip(cells) {
        bar.push_str(&style(" ".repeat(n)).on(compound_color(seg.compound)).to_string());
        let mut label: String = seg.label.chars().take(n).collect();
        if label.chars().count() < n {
            label.push_str(&" ".repeat(n - label.chars().count()));
        }
        labels.push_str(&label);
    }

    let legend: Vec<String> = view
        .legend
        .iter()
        .map(|e| format!("{} {}", style("■").with(compound_color(e.compound)), e.label))
        .collect();

    let mut out = format!("{bar}\n{}", labels.trim_end());
    if let Some(caption) = &view.caption {
        out.push_str(&format!("\n{caption}"));
    }
    out.push_str(&format!("\n{}", legend.join("   ")));
    out
}

pub fn paint_summary(summary: &ResultSummary, width: usize) -> String {
    let mut lines = vec![style("Best Strategy").bold().to_string()];
    lines.extend(summary.stints.iter().map(|s| format!("  {s}")));
    lines.push(paint_timeline(&summary.timeline, width));
    lines.push(summary.total_time.clone());
    if let Some(delta) = &summary.pace_delta {
        lines.push(delta.clone());
    }
    if let Some(sc) = &summary.safety_car {
        lines.push(sc.clone());
    }
    if !summary.alternatives.is_empty() {
        lines.push(String::new());
        lines.push(style("Top Strategies").bold().to_string());
        for alt in &summary.alternatives {
            lines.push(format!("#{} {}", alt.rank, alt.total_time));
            lines.push(paint_timeline(&alt.timeline, width));
        }
    }
    lines.join("\n")
}

fn print_help() {
    println!("commands:");
    println!("  drivers | tracks       list the catalog");
    println!("  driver <CODE>          pick a driver (e.g. driver LEC)");
    println!("  track <NAME>           pick a circuit (e.g. track monza)");
    println!("  show                   current selection");
    println!("  optimize               ask the optimizer for a strategy");
    println!("  status                 request state");
    println!("  quit");
}

fn print_selection(selection: &SelectionState) {
    let current = selection.current();
    let name = catalog::lookup_driver(&current.driver_id)
        .map(|d| d.display_name)
        .unwrap_or("?");
    println!(
        "driver: {} ({})  track: {} [{} laps, {}]",
        name,
        current.driver_id,
        current.circuit.name,
        current.circuit.lap_count,
        current.circuit.image_path()
    );
}

fn print_outcome(state: &RequestState, circuit: &Circuit, width: usize) {
    match state {
        RequestState::Succeeded(result) => {
            println!("{}", paint_summary(&summarize(result, circuit), width));
        }
        RequestState::Failed(reason) => println!("{}", style(reason).red()),
        RequestState::InFlight => println!("Optimizing Strategy…"),
        RequestState::Idle => println!("no optimization requested yet"),
    }
}

// ---------- Loop ----------

pub async fn run<B: OptimizerBackend>(
    controller: &OptimizationController<B>,
    selection: &mut SelectionState,
    cfg: &ClientConfig,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Circuit the outstanding request was made for.
    let mut pending: Option<Circuit> = None;

    println!("{}", style("AI-Based F1 Strategy Simulator").bold());
    print_selection(selection);
    println!("type 'help' for commands");

    loop {
        tokio::select! {
            state = controller.wait_settled(), if pending.is_some() => {
                if let Some(circuit) = pending.take() {
                    print_outcome(&state, &circuit, cfg.bar_width);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(cmd) = Command::parse(&line) else { continue };
                match cmd {
                    Command::Help => print_help(),
                    Command::Drivers => {
                        for d in catalog::drivers() {
                            println!("  {}  {}", d.id, d.display_name);
                        }
                    }
                    Command::Tracks => {
                        for c in catalog::circuits() {
                            println!("  {:<28} {:>3} laps", c.name, c.lap_count);
                        }
                    }
                    Command::Driver(input) => match resolve_driver(&input) {
                        Some(d) => {
                            selection.set_driver(d.id);
                            print_selection(selection);
                        }
                        None => println!("unknown driver '{input}' (see 'drivers')"),
                    },
                    Command::Track(input) => match resolve_circuit(&input) {
                        Some(c) => {
                            selection.set_circuit(c);
                            print_selection(selection);
                        }
                        None => println!("unknown or ambiguous track '{input}' (see 'tracks')"),
                    },
                    Command::Show => print_selection(selection),
                    Command::Optimize => {
                        if controller.optimize(selection.current()) {
                            pending = Some(selection.current().circuit);
                            println!("Optimizing Strategy…");
                        } else {
                            println!("already optimizing, please wait");
                        }
                    }
                    Command::Status => {
                        let circuit = pending.unwrap_or(selection.current().circuit);
                        print_outcome(&controller.state(), &circuit, cfg.bar_width);
                    }
                    Command::Quit => break,
                    Command::Unknown(raw) => println!("unknown command '{raw}' (try 'help')"),
                }
            }
        }
    }

    tracing::info!("console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::render_timeline;
    use crate::types::Stint;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("OPTIMIZE"), Some(Command::Optimize));
        assert_eq!(Command::parse("driver lec"), Some(Command::Driver("lec".into())));
        assert_eq!(
            Command::parse("track  Saudi Arabia (Jeddah) "),
            Some(Command::Track("Saudi Arabia (Jeddah)".into()))
        );
        assert_eq!(Command::parse("driver"), Some(Command::Unknown("driver".into())));
        assert_eq!(Command::parse("fly"), Some(Command::Unknown("fly".into())));
    }

    #[test]
    fn resolves_catalog_entries_only() {
        assert_eq!(resolve_driver("lec").map(|d| d.id), Some("LEC"));
        assert_eq!(resolve_driver("Leclerc"), None);

        assert_eq!(resolve_circuit("Monaco").map(|c| c.name), Some("Monaco"));
        assert_eq!(resolve_circuit("monza").map(|c| c.name), Some("Italy (Monza)"));
        // Also a substring of "Spain (Barcelona)"; the short name wins.
        assert_eq!(resolve_circuit("spa").map(|c| c.name), Some("Belgium (Spa)"));
        assert_eq!(resolve_circuit("SPA").map(|c| c.name), Some("Belgium (Spa)"));
        assert_eq!(resolve_circuit("cota").map(|c| c.name), Some("United States (COTA)"));
        assert_eq!(resolve_circuit("yas_marina").map(|c| c.name), Some("Abu Dhabi (Yas Marina)"));
        assert_eq!(resolve_circuit("vegas").map(|c| c.name), Some("Las Vegas"));
        // "a" is in most names.
        assert_eq!(resolve_circuit("a"), None);
        assert_eq!(resolve_circuit("Nürburgring"), None);
    }

    #[test]
    fn painted_timeline_carries_labels_and_full_legend() {
        let view = render_timeline(
            &[Stint::new(Compound::Soft, 18), Stint::new(Compound::Medium, 22), Stint::new(Compound::Hard, 17)],
            Some(57),
        );
        let painted = paint_timeline(&view, 57);
        assert!(painted.contains("SOFT (18)"));
        assert!(painted.contains("MEDIUM (22)"));
        assert!(painted.contains("HARD (17)"));
        assert!(painted.contains("57 / 57 laps"));
        for name in ["SOFT", "MEDIUM", "HARD"] {
            assert!(painted.lines().last().unwrap().contains(name));
        }

        assert_eq!(paint_timeline(&render_timeline(&[], Some(57)), 57), "");
    }
}

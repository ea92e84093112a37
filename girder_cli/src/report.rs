//! Plain-text reports for the terminal

use girder_core::evaluation::{DeadZone, ForceEnvelope, MaximumLoad, SafetySeries};
use girder_core::geometry::SectionProperties;
use girder_core::optimization::SearchResult;
use serde::Serialize;

const RULE: &str = "═══════════════════════════════════════";

/// Everything `girder analyze` reports
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub title: String,
    pub section: SectionProperties,
    pub train_load_n: f64,
    pub maximum_load: MaximumLoad,
    pub dead_zones: Vec<DeadZone>,
}

/// Everything `girder sweep` reports
#[derive(Debug, Serialize)]
pub struct Sweep {
    pub train_load_n: f64,
    pub threshold: f64,
    pub series: SafetySeries,
    pub dead_zones: Vec<DeadZone>,
}

fn heading(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
}

fn print_dead_zones(dead_zones: &[DeadZone]) {
    if dead_zones.is_empty() {
        println!("  none");
    }
    for zone in dead_zones {
        println!(
            "  {:8.1} .. {:8.1} mm  ({:.1} mm)",
            zone.start_mm,
            zone.end_mm,
            zone.width()
        );
    }
}

pub fn print_analysis(analysis: &Analysis) {
    let section = &analysis.section;
    let max = &analysis.maximum_load;

    heading(&format!("ANALYSIS: {}", analysis.title));
    println!();
    println!("Section:");
    println!("  Area          {:12.3} mm²", section.area_mm2);
    println!("  Centroid y    {:12.3} mm", section.centroid_y_mm);
    println!("  I             {:12.1} mm⁴", section.moment_of_inertia_mm4);
    if let Some(cut) = section.shear_cut {
        println!(
            "  Shear cut     y = {:.3} mm, Q = {:.1} mm³, b = {:.3} mm",
            cut.y_mm, cut.q_mm3, cut.width_mm
        );
    }
    println!();
    println!("Maximum load:");
    println!("  P_max         {:12.2} N", max.load_n);
    println!("  Causes        {}", max.cause_names().join(", "));
    println!("  Critical at   {:12.1} mm", max.critical_position_mm);
    for (mode, limit) in max.mode_limits_n.iter() {
        println!("    {:<18} {:12.2} N", mode.name(), limit);
    }
    println!();
    println!("Dead zones at {:.1} N:", analysis.train_load_n);
    print_dead_zones(&analysis.dead_zones);
    println!();
    println!("{}", RULE);
    let verdict = if analysis.dead_zones.is_empty() {
        "PASS"
    } else {
        "FAIL"
    };
    println!("  RESULT: {}", verdict);
    println!("{}", RULE);
}

pub fn print_sweep(sweep: &Sweep) {
    heading(&format!("TRAIN SWEEP at {:.1} N", sweep.train_load_n));
    println!();
    println!("Positions swept: {}", sweep.series.len());
    if let Some((x, factor)) = sweep.series.critical_position() {
        println!("Critical position: {:.1} mm (FOS {:.3})", x, factor);
    }
    println!();
    println!("Minimum factor of safety per mode:");
    for (mode, factor) in sweep.series.mode_minimums().iter() {
        println!("  {:<18} {:10.3}", mode.name(), factor);
    }
    println!();
    println!("Dead zones (FOS < {}):", sweep.threshold);
    print_dead_zones(&sweep.dead_zones);
}

pub fn print_envelope(envelope: &ForceEnvelope) {
    heading("FORCE ENVELOPE");
    println!();
    println!("  {:>10}  {:>12}  {:>14}", "x (mm)", "|V| max (N)", "|M| max (N·mm)");
    for ((x, v), m) in envelope
        .positions_mm
        .iter()
        .zip(&envelope.max_shear_n)
        .zip(&envelope.max_moment_nmm)
    {
        println!("  {:10.1}  {:12.3}  {:14.1}", x, v, m);
    }
}

pub fn print_search(result: &SearchResult) {
    heading("SEARCH");
    println!();
    let stats = &result.stats;
    println!("Candidates:   {}", stats.candidates);
    println!("Evaluations:  {}", stats.evaluations);
    println!("Cache hits:   {}", stats.cache_hits);
    println!("Rejected:     {}", stats.rejected);
    println!("Failed:       {}", stats.failed);
    println!();
    match &result.best {
        Some(best) => {
            println!("Best maximum load: {:.2} N", best.score);
            for (name, value) in &best.assignment {
                println!("  {:<14} {:10.4}", name, value);
            }
        }
        None => println!("No feasible candidate."),
    }
    if !result.finished {
        println!();
        println!("(search stopped before completion)");
    }
}

use crate::error::CfResult;
use crate::model::SwapRecord;
use crate::optimizer::OptimizationReport;
use crate::roster::Roster;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const PRIMARY_SWAPS_FILE: &str = "swaps_primary.csv";
pub const SECONDARY_SWAPS_FILE: &str = "swaps_secondary.csv";
pub const STATS_FILE: &str = "stats.csv";
pub const REPORT_FILE: &str = "report.json";
pub const SPREAD_ROW: &str = "SPREAD";

#[derive(Serialize)]
struct AssignmentRow<'a> {
    class: &'a str,
    name: &'a str,
    gender: String,
    language: String,
    tier: u8,
    friends: String,
    locked: &'static str,
}

#[derive(Serialize)]
struct SwapRow {
    #[serde(rename = "#")]
    index: usize,
    #[serde(rename = "type")]
    kind: String,
    from: String,
    out: String,
    to: String,
    #[serde(rename = "in")]
    incoming: String,
    delta_main: i32,
    delta_gender: i32,
    delta_language: i32,
    priority: u8,
}

#[derive(Serialize)]
struct StatsRow<'a> {
    class: &'a str,
    total: Option<usize>,
    boys: usize,
    girls: usize,
    fluent: usize,
    limited: Option<usize>,
    tier_1: usize,
    tier_2: usize,
    tier_3: usize,
    tier_4: usize,
    tier_5: usize,
}

/// One row per student, grouped by class. `locked` is written as `LOCKED`
/// so the file loads back with the same flags.
pub fn write_assignments<W: Write>(writer: W, roster: &Roster) -> CfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for class in roster.class_names() {
        for student in roster.class_students(class) {
            wtr.serialize(AssignmentRow {
                class,
                name: &student.name,
                gender: student.gender.to_string(),
                language: student.language.to_string(),
                tier: student.tier,
                friends: student.friends.join(", "),
                locked: if student.locked { "LOCKED" } else { "" },
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_swaps<W: Write>(writer: W, swaps: &[SwapRecord]) -> CfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, record) in swaps.iter().enumerate() {
        wtr.serialize(SwapRow {
            index: i + 1,
            kind: record.label(),
            from: record.swap.from_class.clone(),
            out: record.swap.students_out.join(", "),
            to: record.swap.to_class.clone(),
            incoming: record.swap.students_in.join(", "),
            delta_main: record.deltas.main,
            delta_gender: record.deltas.gender,
            delta_language: record.deltas.language,
            priority: record.priority,
        })?;
    }
    // Keep the header even when the log is empty.
    if swaps.is_empty() {
        wtr.write_record([
            "#",
            "type",
            "from",
            "out",
            "to",
            "in",
            "delta_main",
            "delta_gender",
            "delta_language",
            "priority",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Per-class counts followed by a `SPREAD` row holding the final spreads.
pub fn write_stats<W: Write>(writer: W, report: &OptimizationReport) -> CfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for c in &report.stats.classes {
        let [tier_1, tier_2, tier_3, tier_4, tier_5] = c.tiers;
        wtr.serialize(StatsRow {
            class: &c.class,
            total: Some(c.total),
            boys: c.boys,
            girls: c.girls,
            fluent: c.fluent,
            limited: Some(c.limited),
            tier_1,
            tier_2,
            tier_3,
            tier_4,
            tier_5,
        })?;
    }

    let s = &report.stats.spreads;
    let [tier_1, tier_2, tier_3, tier_4, tier_5] = s.tiers;
    wtr.serialize(StatsRow {
        class: SPREAD_ROW,
        total: None,
        boys: s.boys,
        girls: s.girls,
        fluent: s.fluent,
        limited: None,
        tier_1,
        tier_2,
        tier_3,
        tier_4,
        tier_5,
    })?;
    wtr.flush()?;
    Ok(())
}

pub fn write_report_json<W: Write>(writer: W, report: &OptimizationReport) -> CfResult<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Writes every artifact into `dir`, creating it if needed. Returns the paths written.
pub fn export_all<P: AsRef<Path>>(
    dir: P,
    roster: &Roster,
    report: &OptimizationReport,
) -> CfResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let create = |file: &str| -> CfResult<(PathBuf, BufWriter<File>)> {
        let path = dir.join(file);
        let handle = File::create(&path)?;
        Ok((path, BufWriter::new(handle)))
    };

    let mut written = Vec::new();

    let (path, w) = create(ASSIGNMENTS_FILE)?;
    write_assignments(w, roster)?;
    written.push(path);

    let (path, w) = create(PRIMARY_SWAPS_FILE)?;
    write_swaps(w, &report.primary.swaps)?;
    written.push(path);

    let (path, w) = create(SECONDARY_SWAPS_FILE)?;
    write_swaps(w, &report.secondary.swaps)?;
    written.push(path);

    let (path, w) = create(STATS_FILE)?;
    write_stats(w, report)?;
    written.push(path);

    let (path, mut w) = create(REPORT_FILE)?;
    write_report_json(&mut w, report)?;
    w.flush()?;
    written.push(path);

    for path in &written {
        info!("Wrote {}", path.display());
    }
    Ok(written)
}

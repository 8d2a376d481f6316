use classforge::consts::{ATTRIBUTE_SPREAD_TARGET, TIER_COUNT, TIER_MIN};
use classforge::metrics::StatsTable;
use classforge::model::SwapRecord;
use classforge::optimizer::{PhaseOutcome, StopReason};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn print_distribution(title: &str, stats: &StatsTable) {
    println!("\n{}", title);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Total"),
        Cell::new("Boys"),
        Cell::new("Girls"),
        Cell::new("Fluent"),
        Cell::new("Limited"),
    ];
    for t in 0..TIER_COUNT {
        let tier = TIER_MIN + t as u8;
        let cell = Cell::new(format!("T{}", tier));
        header.push(match tier {
            1 => cell.fg(Color::Cyan),
            5 => cell.fg(Color::Yellow),
            _ => cell,
        });
    }
    table.add_row(header);

    for i in 1..=(5 + TIER_COUNT) {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for c in &stats.classes {
        let mut row = vec![
            Cell::new(&c.class).add_attribute(Attribute::Bold),
            Cell::new(c.total),
            Cell::new(c.boys),
            Cell::new(c.girls),
            Cell::new(c.fluent),
            Cell::new(c.limited),
        ];
        row.extend(c.tiers.iter().map(|n| Cell::new(n)));
        table.add_row(row);
    }

    let s = &stats.spreads;
    let mut spread_row = vec![
        Cell::new("Spread").add_attribute(Attribute::Italic),
        Cell::new("-"),
        attribute_spread(s.boys),
        attribute_spread(s.girls),
        attribute_spread(s.fluent),
        Cell::new("-"),
    ];
    spread_row.extend(s.tiers.iter().map(|&n| {
        let cell = Cell::new(n);
        if n > 1 {
            cell.fg(Color::Red)
        } else {
            cell.fg(Color::Green)
        }
    }));
    table.add_row(spread_row);

    println!("{}", table);
}

fn attribute_spread(spread: usize) -> Cell {
    if spread > ATTRIBUTE_SPREAD_TARGET {
        Cell::new(spread).fg(Color::Red)
    } else {
        Cell::new(spread)
    }
}

pub fn print_swap_log(outcome: &PhaseOutcome) {
    println!(
        "\nSwaps ({}, tier {}, cap {}): {}",
        outcome.phase,
        outcome.tier,
        outcome.cap,
        outcome.swaps.len()
    );
    if outcome.swaps.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("#"),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("From"),
        Cell::new("Out"),
        Cell::new("To"),
        Cell::new("In"),
        Cell::new("dMain").fg(Color::Cyan),
        Cell::new("dGender"),
        Cell::new("dLang"),
        Cell::new("P"),
    ]);
    for i in [0, 6, 7, 8, 9] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (i, record) in outcome.swaps.iter().enumerate() {
        table.add_row(swap_row(i + 1, record));
    }
    println!("{}", table);
}

fn swap_row(index: usize, record: &SwapRecord) -> Vec<Cell> {
    vec![
        Cell::new(index),
        Cell::new(record.label()),
        Cell::new(&record.swap.from_class),
        Cell::new(record.swap.students_out.join(", ")),
        Cell::new(&record.swap.to_class),
        Cell::new(record.swap.students_in.join(", ")),
        Cell::new(format!("{:+}", record.deltas.main)).fg(Color::Cyan),
        Cell::new(format!("{:+}", record.deltas.gender)),
        Cell::new(format!("{:+}", record.deltas.language)),
        Cell::new(record.priority),
    ]
}

pub fn print_phase_summary(outcome: &PhaseOutcome) {
    let (status, color) = match outcome.stop {
        StopReason::Goal {
            excess_cleared: true,
            ..
        } => ("goal reached, no class over cap".to_string(), Color::Green),
        StopReason::Goal { .. } => ("goal reached, classes over cap".to_string(), Color::Yellow),
        StopReason::Starvation { cause, .. } => (format!("stopped: {}", cause), Color::Yellow),
        StopReason::IterationCap { iterations } => {
            (format!("iteration cap ({})", iterations), Color::Red)
        }
    };

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new(format!("Phase {}", outcome.phase)).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "spread {} -> {} (goal {})",
            outcome.spread_before, outcome.spread_after, outcome.spread_goal
        )),
        Cell::new(format!("{} over cap", outcome.excess_groups_after)),
        Cell::new(status).fg(color),
    ]);
    println!("{}", table);
}

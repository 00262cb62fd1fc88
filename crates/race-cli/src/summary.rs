use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use race_analytics::{FunFacts, RaceStatistics, RelativePerformance, Standing};
use race_model::{DiagnosticSeverity, Diagnostics, RaceResult, SessionMetadata};
use race_normalization::PartialRecordError;

use race_cli::pipeline::DashboardSnapshot;

pub fn print_status(snapshot: &DashboardSnapshot, statistics: &RaceStatistics) {
    let metadata = &snapshot.metadata;
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Session"), header_cell("")]);
    for (label, value) in session_rows(metadata) {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    if let Some(winner) = &metadata.winner {
        let mut text = format!("@{}", winner.username);
        if let Some(full_name) = &winner.full_name {
            text.push_str(&format!(" ({full_name})"));
        }
        if let Some(time) = winner.race_time_seconds {
            text.push_str(&format!(" in {}", seconds(time)));
        }
        table.add_row(vec![
            Cell::new("Winner").add_attribute(Attribute::Bold),
            Cell::new(text).fg(Color::Yellow).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");

    let podium = snapshot.analytics().podium();
    if snapshot.has_race_data && !podium.is_empty() {
        print_podium(podium);
    }

    let mut stats = Table::new();
    apply_table_style(&mut stats);
    stats.set_header(vec![header_cell("Statistics"), header_cell("")]);
    stats.add_row(vec![Cell::new("Participants"), Cell::new(statistics.participants)]);
    stats.add_row(vec![
        Cell::new("Average time"),
        optional_seconds_cell(statistics.average_time_seconds),
    ]);
    stats.add_row(vec![
        Cell::new("Fastest time"),
        optional_seconds_cell(statistics.fastest_time_seconds),
    ]);
    stats.add_row(vec![
        Cell::new("Slowest time"),
        optional_seconds_cell(statistics.slowest_time_seconds),
    ]);
    stats.add_row(vec![Cell::new("Total boosts"), Cell::new(statistics.total_boosts)]);
    stats.add_row(vec![
        Cell::new("Total collisions"),
        Cell::new(statistics.total_collisions),
    ]);
    align_column(&mut stats, 1, CellAlignment::Right);
    println!("{stats}");

    print_diagnostics(&snapshot.diagnostics);
    print_record_errors(&snapshot.record_errors);
}

fn print_podium(podium: &[RaceResult]) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Podium"),
        header_cell("Racer"),
        header_cell("Time"),
    ]);
    for record in podium {
        table.add_row(vec![
            standing_cell(Standing::for_rank(record.rank)),
            Cell::new(format!("@{} ({})", record.username, record.full_name)),
            optional_seconds_cell(record.race_time_seconds()),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    println!("{table}");
}

fn session_rows(metadata: &SessionMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("Source", metadata.provenance.label.clone()),
        ("Last updated", metadata.provenance.timestamp.clone()),
        ("Race date", metadata.race_date.clone()),
        ("Race time", metadata.race_time.clone()),
        ("Race id", metadata.race_id.clone()),
        ("Duration", seconds(metadata.race_duration_seconds)),
        (
            "Finishers",
            format!("{}/{}", metadata.finishers, metadata.total_participants),
        ),
    ]
}

pub fn print_leaderboard(snapshot: &DashboardSnapshot, rows: &[&RaceResult]) {
    let mut table = Table::new();
    apply_wide_table_style(&mut table);
    if snapshot.has_race_data {
        table.set_header(vec![
            header_cell("Rank"),
            header_cell("Username"),
            header_cell("Full Name"),
            header_cell("Time"),
            header_cell("Speed (km/h)"),
            header_cell("Boosts"),
            header_cell("Collisions"),
            header_cell("Distance (km)"),
        ]);
        for record in rows {
            table.add_row(vec![
                rank_cell(record.rank),
                Cell::new(format!("@{}", record.username)),
                Cell::new(&record.full_name),
                optional_seconds_cell(record.race_time_seconds()),
                optional_number_cell(record.average_speed_kmh(), 1),
                count_cell(record.boosts_used, Color::Cyan),
                count_cell(record.collisions, Color::Red),
                optional_number_cell(record.distance_covered_km(), 2),
            ]);
        }
        for index in [0, 3, 4, 5, 6, 7] {
            align_column(&mut table, index, CellAlignment::Right);
        }
    } else {
        table.set_header(vec![
            header_cell("Position"),
            header_cell("Username"),
            header_cell("Full Name"),
            header_cell("Status"),
        ]);
        for record in rows {
            table.add_row(vec![
                Cell::new(record.rank),
                Cell::new(format!("@{}", record.username)),
                Cell::new(&record.full_name),
                dim_cell("Ready to race"),
            ]);
        }
        align_column(&mut table, 0, CellAlignment::Right);
    }
    println!("{table}");
    println!(
        "Showing {} of {} {}",
        rows.len(),
        snapshot.results.len(),
        if snapshot.has_race_data {
            "racers"
        } else {
            "participants"
        }
    );
}

/// One search hit with the figures shown next to it.
pub struct SearchHit<'a> {
    pub record: &'a RaceResult,
    pub performance: Option<RelativePerformance>,
    pub image: Option<&'a str>,
}

pub fn print_search(query: &str, hits: &[SearchHit<'_>], has_race_data: bool) {
    if hits.is_empty() {
        let noun = if has_race_data { "racer" } else { "participant" };
        println!("No {noun} found matching '{query}'.");
        return;
    }

    let mut table = Table::new();
    apply_wide_table_style(&mut table);
    if has_race_data {
        table.set_header(vec![
            header_cell("Rank"),
            header_cell("Username"),
            header_cell("Full Name"),
            header_cell("Time"),
            header_cell("Status"),
            header_cell("vs Average"),
            header_cell("Faster Than"),
            header_cell("Image"),
        ]);
        for hit in hits {
            let record = hit.record;
            let (delta, share) = match &hit.performance {
                Some(perf) => (
                    delta_cell(perf),
                    Cell::new(format!("{:.1}%", perf.percentile_faster_than)),
                ),
                None => (dim_cell("-"), dim_cell("-")),
            };
            table.add_row(vec![
                rank_cell(record.rank),
                Cell::new(format!("@{}", record.username)),
                Cell::new(&record.full_name),
                optional_seconds_cell(record.race_time_seconds()),
                standing_cell(Standing::for_rank(record.rank)),
                delta,
                share,
                image_cell(hit.image),
            ]);
        }
        for index in [0, 3, 5, 6] {
            align_column(&mut table, index, CellAlignment::Right);
        }
    } else {
        table.set_header(vec![
            header_cell("Position"),
            header_cell("Username"),
            header_cell("Full Name"),
            header_cell("Image"),
        ]);
        for hit in hits {
            table.add_row(vec![
                Cell::new(hit.record.rank),
                Cell::new(format!("@{}", hit.record.username)),
                Cell::new(&hit.record.full_name),
                image_cell(hit.image),
            ]);
        }
        align_column(&mut table, 0, CellAlignment::Right);
    }
    println!("{table}");
}

pub fn print_facts(facts: &FunFacts<'_>) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Fact"),
        header_cell("Racer"),
        header_cell("Value"),
    ]);
    let rows = [
        (
            "Most boosts used",
            facts.most_boosts,
            facts.most_boosts.boosts_used.to_string(),
        ),
        (
            "Most collisions",
            facts.most_collisions,
            facts.most_collisions.collisions.to_string(),
        ),
        (
            "Longest distance",
            facts.longest_distance,
            number(facts.longest_distance.distance_covered_km(), 2, " km"),
        ),
        (
            "Highest speed",
            facts.highest_speed,
            number(facts.highest_speed.average_speed_kmh(), 1, " km/h"),
        ),
    ];
    for (label, record, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(format!("@{}", record.username)),
            Cell::new(value).fg(Color::Cyan),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    println!("{table}");
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    apply_wide_table_style(&mut table);
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Tier"),
        header_cell("Message"),
    ]);
    for diagnostic in diagnostics.iter() {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            match diagnostic.tier {
                Some(tier) => Cell::new(tier.label()),
                None => dim_cell("-"),
            },
            Cell::new(&diagnostic.message),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Center);
    eprintln!();
    eprintln!("Diagnostics:");
    eprintln!("{table}");
}

fn print_record_errors(errors: &[PartialRecordError]) {
    if errors.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("Skipped records:");
    for error in errors {
        eprintln!("- {error}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string())
        .fg(Color::DarkGrey)
        .add_attribute(Attribute::Dim)
}

fn rank_cell(rank: u32) -> Cell {
    let cell = Cell::new(rank);
    match Standing::for_rank(rank) {
        Standing::Winner => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
        Standing::Podium => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        _ => cell,
    }
}

fn standing_cell(standing: Standing) -> Cell {
    let cell = Cell::new(standing.label());
    match standing {
        Standing::Winner => cell.fg(Color::Yellow).add_attribute(Attribute::Bold),
        Standing::Podium => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        Standing::Top10 => cell.fg(Color::Cyan),
        Standing::Top50 | Standing::Finished => cell,
    }
}

fn count_cell(count: u32, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn delta_cell(performance: &RelativePerformance) -> Cell {
    let delta = performance.delta_vs_mean;
    if performance.is_faster_than_average() {
        Cell::new(format!("{:.2}s faster", delta.abs())).fg(Color::Green)
    } else {
        Cell::new(format!("{delta:.2}s slower")).fg(Color::Yellow)
    }
}

fn severity_cell(severity: DiagnosticSeverity) -> Cell {
    let cell = Cell::new(severity.to_string()).add_attribute(Attribute::Bold);
    match severity {
        DiagnosticSeverity::Error => cell.fg(Color::Red),
        DiagnosticSeverity::Warning => cell.fg(Color::Yellow),
        DiagnosticSeverity::Info => cell.fg(Color::Blue),
    }
}

fn image_cell(image: Option<&str>) -> Cell {
    match image {
        Some(image) => Cell::new(image),
        None => dim_cell("-"),
    }
}

fn optional_seconds_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(seconds(value)),
        None => dim_cell("-"),
    }
}

fn optional_number_cell(value: Option<f64>, decimals: usize) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.decimals$}")),
        None => dim_cell("-"),
    }
}

fn number(value: Option<f64>, decimals: usize, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}{unit}"))
}

fn seconds(value: f64) -> String {
    format!("{value:.2}s")
}

//! Terminal tables for segmentation results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{CustomerGroup, DatasetProfile, Estimate, Segment, SegmentStats, ValueStats};

/// Color used for a segment label
fn segment_color(segment: Segment) -> Color {
    match segment {
        Segment::A => Color::Green,
        Segment::B => Color::Cyan,
        Segment::C => Color::Yellow,
        Segment::D => Color::Red,
    }
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn money(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

/// Build the ranked group table (highest mean price first)
pub fn groups_table(groups: &[CustomerGroup]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["#", "Persona", "Mean Price", "Records", "Segment"]));

    for (rank, group) in groups.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&group.key),
            money(group.mean_price),
            Cell::new(group.records).set_alignment(CellAlignment::Right),
            Cell::new(group.segment)
                .fg(segment_color(group.segment))
                .add_attribute(Attribute::Bold),
        ]);
    }
    table
}

/// Build the per-segment summary table
pub fn segment_stats_table(stats: &[SegmentStats]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Segment", "Groups", "Mean", "Min", "Max", "Sum"]));

    for s in stats {
        table.add_row(vec![
            Cell::new(s.segment)
                .fg(segment_color(s.segment))
                .add_attribute(Attribute::Bold),
            Cell::new(s.groups).set_alignment(CellAlignment::Right),
            money(s.mean),
            money(s.min),
            money(s.max),
            money(s.sum),
        ]);
    }
    table
}

fn value_stats_table(label: &str, stats: &[ValueStats]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[label, "Sales", "Revenue", "Mean Price"]));

    for s in stats {
        table.add_row(vec![
            Cell::new(&s.value),
            Cell::new(s.sales).set_alignment(CellAlignment::Right),
            money(s.revenue),
            money(s.mean_price),
        ]);
    }
    table
}

/// Print the top of the ranking and the segment summary
pub fn display_segmentation(groups: &[CustomerGroup], total_groups: usize, stats: &[SegmentStats]) {
    print_section(
        "🏆",
        &format!("TOP {} OF {} PERSONAS", groups.len(), total_groups),
    );
    print_indented(&groups_table(groups));

    print_section("📋", "SEGMENT SUMMARY");
    print_indented(&segment_stats_table(stats));
}

/// Print a single classification result
pub fn display_estimate(estimate: &Estimate) {
    print_section("🎯", "CLASSIFICATION");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec![Cell::new("👤 Persona"), Cell::new(&estimate.key)]);
    table.add_row(vec![
        Cell::new("🏷️  Segment"),
        Cell::new(estimate.segment)
            .fg(segment_color(estimate.segment))
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("💰 Estimated Income"),
        Cell::new(format!("{:.2}", estimate.estimated_income))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("🧾 Records"), Cell::new(estimate.records)]);
    print_indented(&table);
}

/// Print descriptive statistics of the raw dataset
pub fn display_profile(profile: &DatasetProfile) {
    print_section("📊", "DATASET PROFILE");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec![Cell::new("Records"), Cell::new(profile.records)]);
    table.add_row(vec![Cell::new("Countries"), Cell::new(profile.distinct_countries)]);
    table.add_row(vec![Cell::new("Platforms"), Cell::new(profile.distinct_platforms)]);
    table.add_row(vec![Cell::new("Sexes"), Cell::new(profile.distinct_sexes)]);
    table.add_row(vec![Cell::new("Distinct ages"), Cell::new(profile.distinct_ages)]);
    table.add_row(vec![Cell::new("Distinct prices"), Cell::new(profile.distinct_prices)]);
    table.add_row(vec![Cell::new("Min price"), money(profile.min_price)]);
    table.add_row(vec![Cell::new("Max price"), money(profile.max_price)]);
    table.add_row(vec![Cell::new("Mean price"), money(profile.mean_price)]);
    table.add_row(vec![
        Cell::new("Total revenue"),
        money(profile.total_revenue).fg(Color::Green),
    ]);
    print_indented(&table);

    print_section("🌍", "BY COUNTRY");
    print_indented(&value_stats_table("Country", &profile.by_country));

    print_section("📱", "BY PLATFORM");
    print_indented(&value_stats_table("Platform", &profile.by_platform));

    print_section("🔗", "BY COUNTRY AND PLATFORM");
    print_indented(&value_stats_table("Country/Platform", &profile.by_country_platform));

    print_section("🏷️", "SALES PER PRICE");
    let mut prices = Table::new();
    prices.load_preset(UTF8_FULL_CONDENSED);
    prices.set_header(header(&["Price", "Sales"]));
    for (price, sales) in &profile.by_price {
        prices.add_row(vec![
            Cell::new(price).set_alignment(CellAlignment::Right),
            Cell::new(sales).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&prices);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{AgePolicy, CustomerGroupTable, RawRecord};

    fn table() -> CustomerGroupTable {
        let records = vec![
            RawRecord::new("tur", "android", "female", 33, 100.0),
            RawRecord::new("bra", "ios", "male", 17, 40.0),
            RawRecord::new("usa", "ios", "female", 60, 10.0),
            RawRecord::new("fra", "ios", "female", 22, 300.0),
        ];
        CustomerGroupTable::build(&records, AgePolicy::Reject).unwrap()
    }

    #[test]
    fn test_groups_table_lists_every_group() {
        let table = table();
        let rendered = groups_table(table.groups()).to_string();
        for group in table.groups() {
            assert!(rendered.contains(&group.key), "Missing {}", group.key);
        }
        assert!(rendered.contains("300.00"));
    }

    #[test]
    fn test_segment_stats_table_has_row_per_segment() {
        let table = table();
        let rendered = segment_stats_table(&table.segment_stats()).to_string();
        for label in ["A", "B", "C", "D"] {
            assert!(rendered.contains(label));
        }
    }
}

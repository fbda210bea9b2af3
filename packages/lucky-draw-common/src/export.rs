//! Plain-text renderings of draw results for download and sharing.
//!
//! Only winners that still hold their slot are listed; forfeited entries
//! stay in the record for auditing but are left out of exports.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;

use crate::types::{DrawRecord, Winner};

#[cw_serde]
pub enum ExportFormat {
    Csv,
    Text,
}

const WINNERS_HEADER: [&str; 3] = ["Name", "Prize", "Timestamp"];
const HISTORY_HEADER: [&str; 5] = ["Draw #", "Prize", "Winners", "Timestamp", "Count"];

/// Render one draw in the requested format.
pub fn export_draw(draw: &DrawRecord, format: &ExportFormat) -> String {
    let winners: Vec<&Winner> = draw.active_winners();
    match format {
        ExportFormat::Csv => winners_to_csv(&winners, &draw.prize_name, draw.timestamp),
        ExportFormat::Text => winners_to_text(&winners, &draw.prize_name, draw.timestamp),
    }
}

/// `Name,Prize,Timestamp`, one row per winner, every cell quoted.
pub fn winners_to_csv(winners: &[&Winner], prize_label: &str, timestamp: Timestamp) -> String {
    let label = display_label(prize_label);
    let time = timestamp.seconds().to_string();

    let mut lines = vec![WINNERS_HEADER.join(",")];
    lines.extend(
        winners
            .iter()
            .map(|w| csv_row(&[w.name.as_str(), label, time.as_str()])),
    );
    lines.join("\n")
}

/// Numbered list suitable for pasting into chat.
pub fn winners_to_text(winners: &[&Winner], prize_label: &str, timestamp: Timestamp) -> String {
    let mut lines = vec![
        format!("Prize: {}", display_label(prize_label)),
        format!("Time: {}", timestamp.seconds()),
        format!("Winners ({}):", winners.len()),
    ];
    lines.extend(
        winners
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{}. {}", i + 1, w.name)),
    );
    lines.join("\n")
}

/// `Draw #,Prize,Winners,Timestamp,Count`, winners joined with `; `.
pub fn history_to_csv(history: &[DrawRecord]) -> String {
    let mut lines = vec![HISTORY_HEADER.join(",")];
    for draw in history {
        let winners: Vec<&str> = draw
            .active_winners()
            .iter()
            .map(|w| w.name.as_str())
            .collect();
        let number = draw.draw_number.to_string();
        let time = draw.timestamp.seconds().to_string();
        let count = winners.len().to_string();
        let joined = winners.join("; ");

        lines.push(csv_row(&[
            number.as_str(),
            display_label(&draw.prize_name),
            joined.as_str(),
            time.as_str(),
            count.as_str(),
        ]));
    }
    lines.join("\n")
}

fn display_label(label: &str) -> &str {
    if label.trim().is_empty() {
        "N/A"
    } else {
        label
    }
}

fn csv_row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

//! Human-readable text output formatter

use crate::constants::messages::NO_GAMES;
use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};
use chrono::{DateTime, Local};

/// Text formatter - one block per game
pub struct TextFormatter;

/// Kickoff in local time, or the raw string when it isn't RFC 3339
fn format_kickoff(start_time: &str) -> String {
    match DateTime::parse_from_rfc3339(start_time) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => start_time.to_string(),
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Nearby games ({} search, {} km, {})\n",
            report.mode, report.radius_km, report.date
        ));
        for source in &report.link_sources {
            output.push_str(&format!("  source: {}\n", source));
        }
        output.push('\n');

        if let Some(error) = &report.error {
            output.push_str(&format!("Error: {}\n", error));
            return Ok(output);
        }

        if report.games.is_empty() {
            output.push_str(NO_GAMES);
            output.push('\n');
            return Ok(output);
        }

        for game in &report.games {
            output.push_str(&format!("[{}] {}\n", game.id, game.title));
            output.push_str(&format!("  {}\n", game.venue_name));
            output.push_str(&format!(
                "  {}  {:.1} km away\n",
                format_kickoff(&game.start_time),
                game.distance_km
            ));
        }

        Ok(output)
    }
}

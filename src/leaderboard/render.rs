use crate::api::{LeaderboardEntry, UserRank};
use crate::leaderboard::country;
use crate::leaderboard::format::{self, rank_color, rank_medal};
use crate::leaderboard::mode::LeaderboardMode;
use crate::leaderboard::view::ViewState;
use crate::table::{Section, TableBuilder, Text};

pub const LOADING_MESSAGE: &str = "Loading leaderboard...";
pub const EMPTY_MESSAGE: &str = "No entries yet. Be the first!";

fn filter_label(code: &str) -> &'static str {
    if code.is_empty() {
        country::GLOBAL.name
    } else {
        country::display_name(code)
    }
}

pub fn view_title(state: &ViewState) -> String {
    format!("{} | {}", state.mode.to_label(), filter_label(&state.country))
}

/// Renders the current view. `color` enables rank colouring.
pub fn render_view(state: &ViewState, color: bool) -> Section {
    let title = view_title(state);
    if state.loading {
        let mut section = Section::new(title);
        section.add_line(LOADING_MESSAGE);
        return section;
    }
    entries_table(title, state.mode, &state.entries, color)
}

/// Fastest times for a single stage.
pub fn render_stage(stage: u32, country_code: &str, entries: &[LeaderboardEntry], color: bool) -> Section {
    let title = format!("Stage {} | {}", stage, filter_label(country_code));
    entries_table(title, LeaderboardMode::FastestTotal, entries, color)
}

pub fn render_rank(rank: &UserRank) -> String {
    let mode = rank
        .mode
        .parse::<LeaderboardMode>()
        .unwrap_or_default();
    let value = match mode {
        LeaderboardMode::FastestTotal => format::format_time(rank.score),
        LeaderboardMode::HighestStage => format!("Stage {}", rank.score),
    };
    format!(
        "{} {} ({}) - {} - {}",
        rank_medal(rank.rank),
        rank.display_name,
        rank.country_code.as_deref().filter(|c| !c.is_empty()).unwrap_or("-"),
        mode.to_label(),
        value
    )
}

fn entries_table(title: String, mode: LeaderboardMode, entries: &[LeaderboardEntry], color: bool) -> Section {
    let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
    let medals = entries.iter().map(|e| rank_medal(e.rank).to_string()).collect();
    let names = entries.iter().map(|e| e.display_name.clone()).collect();
    let countries = entries.iter().map(|e| e.country_code.clone()).collect();
    let metrics = entries.iter().map(|e| format::metric_cell(mode, e)).collect();

    let mut rank_column = Text::new("Rank", medals);
    if color {
        rank_column = rank_column.with_painter(move |row, cell| rank_color(ranks[row]).paint(cell).to_string());
    }

    TableBuilder::new(title)
        .empty_message(EMPTY_MESSAGE)
        .add_column(rank_column)
        .add_column(Text::new("Player", names))
        .add_column(Text::new("Country", countries))
        .add_column(Text::new(mode.metric_header(), metrics).align_right())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: u32, name: &str, score: i64, stage: Option<i64>) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_id: format!("u{}", rank),
            display_name: name.to_string(),
            country_code: "US".to_string(),
            score,
            stage,
        }
    }

    #[test]
    fn test_loading_state() {
        let mut state = ViewState::new(LeaderboardMode::FastestTotal, "");
        state.loading = true;
        let section = render_view(&state, false);
        assert_eq!(section.title, "Fastest Total Time | Global");
        assert_eq!(section.lines, vec![LOADING_MESSAGE]);
    }

    #[test]
    fn test_empty_state() {
        let state = ViewState::new(LeaderboardMode::HighestStage, "jp");
        let section = render_view(&state, false);
        assert_eq!(section.title, "Highest Stage Reached | Japan");
        assert_eq!(section.lines, vec![EMPTY_MESSAGE]);
    }

    #[test]
    fn test_fastest_total_table() {
        let mut state = ViewState::new(LeaderboardMode::FastestTotal, "");
        state.entries = vec![
            entry(1, "Mira", 125_000, None),
            entry(4, "Tor", 3_661_000, None),
        ];
        let section = render_view(&state, false);

        assert_eq!(
            section.lines,
            vec![
                "| Rank | Player | Country |     Time |",
                "|------|--------|---------|----------|",
                "| 🥇   | Mira   | US      |    2m 5s |",
                "| 4    | Tor    | US      | 1h 1m 1s |",
            ]
        );
    }

    #[test]
    fn test_highest_stage_table_prefers_stage() {
        let mut state = ViewState::new(LeaderboardMode::HighestStage, "US");
        state.entries = vec![entry(2, "Ayla", 999, Some(7)), entry(3, "Bran", 5, None)];
        let section = render_view(&state, false);

        assert_eq!(section.lines[0], "| Rank | Player | Country |   Stage |");
        assert!(section.lines[2].ends_with("| Stage 7 |"));
        assert!(section.lines[3].ends_with("| Stage 5 |"));
        assert!(section.lines[2].starts_with("| 🥈"));
    }

    #[test]
    fn test_colour_does_not_change_layout_when_disabled() {
        colored::control::set_override(false);
        let mut state = ViewState::new(LeaderboardMode::FastestTotal, "");
        state.entries = vec![entry(1, "Mira", 45_000, None)];
        assert_eq!(render_view(&state, true), render_view(&state, false));
        colored::control::unset_override();
    }

    #[test]
    fn test_stage_board_uses_time_column() {
        let section = render_stage(4, "", &[entry(1, "Mira", 45_000, Some(4))], false);
        assert_eq!(section.title, "Stage 4 | Global");
        assert!(section.lines[0].ends_with("| Time |"));
        assert!(section.lines[2].ends_with("|  45s |"));
    }

    #[test]
    fn test_render_rank() {
        let rank = UserRank {
            user_id: "7".to_string(),
            display_name: "Mira".to_string(),
            country_code: Some("US".to_string()),
            mode: "fastest_total".to_string(),
            rank: 2,
            score: 125_000,
        };
        assert_eq!(render_rank(&rank), "🥈 Mira (US) - Fastest Total Time - 2m 5s");
    }

    #[test]
    fn test_render_rank_without_country() {
        let rank = UserRank {
            user_id: "8".to_string(),
            display_name: "Tor".to_string(),
            country_code: None,
            mode: "highest_stage".to_string(),
            rank: 14,
            score: 9,
        };
        assert_eq!(render_rank(&rank), "14 Tor (-) - Highest Stage Reached - Stage 9");
    }
}

use serde::Serialize;

use crate::models::Item;

// Frontend chart palette, cycled over the item list with modulo.
const BACKGROUND_PALETTE: [&str; 6] = [
    "rgba(255, 99, 132, 0.2)",
    "rgba(54, 162, 235, 0.2)",
    "rgba(255, 206, 86, 0.2)",
    "rgba(75, 192, 192, 0.2)",
    "rgba(153, 102, 255, 0.2)",
    "rgba(255, 159, 64, 0.2)",
];

const BORDER_PALETTE: [&str; 6] = [
    "rgba(255, 99, 132, 1)",
    "rgba(54, 162, 235, 1)",
    "rgba(255, 206, 86, 1)",
    "rgba(75, 192, 192, 1)",
    "rgba(153, 102, 255, 1)",
    "rgba(255, 159, 64, 1)",
];

/// Dataset handed to the charting collaborator: one label per item plus the
/// two series (votes as bars, displays as the line overlay) and the cycled
/// color sequences.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub votes: Vec<u32>,
    pub displays: Vec<u32>,
    pub background_colors: Vec<String>,
    pub border_colors: Vec<String>,
}

/// The completion signal payload: per-item result lines, the top item, and
/// the chart dataset.
#[derive(Debug, Clone, Serialize)]
pub struct TallyReport {
    pub lines: Vec<String>,
    pub winner: Option<String>,
    pub chart: ChartData,
}

impl TallyReport {
    pub fn from_items(items: &[Item]) -> Self {
        let lines = items
            .iter()
            .map(|item| {
                format!(
                    "{} had {} votes and was shown {} times",
                    item.name, item.vote_tally, item.times_displayed
                )
            })
            .collect();

        // Highest tally wins; ties go to registry order.
        let winner = items
            .iter()
            .rev()
            .max_by_key(|item| item.vote_tally)
            .map(|item| item.name.clone());

        let chart = ChartData {
            labels: items.iter().map(|item| item.name.clone()).collect(),
            votes: items.iter().map(|item| item.vote_tally).collect(),
            displays: items.iter().map(|item| item.times_displayed).collect(),
            background_colors: cycled(&BACKGROUND_PALETTE, items.len()),
            border_colors: cycled(&BORDER_PALETTE, items.len()),
        };

        Self { lines, winner, chart }
    }
}

fn cycled(palette: &[&str], count: usize) -> Vec<String> {
    (0..count).map(|i| palette[i % palette.len()].to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, votes: u32, displays: u32) -> Item {
        let mut item = Item::new(name, format!("img/{name}.jpg"));
        item.vote_tally = votes;
        item.times_displayed = displays;
        item
    }

    #[test]
    fn lines_match_the_rendered_tally_text() {
        let report = TallyReport::from_items(&[item("banana", 4, 9)]);
        assert_eq!(report.lines, vec!["banana had 4 votes and was shown 9 times"]);
    }

    #[test]
    fn winner_is_the_highest_tally() {
        let report = TallyReport::from_items(&[
            item("bag", 2, 5),
            item("boots", 7, 6),
            item("chair", 3, 5),
        ]);
        assert_eq!(report.winner.as_deref(), Some("boots"));
    }

    #[test]
    fn tied_tallies_go_to_the_first_registered_item() {
        let report = TallyReport::from_items(&[
            item("bag", 1, 5),
            item("boots", 7, 6),
            item("chair", 7, 5),
            item("dragon", 2, 4),
        ]);
        assert_eq!(report.winner.as_deref(), Some("boots"));
    }

    #[test]
    fn chart_series_follow_registry_order() {
        let report = TallyReport::from_items(&[item("bag", 2, 5), item("boots", 7, 6)]);
        assert_eq!(report.chart.labels, vec!["bag", "boots"]);
        assert_eq!(report.chart.votes, vec![2, 7]);
        assert_eq!(report.chart.displays, vec![5, 6]);
    }

    #[test]
    fn palette_wraps_after_six_items() {
        let items: Vec<Item> = (0..8).map(|i| item(&format!("p{i}"), 0, 0)).collect();
        let report = TallyReport::from_items(&items);
        assert_eq!(report.chart.background_colors.len(), 8);
        assert_eq!(
            report.chart.background_colors[6],
            report.chart.background_colors[0]
        );
        assert_eq!(report.chart.border_colors[7], report.chart.border_colors[1]);
    }
}

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};

use super::model::Table;

// ---------------------------------------------------------------------------
// View – the selector options
// ---------------------------------------------------------------------------

/// One entry of the view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Select,
    TopTeams,
    TopBatsmen,
    TopStadiums,
    TopBowlers,
}

impl View {
    /// Selector order.
    pub const ALL: [View; 5] = [
        View::Select,
        View::TopTeams,
        View::TopBatsmen,
        View::TopStadiums,
        View::TopBowlers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Select => "Select…",
            View::TopTeams => "Top 5 Teams",
            View::TopBatsmen => "Top Batsmen",
            View::TopStadiums => "Top Stadiums",
            View::TopBowlers => "Top Bowlers",
        }
    }

    /// Compute this view's ranking. `Select…` has nothing to show.
    pub fn compute(&self, matches: &Table, deliveries: &Table) -> Result<Option<Ranking>> {
        let ranking = match self {
            View::Select => return Ok(None),
            View::TopTeams => top_teams(matches)?,
            View::TopBatsmen => top_batsmen(deliveries)?,
            View::TopStadiums => top_stadiums(matches)?,
            View::TopBowlers => top_bowlers(deliveries)?,
        };
        Ok(Some(ranking))
    }
}

// ---------------------------------------------------------------------------
// Ranking – what a bar chart draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Ordered (label, value) pairs plus how to present them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub title: &'static str,
    /// Axis label for the categories.
    pub label_column: &'static str,
    /// Axis label for the values.
    pub value_column: &'static str,
    pub orientation: Orientation,
    /// Shade bars along a gradient by value instead of one flat colour.
    pub color_by_value: bool,
    pub entries: Vec<(String, f64)>,
}

impl Ranking {
    pub fn max_value(&self) -> f64 {
        self.entries.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Most frequent `winner` values.
pub fn top_teams(matches: &Table) -> Result<Ranking> {
    let winners = matches
        .column("winner")
        .context("matches table has no 'winner' column")?;
    Ok(Ranking {
        title: "Top 5 Teams by Wins",
        label_column: "Team",
        value_column: "Wins",
        orientation: Orientation::Vertical,
        color_by_value: false,
        entries: top_n(value_counts(winners.filter_map(|v| v.as_key())), 5),
    })
}

/// Most frequent `venue` values.
pub fn top_stadiums(matches: &Table) -> Result<Ranking> {
    let venues = matches
        .column("venue")
        .context("matches table has no 'venue' column")?;
    Ok(Ranking {
        title: "Top 10 Stadiums",
        label_column: "Stadium",
        value_column: "Matches",
        orientation: Orientation::Horizontal,
        color_by_value: true,
        entries: top_n(value_counts(venues.filter_map(|v| v.as_key())), 10),
    })
}

/// Batsmen by total `batsman_runs`.
pub fn top_batsmen(deliveries: &Table) -> Result<Ranking> {
    let batsman = deliveries
        .column_index("batsman")
        .context("deliveries table has no 'batsman' column")?;
    let runs = deliveries
        .column_index("batsman_runs")
        .context("deliveries table has no 'batsman_runs' column")?;

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in deliveries.rows() {
        let Some(name) = row[batsman].as_key() else {
            continue;
        };
        let total = totals.entry(name).or_default();
        if let Some(r) = row[runs].as_f64() {
            *total += r;
        }
    }

    Ok(Ranking {
        title: "Top 10 Batsmen",
        label_column: "batsman",
        value_column: "batsman_runs",
        orientation: Orientation::Horizontal,
        color_by_value: false,
        entries: top_n(totals.into_iter().collect(), 10),
    })
}

/// Bowlers by number of deliveries with a dismissal recorded.
pub fn top_bowlers(deliveries: &Table) -> Result<Ranking> {
    let bowler = deliveries
        .column_index("bowler")
        .context("deliveries table has no 'bowler' column")?;
    let dismissed = deliveries
        .column_index("player_dismissed")
        .context("deliveries table has no 'player_dismissed' column")?;

    let mut wickets: BTreeMap<String, f64> = BTreeMap::new();
    for row in deliveries.rows() {
        if row[dismissed].is_null() {
            continue;
        }
        if let Some(name) = row[bowler].as_key() {
            *wickets.entry(name).or_default() += 1.0;
        }
    }

    Ok(Ranking {
        title: "Top 5 Bowlers",
        label_column: "bowler",
        value_column: "Wickets",
        orientation: Orientation::Horizontal,
        color_by_value: false,
        entries: top_n(wickets.into_iter().collect(), 5),
    })
}

/// Occurrence counts in first-seen order.
fn value_counts(keys: impl Iterator<Item = String>) -> Vec<(String, f64)> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, f64)> = Vec::new();
    for key in keys {
        match position.get(&key) {
            Some(&i) => counts[i].1 += 1.0,
            None => {
                position.insert(key.clone(), counts.len());
                counts.push((key, 1.0));
            }
        }
    }
    counts
}

/// Stable sort by value descending, then keep the first `n`.
fn top_n(mut entries: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(n);
    entries
}

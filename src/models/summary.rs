use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrainings {
    pub month: String, // YYYY-MM
    pub trainings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPresence {
    pub month: String,
    pub player: String,
    pub presences: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyLateness {
    pub month: String,
    pub player: String,
    pub late: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub player: String,
    pub presences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAttendance {
    pub player: String,
    pub presences: usize,
    pub trainings: usize,
    pub percentage: f64,
}

/// Percentage-based flags. `attendance` and `at_risk` cover the requested
/// date window; `perfect` covers the whole history of the scoped players.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub threshold: f64,
    pub trainings_in_range: usize,
    pub attendance: Vec<PlayerAttendance>,
    pub at_risk: Vec<PlayerAttendance>,
    pub perfect: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryBundle {
    pub trainings_per_month: Vec<MonthlyTrainings>,
    pub presences_per_month: Vec<MonthlyPresence>,
    pub lateness_per_month: Vec<MonthlyLateness>,
    pub ranking: Vec<RankingEntry>,
    pub risk: RiskReport,
}

/// A titled grid of strings, ready to be written to a sheet or a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.headers.len())
    }
}

pub fn format_pct(pct: f64) -> String {
    format!("{:.1}", pct)
}

impl SummaryBundle {
    /// The four stacked tables published to the summary worksheet.
    pub fn tables(&self) -> Vec<Table> {
        let mut trainings = Table::new("Entrenamientos por mes", &["Mes", "Entrenamientos del mes"]);
        trainings.rows = self
            .trainings_per_month
            .iter()
            .map(|m| vec![m.month.clone(), m.trainings.to_string()])
            .collect();

        let mut presences = Table::new(
            "Presencias por jugadora",
            &["Mes", "Jugadora", "Presencias", "% Asistencia"],
        );
        presences.rows = self
            .presences_per_month
            .iter()
            .map(|p| {
                vec![
                    p.month.clone(),
                    p.player.clone(),
                    p.presences.to_string(),
                    format_pct(p.percentage),
                ]
            })
            .collect();

        let mut lateness = Table::new("Llegadas tarde", &["Mes", "Jugadora", "Tardanzas"]);
        lateness.rows = self
            .lateness_per_month
            .iter()
            .map(|l| vec![l.month.clone(), l.player.clone(), l.late.to_string()])
            .collect();

        let mut ranking = Table::new("Ranking", &["Jugadora", "Total presencias"]);
        ranking.rows = self
            .ranking
            .iter()
            .map(|r| vec![r.player.clone(), r.presences.to_string()])
            .collect();

        vec![trainings, presences, lateness, ranking]
    }

    /// Per-player attendance within the requested window, with flags.
    pub fn risk_table(&self) -> Table {
        let mut table = Table::new(
            "Riesgo",
            &["Jugadora", "Presencias", "Entrenamientos", "% Asistencia", "Estado"],
        );
        table.rows = self
            .risk
            .attendance
            .iter()
            .map(|a| {
                let status = if a.percentage < self.risk.threshold {
                    "EN RIESGO"
                } else if self.risk.perfect.contains(&a.player) {
                    "PERFECTA"
                } else {
                    ""
                };
                vec![
                    a.player.clone(),
                    a.presences.to_string(),
                    a.trainings.to_string(),
                    format_pct(a.percentage),
                    status.to_string(),
                ]
            })
            .collect();
        table
    }
}

//! HTML rendering of the dashboard views
//!
//! Every function here is pure: it turns the session state and the
//! request's form values into a complete page.

pub mod charts;

use crate::session::Session;
use agro_lib::dataset::{correlation_matrix, describe, ColumnSummary, PREVIEW_ROWS};
use agro_lib::models::{Column, Features, InputRange, SCENARIO_INPUTS};
use agro_lib::{AdvisoryCategory, AgroError, Dataset, Simulation, TrainedModel};
use serde::Deserialize;

pub const PAGE_TITLE: &str = "Crop Yield Advisor";

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Data,
    Metrics,
    Simulation,
}

impl View {
    pub const ALL: [View; 3] = [View::Data, View::Metrics, View::Simulation];

    /// View for a `tab` query value; unknown values fall back to the data view
    pub fn from_tab(tab: Option<&str>) -> Self {
        match tab {
            Some("metrics") => View::Metrics,
            Some("simulation") => View::Simulation,
            _ => View::Data,
        }
    }

    pub fn tab(self) -> &'static str {
        match self {
            View::Data => "data",
            View::Metrics => "metrics",
            View::Simulation => "simulation",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Data => "Data",
            View::Metrics => "Model metrics",
            View::Simulation => "Simulation",
        }
    }
}

/// Query string of the page route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
    pub calculate: Option<String>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub irrigation: Option<f64>,
    pub fertilizer: Option<f64>,
}

impl PageQuery {
    pub fn view(&self) -> View {
        View::from_tab(self.tab.as_deref())
    }

    /// True when the simulation form was explicitly submitted
    pub fn wants_calculation(&self) -> bool {
        self.calculate.as_deref() == Some("1")
    }
}

/// Current values of the simulation controls
///
/// Missing values take the control defaults. Values are not validated
/// here; the scenario is checked when a calculation is requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioForm {
    pub humidity: f64,
    pub ph: f64,
    pub irrigation: f64,
    pub fertilizer: f64,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        let [humidity, ph, irrigation, fertilizer] = SCENARIO_INPUTS.map(|input| input.default);
        Self {
            humidity,
            ph,
            irrigation,
            fertilizer,
        }
    }
}

impl ScenarioForm {
    pub fn from_query(query: &PageQuery) -> Self {
        let defaults = Self::default();
        Self {
            humidity: query.humidity.unwrap_or(defaults.humidity),
            ph: query.ph.unwrap_or(defaults.ph),
            irrigation: query.irrigation.unwrap_or(defaults.irrigation),
            fertilizer: query.fertilizer.unwrap_or(defaults.fertilizer),
        }
    }

    pub fn features(&self) -> Features {
        Features {
            humidity: self.humidity,
            ph: self.ph,
            irrigation: self.irrigation,
            fertilizer: self.fertilizer,
        }
    }

    fn values(&self) -> [f64; 4] {
        self.features().to_array()
    }
}

/// Result of an explicit "Calculate yield" submission
pub type SimulationOutcome = Result<Simulation, AgroError>;

/// Error that replaces the whole content of `view`, if any
pub fn blocking_error(view: View, session: &Session) -> Option<&AgroError> {
    match view {
        View::Data | View::Metrics => session.dataset.as_ref().err(),
        View::Simulation => session.trained.as_ref().err(),
    }
}

/// Render the full page for one request
pub fn render_page(
    view: View,
    session: &Session,
    form: &ScenarioForm,
    outcome: Option<&SimulationOutcome>,
) -> String {
    let body = match (view, &session.dataset, &session.trained) {
        (View::Data, Ok(dataset), _) => render_data_view(dataset),
        (View::Metrics, Ok(_), _) => render_metrics_view(session),
        (View::Simulation, _, Ok(_)) => render_simulation_view(form, outcome),
        (View::Data | View::Metrics, Err(error), _) | (View::Simulation, _, Err(error)) => {
            render_error(error)
        }
    };

    let mut html = String::with_capacity(body.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{PAGE_TITLE}</title>\n"));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{PAGE_TITLE}</h1>\n"));
    html.push_str(&render_tabs(view));
    html.push_str(&format!(
        "<main id=\"{}\">\n<h2>{}</h2>\n{body}</main>\n",
        view.tab(),
        view.title()
    ));
    html.push_str("</body>\n</html>\n");
    html
}

const STYLE: &str = "<style>\
body{font-family:sans-serif;margin:2rem;color:#222}\
nav a{margin-right:1rem;padding:.3rem .6rem;text-decoration:none;color:#333}\
nav a.active{border-bottom:3px solid #21918c;font-weight:bold}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ddd;padding:.3rem .6rem;text-align:right}\
.cards{display:flex;gap:1rem}\
.card{border:1px solid #ddd;border-radius:6px;padding:.8rem 1.2rem}\
.card .value{font-size:1.6rem;font-weight:bold}\
.error{background:#fde8e8;border:1px solid #e0a0a0;padding:1rem;color:#8a1c1c}\
.prediction{font-size:1.3rem;font-weight:bold}\
label{display:block;margin:.6rem 0}\
</style>\n";

fn render_tabs(active: View) -> String {
    let mut nav = String::from("<nav>\n");
    for view in View::ALL {
        let class = if view == active { " class=\"active\"" } else { "" };
        nav.push_str(&format!(
            "<a href=\"/?tab={}\"{class}>{}</a>\n",
            view.tab(),
            view.title()
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

fn render_error(error: &AgroError) -> String {
    format!(
        "<div class=\"error\" role=\"alert\">{}</div>\n",
        html_escape::encode_text(&error.to_string())
    )
}

/// Numbers as shown in tables; undefined statistics read "NaN"
fn fmt_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn render_data_view(dataset: &Dataset) -> String {
    let preview = dataset.head(PREVIEW_ROWS);
    let mut html = format!(
        "<p>{} rows loaded. First {} rows:</p>\n",
        dataset.len(),
        preview.len()
    );

    html.push_str("<table class=\"preview\">\n<tr><th></th>");
    for column in Column::ALL {
        html.push_str(&format!("<th>{}</th>", column.csv_name()));
    }
    html.push_str("</tr>\n");
    for (i, sample) in preview.iter().enumerate() {
        html.push_str(&format!("<tr><th>{i}</th>"));
        for column in Column::ALL {
            html.push_str(&format!("<td>{}</td>", fmt_number(sample.value(column))));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    html.push_str("<h3>Summary statistics</h3>\n");
    html.push_str(&render_summary_table(&describe(dataset)));
    html
}

fn render_summary_table(summary: &[ColumnSummary]) -> String {
    type Stat = fn(&ColumnSummary) -> String;
    let rows: [(&str, Stat); 8] = [
        ("count", |s: &ColumnSummary| s.count.to_string()),
        ("mean", |s: &ColumnSummary| fmt_number(s.mean)),
        ("std", |s: &ColumnSummary| fmt_number(s.std)),
        ("min", |s: &ColumnSummary| fmt_number(s.min)),
        ("25%", |s: &ColumnSummary| fmt_number(s.q25)),
        ("50%", |s: &ColumnSummary| fmt_number(s.median)),
        ("75%", |s: &ColumnSummary| fmt_number(s.q75)),
        ("max", |s: &ColumnSummary| fmt_number(s.max)),
    ];

    let mut html = String::from("<table class=\"summary\">\n<tr><th></th>");
    for s in summary {
        html.push_str(&format!("<th>{}</th>", s.column.csv_name()));
    }
    html.push_str("</tr>\n");
    for (name, stat) in rows {
        html.push_str(&format!("<tr><th>{name}</th>"));
        for s in summary {
            html.push_str(&format!("<td>{}</td>", stat(s)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn render_metrics_view(session: &Session) -> String {
    let mut html = String::new();

    match &session.trained {
        Ok(trained) => html.push_str(&render_metric_cards(trained)),
        Err(error) => html.push_str(&render_error(error)),
    }

    if let Ok(dataset) = &session.dataset {
        html.push_str("<h3>Correlation between variables</h3>\n");
        html.push_str(&charts::correlation_heatmap(&correlation_matrix(dataset)));
        html.push('\n');
    }

    if let Ok(trained) = &session.trained {
        html.push_str("<h3>Actual vs predicted yield</h3>\n");
        html.push_str(&charts::actual_vs_predicted(trained));
        html.push('\n');
    }

    html
}

fn render_metric_cards(trained: &TrainedModel) -> String {
    let mut html = String::from("<div class=\"cards\">\n");
    for (label, value) in trained.metrics.labelled() {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"label\">{label}</div><div class=\"value\">{value:.2}</div></div>\n"
        ));
    }
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<p>Trained on {} rows, evaluated on {} held-out rows.</p>\n",
        trained.train_rows, trained.test_rows
    ));
    html
}

fn render_simulation_view(form: &ScenarioForm, outcome: Option<&SimulationOutcome>) -> String {
    let mut html = String::from("<form method=\"get\" action=\"/\">\n");
    html.push_str("<input type=\"hidden\" name=\"tab\" value=\"simulation\">\n");
    for (input, value) in SCENARIO_INPUTS.iter().zip(form.values()) {
        html.push_str(&render_range_input(input, value));
    }
    html.push_str("<button type=\"submit\" name=\"calculate\" value=\"1\">Calculate yield</button>\n");
    html.push_str("</form>\n");

    match outcome {
        Some(Ok(simulation)) => html.push_str(&render_simulation_result(simulation)),
        Some(Err(error)) => html.push_str(&render_error(error)),
        None => {}
    }
    html
}

fn input_label(input: &InputRange) -> &'static str {
    match input.field {
        "humidity" => Column::Humidity.label(),
        "ph" => Column::Ph.label(),
        "irrigation" => Column::Irrigation.label(),
        "fertilizer" => Column::Fertilizer.label(),
        other => other,
    }
}

fn render_range_input(input: &InputRange, value: f64) -> String {
    let value = value.clamp(input.min, input.max);
    let value = if value.is_nan() { input.default } else { value };
    format!(
        "<label>{label}: <output>{value}</output>\n\
         <input type=\"range\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" \
         oninput=\"this.previousElementSibling.value=this.value\"></label>\n",
        label = input_label(input),
        name = input.field,
        min = input.min,
        max = input.max,
        step = input.step,
    )
}

fn render_simulation_result(simulation: &Simulation) -> String {
    let mut html = format!(
        "<p class=\"prediction\">Predicted yield: {:.2}</p>\n<h3>Recommendations</h3>\n<ul class=\"recommendations\">\n",
        simulation.predicted_yield
    );
    for advisory in &simulation.recommendations {
        let line = match advisory.category() {
            AdvisoryCategory::Stable => advisory.message().to_string(),
            _ => format!("{}: {}", advisory.reason(), advisory.message()),
        };
        html.push_str(&format!("<li>{}</li>\n", html_escape::encode_text(&line)));
    }
    html.push_str("</ul>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_lib::dataset::{generate_to_path, GeneratorConfig};
    use agro_lib::{Advisory, SessionCache};
    use tempfile::TempDir;

    fn loaded_session(rows: usize) -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dados_agricolas.csv");
        generate_to_path(&path, &GeneratorConfig { seed: 42, rows }).unwrap();
        let session = Session::load(&SessionCache::new(), &path);
        (dir, session)
    }

    fn failed_session(error: AgroError) -> Session {
        Session {
            data_path: "dados_agricolas.csv".to_string(),
            dataset: Err(error.clone()),
            trained: Err(error),
            fit_seconds: None,
        }
    }

    #[test]
    fn test_view_from_tab() {
        assert_eq!(View::from_tab(None), View::Data);
        assert_eq!(View::from_tab(Some("metrics")), View::Metrics);
        assert_eq!(View::from_tab(Some("simulation")), View::Simulation);
        assert_eq!(View::from_tab(Some("bogus")), View::Data);
    }

    #[test]
    fn test_form_defaults_and_overrides() {
        let form = ScenarioForm::from_query(&PageQuery::default());
        assert_eq!(form.values(), [50.0, 6.0, 10.0, 100.0]);

        let query = PageQuery {
            ph: Some(7.25),
            ..PageQuery::default()
        };
        assert_eq!(ScenarioForm::from_query(&query).ph, 7.25);
    }

    #[test]
    fn test_data_view_shows_preview_and_summary() {
        let (_dir, session) = loaded_session(300);
        let html = render_page(View::Data, &session, &ScenarioForm::default(), None);

        assert!(html.contains("300 rows loaded"));
        let preview = html.split("<table class=\"preview\">").nth(1).unwrap();
        let preview = preview.split("</table>").next().unwrap();
        // Header row plus five data rows
        assert_eq!(preview.matches("<tr>").count(), 6);
        assert!(html.contains("<th>produtividade</th>"));
        for stat in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
            assert!(html.contains(&format!("<tr><th>{stat}</th>")), "missing {stat}");
        }
        assert!(html.contains("<td>300</td>"));
    }

    #[test]
    fn test_metrics_view_shows_cards_and_charts() {
        let (_dir, session) = loaded_session(300);
        let trained = session.trained.as_ref().unwrap();
        let html = render_page(View::Metrics, &session, &ScenarioForm::default(), None);

        for label in ["MAE", "MSE", "RMSE", "R²"] {
            assert!(html.contains(&format!("<div class=\"label\">{label}</div>")));
        }
        assert!(html.contains(&format!("{:.2}", trained.metrics.rmse)));
        assert!(html.contains("class=\"heatmap\""));
        assert!(html.contains("class=\"scatter\""));
        assert_eq!(html.matches("class=\"point\"").count(), 60);
    }

    #[test]
    fn test_metrics_view_with_untrainable_dataset() {
        let (_dir, session) = loaded_session(1);
        let html = render_page(View::Metrics, &session, &ScenarioForm::default(), None);

        assert!(html.contains("class=\"error\""));
        assert!(html.contains("insufficient data"));
        assert!(html.contains("class=\"heatmap\""));
        assert!(!html.contains("class=\"scatter\""));
    }

    #[test]
    fn test_simulation_form_without_submit() {
        let (_dir, session) = loaded_session(50);
        let html = render_page(View::Simulation, &session, &ScenarioForm::default(), None);

        assert_eq!(html.matches("type=\"range\"").count(), 4);
        assert!(html.contains(
            "name=\"ph\" min=\"4\" max=\"8\" step=\"0.01\" value=\"6\""
        ));
        assert!(html.contains(
            "name=\"fertilizer\" min=\"0\" max=\"300\" step=\"1\" value=\"100\""
        ));
        assert!(html.contains("Calculate yield"));
        assert!(!html.contains("Predicted yield:"));
    }

    #[test]
    fn test_short_dataset_preview_counts_its_rows() {
        let (_dir, session) = loaded_session(3);
        let html = render_page(View::Data, &session, &ScenarioForm::default(), None);

        assert!(html.contains("3 rows loaded. First 3 rows:"));
        let preview = html.split("<table class=\"preview\">").nth(1).unwrap();
        let preview = preview.split("</table>").next().unwrap();
        assert_eq!(preview.matches("<tr>").count(), 4);
    }

    #[test]
    fn test_stable_plan_is_listed_without_reason() {
        let (_dir, session) = loaded_session(50);
        let outcome: SimulationOutcome = Ok(Simulation {
            scenario: ScenarioForm::default().features(),
            predicted_yield: 60.0,
            recommendations: vec![Advisory::StablePlan],
        });
        let html = render_page(
            View::Simulation,
            &session,
            &ScenarioForm::default(),
            Some(&outcome),
        );

        assert!(html.contains("<li>conditions stable, maintain current plan.</li>"));
    }

    #[test]
    fn test_simulation_result_lists_recommendations_in_order() {
        let (_dir, session) = loaded_session(50);
        let outcome: SimulationOutcome = Ok(Simulation {
            scenario: ScenarioForm::default().features(),
            predicted_yield: 91.234,
            recommendations: vec![
                Advisory::ReduceIrrigation,
                Advisory::ApplyLime,
                Advisory::MaintainManagement,
            ],
        });
        let html = render_page(
            View::Simulation,
            &session,
            &ScenarioForm::default(),
            Some(&outcome),
        );

        assert!(html.contains("Predicted yield: 91.23"));
        assert!(html.contains("<li>High humidity: reduce irrigation</li>"));
        let reduce = html.find("reduce irrigation").unwrap();
        let lime = html.find("apply lime").unwrap();
        let maintain = html.find("maintain current management").unwrap();
        assert!(reduce < lime && lime < maintain);
    }

    #[test]
    fn test_errors_replace_dependent_views() {
        let session = failed_session(AgroError::DataUnavailable {
            path: "dados_agricolas.csv".to_string(),
            reason: "No such file <or> directory".to_string(),
        });

        for view in View::ALL {
            let html = render_page(view, &session, &ScenarioForm::default(), None);
            assert!(html.contains("role=\"alert\""));
            assert!(html.contains("No such file &lt;or&gt; directory"));
            assert!(!html.contains("<table"));
            assert!(!html.contains("type=\"range\""));
            // Navigation keeps working
            assert_eq!(html.matches("<a href=\"/?tab=").count(), 3);
        }
    }
}

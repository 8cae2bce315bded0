//! HTML templates using Askama.

use askama::Template;

use crate::domain::chart_request::ChartOutcome;

use super::handlers::ChartFormData;

const FUNCTIONS: [(&str, &str); 2] = [
    ("TIME_SERIES_DAILY", "Daily"),
    ("TIME_SERIES_INTRADAY", "Intraday"),
];
const INTERVALS: [&str; 5] = ["1min", "5min", "15min", "30min", "60min"];
const CHART_TYPES: [(&str, &str); 2] = [("line", "Line"), ("bar", "Bar")];

pub struct SelectOption<'a> {
    pub value: &'a str,
    pub label: &'a str,
    pub selected: bool,
}

/// Options with the submitted value marked, or the first one when nothing matches.
fn options<'a>(
    choices: impl IntoIterator<Item = (&'a str, &'a str)>,
    submitted: &str,
) -> Vec<SelectOption<'a>> {
    let mut opts: Vec<SelectOption<'a>> = choices
        .into_iter()
        .map(|(value, label)| SelectOption {
            value,
            label,
            selected: value == submitted,
        })
        .collect();
    if !opts.iter().any(|o| o.selected) {
        if let Some(first) = opts.first_mut() {
            first.selected = true;
        }
    }
    opts
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub symbols: Vec<SelectOption<'a>>,
    pub functions: Vec<SelectOption<'a>>,
    pub intervals: Vec<SelectOption<'a>>,
    pub chart_types: Vec<SelectOption<'a>>,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub chart_uri: Option<String>,
    pub error_message: Option<&'static str>,
}

impl<'a> IndexTemplate<'a> {
    pub fn new(symbols: &'a [String], form: &'a ChartFormData, outcome: &ChartOutcome) -> Self {
        Self {
            symbols: options(
                symbols.iter().map(|s| (s.as_str(), s.as_str())),
                form.symbol.trim(),
            ),
            functions: options(FUNCTIONS, form.function.trim()),
            intervals: options(INTERVALS.iter().map(|i| (*i, *i)), form.interval.trim()),
            chart_types: options(CHART_TYPES, form.chart_type.trim()),
            start_date: &form.start_date,
            end_date: &form.end_date,
            chart_uri: outcome.chart().map(|c| c.data_uri()),
            error_message: outcome.error_message(),
        }
    }

    /// The result block only, for HTMX swaps.
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"result\">");
        if let Some(message) = self.error_message {
            html.push_str(&format!("<p class=\"error\">{}</p>", message));
        }
        if let Some(uri) = &self.chart_uri {
            html.push_str(&format!(
                "<img class=\"chart\" src=\"{}\" alt=\"Stock price chart\">",
                uri
            ));
        }
        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

impl<'a> ErrorTemplate<'a> {
    pub fn fragment(&self) -> String {
        format!(
            "<div id=\"error\" class=\"error\"><h1>Error {}</h1><p>{}</p></div>",
            self.status, self.message
        )
    }
}

// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{
        Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Wrap,
    },
    Frame, Terminal,
};

use crate::errors::ServiceError;
use crate::presentation::form::{Field, FormAction, FormState};
use crate::presentation::report::PredictionReport;
use crate::presentation::summary::MarketSummary;
use crate::service::PriceModel;

const TOP_BRANDS: usize = 10;

struct Controls;

impl Controls {
    fn render(f: &mut Frame, area: Rect) {
        let items = vec![
            ListItem::new("Up/Down: Select field"),
            ListItem::new("Left/Right: Change choice"),
            ListItem::new("0-9 . Backspace: Edit number"),
            ListItem::new("Enter: Predict price"),
            ListItem::new("Esc: Quit"),
        ];
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Controls"))
            .style(Style::default().fg(Color::White));
        f.render_widget(list, area);
    }
}

/// The prediction screen: form on the left, market charts and the latest
/// report on the right.
pub struct PriceApp<'a> {
    summary: &'a MarketSummary,
    service: Result<PriceModel, ServiceError>,
    form: FormState,
    report: Option<PredictionReport>,
}

impl<'a> PriceApp<'a> {
    pub fn new(summary: &'a MarketSummary, service: Result<PriceModel, ServiceError>) -> Self {
        PriceApp { summary, service, form: FormState::new(), report: None }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.report.as_ref()
    }

    pub fn into_report(self) -> Option<PredictionReport> {
        self.report
    }

    /// Feeds one key to the form. Returns `false` once the user quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.form.handle_key(key, self.summary) {
            FormAction::Continue => true,
            FormAction::Quit => false,
            FormAction::Submit(input) => {
                let prediction = match &self.service {
                    Ok(service) => service.predict(&input.to_record()).map_err(|e| e.to_string()),
                    Err(err) => Err(err.to_string()),
                };
                match &prediction {
                    Ok(price) => info!("Predicted {:.0} for {} {}", price, input.brand, input.model),
                    Err(message) => warn!("Prediction unavailable: {}", message),
                }
                self.report = Some(PredictionReport::new(&input, prediction, self.summary));
                true
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(f.area());

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(13), // Form
                Constraint::Length(7),  // Controls
                Constraint::Min(0),     // Status
            ])
            .split(chunks[0]);

        self.render_form(f, left_chunks[0]);
        Controls::render(f, left_chunks[1]);
        self.render_status(f, left_chunks[2]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Min(0),
            ])
            .split(chunks[1]);

        self.render_age_chart(f, right_chunks[0]);
        self.render_brand_chart(f, right_chunks[1]);
        self.render_report(f, right_chunks[2]);
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .form
            .entries(self.summary)
            .into_iter()
            .map(|(field, value)| {
                let text = if field.is_choice() {
                    format!("{}: < {} >", field.label(), value)
                } else {
                    format!("{}: {}", field.label(), value)
                };
                ListItem::new(text)
            })
            .collect();
        let focus = Field::ALL.iter().position(|field| *field == self.form.focus());

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Car Details"))
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(focus);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let (text, color) = match (self.form.error(), &self.service) {
            (Some(error), _) => (error.to_string(), Color::Red),
            (None, Err(err)) => (format!("Model unavailable: {}", err), Color::Yellow),
            (None, Ok(_)) => (format!("Listings: {}", self.summary.len()), Color::White),
        };
        let status = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true });
        f.render_widget(status, area);
    }

    fn render_age_chart(&self, f: &mut Frame, area: Rect) {
        // Prices in thousands of rupees.
        let points: Vec<(f64, f64)> = self
            .summary
            .price_by_age()
            .into_iter()
            .map(|(age, price)| (f64::from(age), price / 1000.0))
            .collect();
        let max_age = points.iter().map(|p| p.0).fold(1.0, f64::max);
        let max_price = points.iter().map(|p| p.1).fold(1.0, f64::max);

        let dataset = Dataset::default()
            .name("Average price")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(Block::default().borders(Borders::ALL).title("Age Impact on Price"))
            .x_axis(
                Axis::default()
                    .title("Age (years)")
                    .style(Style::default().fg(Color::White))
                    .bounds([0.0, max_age])
                    .labels(["0".to_string(), format!("{:.0}", max_age)]),
            )
            .y_axis(
                Axis::default()
                    .title("₹ thousands")
                    .style(Style::default().fg(Color::White))
                    .bounds([0.0, max_price])
                    .labels(["0".to_string(), format!("{:.0}", max_price)]),
            );
        f.render_widget(chart, area);
    }

    fn render_brand_chart(&self, f: &mut Frame, area: Rect) {
        let bars: Vec<(&str, u64)> = self
            .summary
            .top_brands(TOP_BRANDS)
            .into_iter()
            .map(|(brand, price)| (brand, (price / 1000.0).round() as u64))
            .collect();

        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title("Price Distribution by Brand"))
            .data(bars.as_slice())
            .bar_width(7)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        f.render_widget(chart, area);
    }

    fn render_report(&self, f: &mut Frame, area: Rect) {
        let text = match &self.report {
            Some(report) => report.to_string(),
            None => "Fill in the car details and press Enter.".to_string(),
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Prediction"))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Runs the prediction screen until the user quits and returns the last
/// report, if any prediction was requested.
pub fn run_app(
    summary: &MarketSummary,
    service: Result<PriceModel, ServiceError>,
) -> io::Result<Option<PredictionReport>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = PriceApp::new(summary, service);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|_| app.into_report())
}

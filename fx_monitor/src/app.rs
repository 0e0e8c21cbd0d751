//! Monitor session: applies feed messages to the dispatcher and reports what changed.

use std::collections::HashSet;

use fx_common::command::{Command, FeedMessage};
use fx_common::dispatcher::{ChartDelta, Dispatcher, TableRow};
use fx_common::time::Clock;
use log::{debug, warn};

/// Something the renderer should show after a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Refreshed table row.
    Row(TableRow),
    /// Chart change for the selected symbol.
    Chart(ChartDelta),
    /// Chart cleared; carries the new chart title.
    ChartCleared(String),
    /// Command that could not be applied, with the reason.
    Rejected(String),
}

/// Feed-message front end of a `Dispatcher`.
pub struct Monitor<C: Clock> {
    dispatcher: Dispatcher<C>,
    symbols: Option<HashSet<String>>,
}

impl<C: Clock> Monitor<C> {
    /// Wraps `dispatcher`. With `symbols` set, quotes for any other symbol are ignored.
    pub fn new(dispatcher: Dispatcher<C>, symbols: Option<HashSet<String>>) -> Self {
        Self {
            dispatcher,
            symbols,
        }
    }

    /// Applies one feed message.
    pub fn handle(&mut self, message: FeedMessage) -> Vec<Output> {
        match message {
            FeedMessage::Quote(raw) => {
                if !self.accepts(&raw.symbol) {
                    debug!("Ignoring quote for unlisted symbol {}", raw.symbol);
                    return Vec::new();
                }
                let update = self.dispatcher.on_raw(&raw);
                let mut outputs = vec![Output::Row(update.row)];
                outputs.extend(update.chart.map(Output::Chart));
                outputs
            }
            FeedMessage::Command(command) => self.apply_command(command),
        }
    }

    fn apply_command(&mut self, command: Command) -> Vec<Output> {
        match command {
            Command::Snapshot(quotes) => {
                let accepted: Vec<_> = quotes
                    .values()
                    .filter(|raw| self.accepts(&raw.symbol))
                    .collect();
                let mut outputs: Vec<Output> = self
                    .dispatcher
                    .apply_snapshot(accepted)
                    .into_iter()
                    .map(Output::Row)
                    .collect();
                outputs.push(self.cleared());
                outputs
            }
            Command::SelectSymbol(symbol) => {
                self.dispatcher.select_symbol(symbol.trim());
                vec![self.cleared()]
            }
            Command::SelectMetric(name) => match self.dispatcher.select_metric_name(&name) {
                Ok(()) => vec![self.cleared()],
                Err(e) => {
                    warn!("Metric change rejected: {}", e);
                    vec![Output::Rejected(e.to_string())]
                }
            },
            Command::SetRetention(secs) => match self.dispatcher.set_retention(secs) {
                Ok(evicted) => {
                    debug!("Retention set to {}s, {} points evicted", secs, evicted);
                    Vec::new()
                }
                Err(e) => {
                    warn!("Retention change rejected: {}", e);
                    vec![Output::Rejected(e.to_string())]
                }
            },
            Command::Reset => {
                self.dispatcher.reset_chart();
                vec![self.cleared()]
            }
        }
    }

    fn accepts(&self, symbol: &str) -> bool {
        self.symbols.as_ref().is_none_or(|s| s.contains(symbol))
    }

    fn cleared(&self) -> Output {
        Output::ChartCleared(self.dispatcher.selection().title())
    }

    /// Underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }
}

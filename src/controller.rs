use crate::classify::{DisplayState, Outcome, NO_SUCH_COUNTRY, TOO_MANY_MATCHES};
use crate::country::Country;
use crate::display::{Notifier, Surface};
use crate::error::QueryError;
use crate::query::CountrySource;
use crate::render::{render_detail, render_list};

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the last applied input or reply put in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    Cleared,
    Detail,
    List(usize),
    TooMany(usize),
    Failure,
}

#[derive(Debug)]
struct Reply {
    seq: u64,
    query: String,
    result: Result<Vec<Country>, QueryError>,
}

/// Turns settled input values into lookups and lookups into markup or notices.
///
/// Every dispatch (a lookup or a clear) takes the next sequence number. Replies carrying
/// anything but the latest number are dropped, so a slow early lookup can never paint
/// over a later one.
pub struct SearchController<S, D, N> {
    source: Arc<S>,
    surface: D,
    notifier: N,
    state: DisplayState,
    last_shown: Option<Shown>,
    issued: u64,
    in_flight: usize,
    replies_tx: mpsc::UnboundedSender<Reply>,
    replies_rx: mpsc::UnboundedReceiver<Reply>,
}

impl<S, D, N> SearchController<S, D, N>
where
    S: CountrySource,
    D: Surface,
    N: Notifier,
{
    pub fn new(source: Arc<S>, surface: D, notifier: N) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            source,
            surface,
            notifier,
            state: DisplayState::Empty,
            last_shown: None,
            issued: 0,
            in_flight: 0,
            replies_tx,
            replies_rx,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn last_shown(&self) -> Option<Shown> {
        self.last_shown
    }

    /// Consume input values until `inputs` closes and every lookup has answered.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<String>) -> Self {
        let mut inputs_open = true;
        loop {
            tokio::select! {
                input = inputs.recv(), if inputs_open => match input {
                    Some(raw) => self.submit(&raw),
                    None => inputs_open = false,
                },
                Some(reply) = self.replies_rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    self.apply(reply);
                },
                else => break,
            }

            if !inputs_open && self.in_flight == 0 {
                break;
            }
        }
        self
    }

    /// Handle one settled value of the input field.
    pub fn submit(&mut self, raw: &str) {
        let query = raw.trim();
        self.issued += 1;
        let seq = self.issued;

        if query.is_empty() {
            debug!(seq, "empty input, clearing");
            self.clear_regions();
            self.state = DisplayState::Empty;
            self.last_shown = Some(Shown::Cleared);
            return;
        }

        debug!(seq, query, "dispatching lookup");
        let source = Arc::clone(&self.source);
        let replies = self.replies_tx.clone();
        let query = query.to_string();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = source.search(&query).await;
            let _ = replies.send(Reply { seq, query, result });
        });
    }

    fn apply(&mut self, reply: Reply) {
        if reply.seq != self.issued {
            debug!(
                seq = reply.seq,
                latest = self.issued,
                query = %reply.query,
                "discarding stale reply"
            );
            return;
        }

        let countries = match reply.result {
            Ok(countries) => countries,
            Err(err) => {
                if err.is_not_found() {
                    debug!(query = %reply.query, "no country matches");
                } else {
                    warn!(query = %reply.query, error = %err, "lookup failed");
                }
                self.notifier.failure(NO_SUCH_COUNTRY);
                self.last_shown = Some(Shown::Failure);
                return;
            }
        };

        let outcome = Outcome::classify(countries);
        self.clear_regions();
        let shown = match &outcome {
            Outcome::Nothing => Shown::Cleared,
            Outcome::Detail(country) => {
                let markup = render_detail(std::slice::from_ref(country));
                if let Err(e) = self.surface.replace_detail(&markup) {
                    warn!(error = %e, "failed to update detail region");
                }
                Shown::Detail
            }
            Outcome::List(countries) => {
                let markup = render_list(countries);
                if let Err(e) = self.surface.replace_list(&markup) {
                    warn!(error = %e, "failed to update list region");
                }
                Shown::List(countries.len())
            }
            Outcome::TooMany(n) => {
                self.notifier.info(TOO_MANY_MATCHES);
                Shown::TooMany(*n)
            }
        };

        self.state = outcome.display_state();
        self.last_shown = Some(shown);
    }

    fn clear_regions(&mut self) {
        if let Err(e) = self.surface.clear() {
            warn!(error = %e, "failed to clear display regions");
        }
    }
}

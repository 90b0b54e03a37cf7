use chrono::Local;
use tracing::debug;

use crate::config::Config;
use crate::countdown::Countdown;
use crate::error::FetchError;
use crate::form::OptionsForm;
use crate::history::History;
use crate::poll::PollMsg;
use crate::storage::LastVisit;

/// All state of one dashboard session.
pub struct App {
    /// Fixed for the session; changing it starts a new `App`.
    pub config: Config,
    pub history: History,
    /// Number of finished lookups, successful or not.
    pub lookups: u64,
    /// The last lookup's error, cleared by the next success.
    pub error: Option<FetchError>,
    /// Countdown to the next scheduled lookup, once the first cycle started.
    pub countdown: Option<Countdown>,
    /// The options form, while it is open.
    pub form: Option<OptionsForm>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last poll status message.
    pub status: String,
}

impl App {
    pub fn new(config: Config, last_visit: Option<&LastVisit>) -> Self {
        Self {
            config,
            history: History::with_last_visit(last_visit),
            lookups: 0,
            error: None,
            countdown: None,
            form: None,
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// Fold one message from the poller into the state.
    pub fn apply(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Fetched(Ok(response)) => {
                self.lookups += 1;
                self.error = None;
                self.status = format!("Last lookup at {}", Local::now().format("%H:%M:%S"));
                self.history.record(response.snapshot);
            }
            PollMsg::Fetched(Err(e)) => {
                self.lookups += 1;
                self.status = format!("Lookup failed at {}", Local::now().format("%H:%M:%S"));
                self.error = Some(e);
            }
            PollMsg::CycleStarted(start) => {
                debug!(event = "app.cycle_started", lookups = self.lookups);
                self.countdown = Some(Countdown::new(start, self.config.interval()));
            }
        }
    }

    // -- options form --------------------------------------------------------

    pub fn open_form(&mut self) {
        self.form = Some(OptionsForm::from_config(&self.config));
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }
}

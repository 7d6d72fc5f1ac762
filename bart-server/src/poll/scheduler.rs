//! Background refresh task.
//!
//! One task owns the [`PollState`]. It reacts to three events:
//!
//! - the selection changed: abort the cycle in flight, start over with a
//!   fresh state and refresh at once
//! - the interval ticked: start a cycle unless one is still running
//! - a cycle finished: commit it if its token is still current, then
//!   publish a new snapshot
//!
//! Cycles run in their own tasks and fetch both feeds concurrently. A
//! cycle only reports once both fetches have settled, so readers never
//! see a half-updated board.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use futures::future::{AbortHandle, abortable};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::bart::FeedSource;
use crate::board::resolve_duration;

use super::config::PollConfig;
use super::state::{
    BoardSnapshot, CycleReport, CycleToken, DepartureFeed, Outcome, PollState, Selection,
};

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Handle to a running poller.
///
/// Cloneable. The background task stops once every handle is dropped.
#[derive(Clone)]
pub struct PollerHandle {
    selection: Arc<watch::Sender<Selection>>,
    snapshots: watch::Receiver<Arc<BoardSnapshot>>,
}

impl PollerHandle {
    /// Change the selection. Returns `false` if it was already selected.
    pub fn select(&self, selection: Selection) -> bool {
        self.selection.send_if_modified(|current| {
            if *current == selection {
                false
            } else {
                *current = selection;
                true
            }
        })
    }

    pub fn selection(&self) -> Selection {
        *self.selection.borrow()
    }

    /// The most recently published board.
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.snapshots.clone()
    }
}

/// Start polling `source` for `initial`. The first cycle begins immediately.
pub fn spawn_poller<S: FeedSource>(
    source: Arc<S>,
    initial: Selection,
    config: PollConfig,
) -> PollerHandle {
    let state = PollState::new(initial);
    let (selection_tx, selection_rx) = watch::channel(initial);
    let (snapshot_tx, snapshot_rx) =
        watch::channel(Arc::new(state.snapshot(local_now(), config.max_rows)));
    let (reports_tx, reports_rx) = mpsc::channel(4);

    let task = PollTask {
        source,
        config,
        state,
        selection_rx,
        snapshot_tx,
        reports_tx,
        reports_rx,
        next_token: 0,
        in_flight: None,
    };
    tokio::spawn(task.run());

    PollerHandle {
        selection: Arc::new(selection_tx),
        snapshots: snapshot_rx,
    }
}

enum Event {
    Selected,
    HandlesDropped,
    Tick,
    Finished(CycleReport),
}

struct PollTask<S> {
    source: Arc<S>,
    config: PollConfig,
    state: PollState,
    selection_rx: watch::Receiver<Selection>,
    snapshot_tx: watch::Sender<Arc<BoardSnapshot>>,
    reports_tx: mpsc::Sender<CycleReport>,
    reports_rx: mpsc::Receiver<CycleReport>,
    next_token: u64,
    in_flight: Option<(CycleToken, AbortHandle)>,
}

impl<S: FeedSource> PollTask<S> {
    async fn run(mut self) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                biased;
                changed = self.selection_rx.changed() => match changed {
                    Ok(()) => Event::Selected,
                    Err(_) => Event::HandlesDropped,
                },
                Some(report) = self.reports_rx.recv() => Event::Finished(report),
                _ = interval.tick() => Event::Tick,
            };

            match event {
                Event::Selected => {
                    let selection = *self.selection_rx.borrow_and_update();
                    self.reselect(selection);
                    interval.reset_immediately();
                }
                Event::HandlesDropped => break,
                Event::Tick => self.start_cycle(),
                Event::Finished(report) => self.finish_cycle(report),
            }
        }

        self.abort_in_flight();
        debug!("poller stopped");
    }

    fn reselect(&mut self, selection: Selection) {
        info!(
            station = %selection.station,
            dir = %selection.direction,
            dest = %selection.destination,
            "selection changed"
        );
        self.abort_in_flight();
        self.state = PollState::new(selection);
        self.publish();
    }

    fn start_cycle(&mut self) {
        if let Some((token, _)) = &self.in_flight {
            debug!(cycle = token.0, "previous cycle still running; skipping tick");
            return;
        }

        self.next_token += 1;
        let token = CycleToken(self.next_token);
        let selection = self.state.selection();
        self.state.begin_cycle(token);
        debug!(cycle = token.0, station = %selection.station, "starting refresh");

        let (cycle, abort) = abortable(run_cycle(self.source.clone(), selection, token));
        let reports = self.reports_tx.clone();
        tokio::spawn(async move {
            if let Ok(report) = cycle.await {
                let _ = reports.send(report).await;
            }
        });
        self.in_flight = Some((token, abort));
    }

    fn finish_cycle(&mut self, report: CycleReport) {
        if self.in_flight.as_ref().is_some_and(|(t, _)| *t == report.token) {
            self.in_flight = None;
        }

        let token = report.token;
        match self.state.commit(report, local_now()) {
            Ok(Outcome::Success) => debug!(cycle = token.0, "refresh succeeded"),
            Ok(outcome) => warn!(cycle = token.0, ?outcome, "refresh failed"),
            Err(stale) => {
                debug!("discarding result: {stale}");
                return;
            }
        }
        self.publish();
    }

    fn abort_in_flight(&mut self) {
        if let Some((token, abort)) = self.in_flight.take() {
            debug!(cycle = token.0, "aborting refresh");
            abort.abort();
        }
    }

    fn publish(&self) {
        let snapshot = self.state.snapshot(local_now(), self.config.max_rows);
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}

/// Fetch both feeds concurrently and reduce them to a report.
async fn run_cycle<S: FeedSource>(
    source: Arc<S>,
    selection: Selection,
    token: CycleToken,
) -> CycleReport {
    let (departures, trips) = tokio::join!(
        source.fresh_departures(selection.station, selection.direction),
        source.trips(selection.station, selection.destination),
    );

    let departures = departures
        .map(|board| DepartureFeed::from_board(&board))
        .map_err(|e| e.to_string());

    let duration = trips.map_err(|e| e.to_string()).and_then(|candidates| {
        resolve_duration(selection.station, selection.destination, &candidates)
            .map_err(|e| e.to_string())
    });

    CycleReport {
        token,
        departures,
        duration,
    }
}

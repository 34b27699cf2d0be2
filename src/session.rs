//! Live session: the current input snapshot, its result, and the insight
//! lifecycle. Every input change recomputes and starts a new generation.

use chrono::Local;
use tracing::debug;

use crate::calculator::{compute, fee_regime};
use crate::insight::{InsightError, InsightSnapshot};
use crate::types::{Edit, FeeRegime, InsightStatus, TradeInput, TradeResult};

/// A pending insight request tied to the snapshot that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub id: u64,
    pub generation: u64,
    pub snapshot: InsightSnapshot,
}

#[derive(Debug)]
pub struct Session {
    baseline: TradeInput,
    input: TradeInput,
    result: Option<TradeResult>,
    generation: u64,
    next_request_id: u64,
    insight: InsightStatus,
    entered_degenerate_fee: bool,
}

impl Session {
    pub fn new(baseline: TradeInput) -> Self {
        Self {
            baseline,
            input: baseline,
            result: compute(&baseline),
            generation: 0,
            next_request_id: 1,
            insight: InsightStatus::Idle,
            entered_degenerate_fee: false,
        }
    }

    pub fn input(&self) -> &TradeInput {
        &self.input
    }

    pub fn result(&self) -> Option<&TradeResult> {
        self.result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn insight(&self) -> &InsightStatus {
        &self.insight
    }

    /// True only right after the edit that moved the fee rate to 100% or more.
    pub fn entered_degenerate_fee(&self) -> bool {
        self.entered_degenerate_fee
    }

    /// Returns `true` when a new snapshot was produced.
    pub fn apply(&mut self, edit: &Edit) -> bool {
        let mut next = self.input;
        match edit {
            Edit::BuyPrice(v) => next.buy_price = *v,
            Edit::SellPrice(v) => next.sell_price = *v,
            Edit::Amount(v) => next.amount = *v,
            Edit::FeePercentage(v) => next.fee_percentage = *v,
            Edit::Mode(m) => next.mode = *m,
            Edit::Reset => next = self.baseline,
            _ => return false,
        }
        self.set_input(next);
        true
    }

    fn set_input(&mut self, next: TradeInput) {
        let was = fee_regime(self.input.fee_percentage);
        self.input = next;
        self.result = compute(&self.input);
        self.generation += 1;
        self.entered_degenerate_fee = was == FeeRegime::Normal
            && fee_regime(self.input.fee_percentage) == FeeRegime::Degenerate;
        // Any insight describes the previous snapshot.
        self.insight = InsightStatus::Idle;
    }

    /// `None` when there is no defined result to describe. A new request
    /// supersedes any request still in flight.
    pub fn begin_insight(&mut self, label: &str) -> Option<InsightRequest> {
        let result = self.result.as_ref()?;
        let id = self.next_request_id;
        self.next_request_id += 1;
        let req = InsightRequest {
            id,
            generation: self.generation,
            snapshot: InsightSnapshot::new(result, label),
        };
        self.insight = InsightStatus::InFlight { request_id: id };
        Some(req)
    }

    /// Returns whether the outcome became live; anything but the current
    /// in-flight request is dropped.
    pub fn resolve_insight(&mut self, request_id: u64, outcome: Result<String, InsightError>) -> bool {
        let live = matches!(self.insight, InsightStatus::InFlight { request_id: id } if id == request_id);
        if !live {
            debug!(
                "dropping stale insight for request {} (status {:?})",
                request_id, self.insight
            );
            return false;
        }
        self.insight = match outcome {
            Ok(text) => InsightStatus::Ready {
                text,
                at: Local::now(),
            },
            Err(_) => InsightStatus::Failed,
        };
        true
    }
}

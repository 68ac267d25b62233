// inventory/src/checkout.rs
use crate::{Basket, BasketLine, Catalog, InventoryError};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Checkout progress for the current basket.
/// `Idle -> AwaitingAuth -> Committed`, and back to `Idle` on abort.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// Waiting for the caller to authenticate and try again
    AwaitingAuth,
    /// Basket converted into sold shares
    Committed,
}

impl CheckoutState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CheckoutState::Idle)
    }

    pub fn is_awaiting_auth(&self) -> bool {
        matches!(self, CheckoutState::AwaitingAuth)
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, CheckoutState::Committed)
    }
}

/// Proof of a committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub lines: Vec<BasketLine>,
    pub total: Decimal,
    pub committed_at: DateTime<Utc>,
}

impl Receipt {
    fn new(lines: Vec<BasketLine>, total: Decimal) -> Self {
        Self {
            id: Uuid::now_v7(),
            lines,
            total,
            committed_at: Utc::now(),
        }
    }

    pub fn share_count(&self) -> u64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Nothing to buy
    Empty,
    /// Not a failure: authenticate, then call `attempt_checkout` again
    AuthenticationRequired,
    Committed(Receipt),
}

impl CheckoutOutcome {
    fn label(&self) -> &'static str {
        match self {
            CheckoutOutcome::Empty => "empty",
            CheckoutOutcome::AuthenticationRequired => "auth_required",
            CheckoutOutcome::Committed(_) => "committed",
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            CheckoutOutcome::Committed(receipt) => Some(receipt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Commit the whole basket or change nothing.
    ///
    /// Shares were taken out of the catalog when they were reserved, so a
    /// commit only forgets the reservations; availability stays as it is.
    /// `is_authenticated` is read, never changed. A basket too valuable to
    /// price is an error and leaves both the basket and the state untouched.
    pub fn attempt_checkout(
        &mut self,
        basket: &mut Basket,
        catalog: &Catalog,
        is_authenticated: bool,
    ) -> Result<CheckoutOutcome, InventoryError> {
        let outcome = if basket.is_empty() {
            self.transition(CheckoutState::Idle);
            CheckoutOutcome::Empty
        } else if !is_authenticated {
            self.transition(CheckoutState::AwaitingAuth);
            CheckoutOutcome::AuthenticationRequired
        } else {
            let lines = basket.lines(catalog)?;
            let total = basket.total_value(catalog)?;
            let receipt = Receipt::new(lines, total);

            basket.clear();
            self.transition(CheckoutState::Committed);

            histogram!("inventory.checkout.value").record(total.to_f64().unwrap_or(0.0));
            info!(
                receipt = %receipt.id,
                shares = receipt.share_count(),
                total = %receipt.total,
                "checkout committed"
            );
            CheckoutOutcome::Committed(receipt)
        };

        counter!("inventory.checkouts.total", "outcome" => outcome.label()).increment(1);
        Ok(outcome)
    }

    /// Give up on a pending authentication.
    pub fn abort(&mut self) {
        self.transition(CheckoutState::Idle);
    }

    fn transition(&mut self, target: CheckoutState) {
        if self.state != target {
            debug!(from = ?self.state, to = ?target, "checkout state changed");
        }
        self.state = target;
    }
}

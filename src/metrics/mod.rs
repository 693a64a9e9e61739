use prometheus::{IntCounterVec, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus counters for the fulfillment core
// ============================================================================
//
// - Order and exchange transitions, by transition
// - Stock ledger entries, purchase vs re-entry
// - Checkout outcomes
// - Unit-of-work concurrency conflicts, by operation
//
// Services take metrics optionally; render() produces the text exposition
// format for whatever scrapes it.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub order_transitions: IntCounterVec,
    pub exchange_transitions: IntCounterVec,
    pub stock_entries: IntCounterVec,
    pub checkouts: IntCounterVec,
    pub uow_conflicts: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let order_transitions = IntCounterVec::new(
            Opts::new("order_transitions_total", "Order status transitions committed"),
            &["transition"],
        )?;
        registry.register(Box::new(order_transitions.clone()))?;

        let exchange_transitions = IntCounterVec::new(
            Opts::new("exchange_transitions_total", "Exchange request transitions committed"),
            &["transition"],
        )?;
        registry.register(Box::new(exchange_transitions.clone()))?;

        let stock_entries = IntCounterVec::new(
            Opts::new("stock_entries_total", "Stock ledger entries recorded"),
            &["kind"],
        )?;
        registry.register(Box::new(stock_entries.clone()))?;

        let checkouts = IntCounterVec::new(
            Opts::new("checkouts_total", "Checkout attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(checkouts.clone()))?;

        let uow_conflicts = IntCounterVec::new(
            Opts::new("uow_conflicts_total", "Unit-of-work commits lost to a concurrent writer"),
            &["operation"],
        )?;
        registry.register(Box::new(uow_conflicts.clone()))?;

        Ok(Self {
            registry,
            order_transitions,
            exchange_transitions,
            stock_entries,
            checkouts,
            uow_conflicts,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_transition(&self, transition: &str) {
        self.order_transitions.with_label_values(&[transition]).inc();
    }

    pub fn record_exchange_transition(&self, transition: &str) {
        self.exchange_transitions.with_label_values(&[transition]).inc();
    }

    /// `kind` is "purchase" or "reentry"
    pub fn record_stock_entry(&self, kind: &str) {
        self.stock_entries.with_label_values(&[kind]).inc();
    }

    pub fn record_checkout(&self, outcome: &str) {
        self.checkouts.with_label_values(&[outcome]).inc();
    }

    pub fn record_conflict(&self, operation: &str) {
        self.uow_conflicts.with_label_values(&[operation]).inc();
    }

    /// Every registered metric in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

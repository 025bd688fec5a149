//! End-to-end scan flow: barcode in, reconciled ticket and troco out.
//!
//! The lookup backend is substituted at the `ProductLookup` seam with
//! in-memory tables, including a gated variant that lets tests control
//! reply ordering to exercise the stale-reply guard.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::oneshot;

use pdv_core::types::PaymentMethod;
use pdv_core::ScanReply;
use pdv_session::{
    ErrorCode, LookupError, ProductLookup, ScanOutcome, Scanner, TicketState,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn success_reply(id: &str, name: &str, preco: f64) -> Value {
    json!({ "ok": true, "id": id, "produto": name, "preco": preco })
}

fn decode(value: Option<Value>) -> Result<ScanReply, LookupError> {
    let value = value.ok_or_else(|| LookupError::Transport("connection refused".to_string()))?;
    serde_json::from_value(value).map_err(|e| LookupError::Decode(e.to_string()))
}

/// Immediate in-memory lookup table.
struct TableLookup {
    replies: HashMap<String, Value>,
}

impl ProductLookup for TableLookup {
    fn lookup(
        &self,
        barcode: &str,
    ) -> impl Future<Output = Result<ScanReply, LookupError>> + Send {
        let value = self.replies.get(barcode).cloned();
        async move { decode(value) }
    }
}

/// Lookup that signals when a barcode enters and holds its reply until
/// the test releases the gate.
struct GatedLookup {
    replies: HashMap<String, Value>,
    entered: Mutex<HashMap<String, oneshot::Sender<()>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl ProductLookup for GatedLookup {
    fn lookup(
        &self,
        barcode: &str,
    ) -> impl Future<Output = Result<ScanReply, LookupError>> + Send {
        if let Some(tx) = self.entered.lock().unwrap().remove(barcode) {
            let _ = tx.send(());
        }
        let gate = self.gates.lock().unwrap().remove(barcode);
        let value = self.replies.get(barcode).cloned();
        async move {
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            decode(value)
        }
    }
}

fn market_lookup() -> TableLookup {
    TableLookup {
        replies: HashMap::from([
            (
                "7891000100103".to_string(),
                success_reply("p-agua", "Água 500ml", 3.5),
            ),
            (
                "7891000200100".to_string(),
                success_reply("p-cafe", "Café 250g", 12.0),
            ),
            (
                "0000000000000".to_string(),
                json!({ "ok": false, "erro": "Produto não encontrado" }),
            ),
        ]),
    }
}

#[tokio::test]
async fn test_scan_to_troco_flow() {
    init_tracing();
    let scanner = Scanner::new(market_lookup(), TicketState::new());

    // Two waters and a coffee.
    scanner.scan("7891000100103").await.unwrap();
    scanner.scan("7891000100103").await.unwrap();
    let outcome = scanner.scan("7891000200100").await.unwrap();

    let view = match outcome {
        ScanOutcome::Applied(view) => view,
        ScanOutcome::Stale => panic!("sequential scans are never stale"),
    };
    assert_eq!(view.totals.line_count, 2);
    assert_eq!(view.totals.total_quantity, 3);
    assert_eq!(view.totals.total_cents, 1900); // 2×3,50 + 12,00

    // Cashier bumps the water quantity to 3 by editing the field.
    let water_id = view
        .lines
        .iter()
        .find(|l| l.product_id == "p-agua")
        .map(|l| l.id.clone())
        .unwrap();
    let view = scanner
        .state()
        .apply_quantity_input(&water_id, "3")
        .unwrap();
    assert_eq!(view.totals.total_cents, 2250);

    // R$ 25,00 in cash: R$ 2,50 back.
    let settlement = scanner
        .state()
        .apply_tender_input(PaymentMethod::Cash, "25,00");
    assert_eq!(settlement.change_cents, Some(250));
    assert!(settlement.paid);

    // Same tender on Pix: troco field stays blank.
    let settlement = scanner
        .state()
        .apply_tender_input(PaymentMethod::Pix, "25,00");
    assert_eq!(settlement.change_cents, None);
}

#[tokio::test]
async fn test_rejected_scan_leaves_ticket_untouched() {
    init_tracing();
    let scanner = Scanner::new(market_lookup(), TicketState::new());

    scanner.scan("7891000100103").await.unwrap();

    let err = scanner.scan("0000000000000").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScanRejected);
    assert_eq!(err.to_string(), "Produto não encontrado");

    let view = scanner.state().view();
    assert_eq!(view.totals.line_count, 1);
    assert_eq!(view.totals.total_cents, 350);
}

#[tokio::test]
async fn test_transport_failure_is_a_visible_error() {
    init_tracing();
    let scanner = Scanner::new(market_lookup(), TicketState::new());

    let err = scanner.scan("4044044044040").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::LookupFailed);
}

#[tokio::test]
async fn test_blank_barcode_never_reaches_lookup() {
    init_tracing();
    let scanner = Scanner::new(
        TableLookup {
            replies: HashMap::new(),
        },
        TicketState::new(),
    );

    let err = scanner.scan("   ").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_stale_scan_reply_is_discarded() {
    init_tracing();

    let (entered_slow_tx, entered_slow_rx) = oneshot::channel();
    let (entered_fast_tx, entered_fast_rx) = oneshot::channel();
    let (gate_slow_tx, gate_slow_rx) = oneshot::channel();
    let (gate_fast_tx, gate_fast_rx) = oneshot::channel();

    let lookup = GatedLookup {
        replies: HashMap::from([
            ("111".to_string(), success_reply("p-agua", "Água 500ml", 3.5)),
            ("222".to_string(), success_reply("p-cafe", "Café 250g", 12.0)),
        ]),
        entered: Mutex::new(HashMap::from([
            ("111".to_string(), entered_slow_tx),
            ("222".to_string(), entered_fast_tx),
        ])),
        gates: Mutex::new(HashMap::from([
            ("111".to_string(), gate_slow_rx),
            ("222".to_string(), gate_fast_rx),
        ])),
    };

    let scanner = Arc::new(Scanner::new(lookup, TicketState::new()));

    // First scan goes out and stalls in flight.
    let slow = tokio::spawn({
        let scanner = Arc::clone(&scanner);
        async move { scanner.scan("111").await }
    });
    entered_slow_rx.await.unwrap();

    // Second scan goes out while the first is still pending.
    let fast = tokio::spawn({
        let scanner = Arc::clone(&scanner);
        async move { scanner.scan("222").await }
    });
    entered_fast_rx.await.unwrap();

    // The newer scan's reply arrives first and applies.
    gate_fast_tx.send(()).unwrap();
    match fast.await.unwrap().unwrap() {
        ScanOutcome::Applied(view) => {
            assert_eq!(view.totals.line_count, 1);
            assert_eq!(view.lines[0].product_id, "p-cafe");
        }
        ScanOutcome::Stale => panic!("newest scan must apply"),
    }

    // The older reply limps in afterwards and must be discarded.
    gate_slow_tx.send(()).unwrap();
    assert!(matches!(
        slow.await.unwrap().unwrap(),
        ScanOutcome::Stale
    ));

    let view = scanner.state().view();
    assert_eq!(view.totals.line_count, 1);
    assert_eq!(view.lines[0].product_id, "p-cafe");
    assert_eq!(view.totals.total_cents, 1200);
}

//! Shared test doubles: a scriptable in-memory gateway and wire-shape
//! builders.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use swapstation_ops::domain::ports::{ApiGateway, MultipartForm, SessionContext};
use swapstation_ops::domain::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Scriptable gateway: responses are queued per `METHOD path` key and
/// every call is recorded for assertions.
#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<String, VecDeque<ApiResult<Value>>>>,
}

impl FakeGateway {
    pub fn stub_ok(&self, method: &str, path: &str, value: Value) {
        self.stub(method, path, Ok(value));
    }

    pub fn stub_err(&self, method: &str, path: &str, error: ApiError) {
        self.stub(method, path, Err(error));
    }

    fn stub(&self, method: &str, path: &str, result: ApiResult<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(format!("{method} {path}"))
            .or_default()
            .push_back(result);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.path == path)
            .collect()
    }

    fn handle(&self, method: &str, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            path: path.to_string(),
            body,
        });
        let key = format!("{method} {path}");
        self.responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::NetworkOrServer(format!("no stub for {key}"))))
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn get(&self, path: &str) -> ApiResult<Value> {
        self.handle("GET", path, None)
    }

    async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.handle("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.handle("PUT", path, Some(body))
    }

    async fn patch(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.handle("PATCH", path, Some(body))
    }

    async fn delete(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.handle("DELETE", path, body)
    }

    async fn post_multipart(&self, path: &str, form: MultipartForm) -> ApiResult<Value> {
        let texts: Value = form
            .texts
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>()
            .into();
        let files: Vec<Value> = form
            .files
            .iter()
            .map(|f| json!({ "name": f.name, "fileName": f.file_name }))
            .collect();
        self.handle(
            "MULTIPART",
            path,
            Some(json!({ "texts": texts, "files": files })),
        )
    }
}

/// Session stub: authenticated or not.
pub struct FakeSession(pub bool);

impl SessionContext for FakeSession {
    fn is_authenticated(&self) -> bool {
        self.0
    }

    fn staff_name(&self) -> Option<String> {
        self.0.then(|| "Test Staff".to_string())
    }
}

// ── Wire-shape builders ────────────────────────────────────────

pub fn reservation_json(id: &str, status: u8) -> Value {
    json!({
        "id": id,
        "reservationCode": format!("RSV-{id}"),
        "stationId": "ST-01",
        "batteryModelId": "BM-48",
        "slotDate": "2025-06-02",
        "slotStart": "09:00:00",
        "slotEnd": "09:30:00",
        "qrCode": "QR-PAYLOAD",
        "status": status,
        "createdAt": "2025-06-01T10:00:00Z"
    })
}

pub fn swap_json(id: &str, status: u8, is_paid: bool) -> Value {
    json!({
        "id": id,
        "transactionNumber": format!("TXN-{id}"),
        "userId": "user-1",
        "reservationId": "res-1",
        "stationId": "ST-01",
        "vehicleId": "veh-1",
        "status": status,
        "paymentType": 1,
        "swapFee": 25000,
        "kmChargeAmount": 5000,
        "totalAmount": 30000,
        "isPaid": is_paid,
        "startedAt": "2025-06-02T09:00:00Z"
    })
}

pub fn swap_result_json(swap_id: &str) -> Value {
    json!({
        "swapId": swap_id,
        "oldBattery": {
            "serial": "OLD-000123",
            "batteryModelId": "BM-48",
            "modelName": "VinFast VF-48",
            "status": "Charging"
        },
        "newBattery": {
            "serial": "NEW-000007",
            "batteryModelId": "BM-48",
            "modelName": "VinFast VF-48",
            "status": "Full"
        }
    })
}

pub fn payment_json(swap_id: &str, status: &str) -> Value {
    json!({
        "paymentId": "pay-1",
        "swapId": swap_id,
        "amount": 30000,
        "method": "Card",
        "status": status
    })
}

pub fn battery_unit_json(id: &str, health: f64, status: u8) -> Value {
    json!({
        "id": id,
        "serial": format!("VF-00{id}"),
        "batteryModelId": "BM-48",
        "modelName": "VinFast VF-48",
        "stationId": "ST-01",
        "slotNumber": 1,
        "status": status,
        "healthPct": health,
        "voltage": 52.1,
        "temperatureC": 27.5,
        "cycleCount": 120,
        "updatedAt": "2025-06-02T08:00:00Z"
    })
}

#![allow(dead_code)]

use popcon_core::{DataType, DbObjHandler, HandlerConfig, StaticPayloadBuilder};
use rusqlite::Connection;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TAG: &str = "SiStripNoise_Fake_PeakMode_20X";

pub type JsonHandler = DbObjHandler<Value, StaticPayloadBuilder<Value>>;

pub fn setup_ledger() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let conn = popcon_store::db::open_ledger(temp_dir.path().join("conditions.db")).unwrap();
    (temp_dir, conn)
}

pub fn noise_payload() -> Value {
    json!({"detid": 369120277, "noises": [3.5, 3.7, 3.6]})
}

pub fn handler(name: &str, fingerprint: &str) -> JsonHandler {
    handler_with(HandlerConfig::new(name), fingerprint)
}

pub fn handler_with(config: HandlerConfig, fingerprint: &str) -> JsonHandler {
    DbObjHandler::new(
        config.with_data_type(DataType::Noise),
        StaticPayloadBuilder::new(fingerprint, Some(noise_payload())),
    )
}

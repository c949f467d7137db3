use popcon_core::{DbObjHandler, HandlerConfig, StaticPayloadBuilder};

/// Stand-in calibration payload: per-strip noise values
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct NoisePayload {
    pub detid: u32,
    pub noises: Vec<u16>,
}

#[allow(dead_code)]
pub fn noise_payload() -> NoisePayload {
    NoisePayload {
        detid: 369_120_277,
        noises: vec![412, 398, 405, 401],
    }
}

pub type NoiseHandler = DbObjHandler<NoisePayload, StaticPayloadBuilder<NoisePayload>>;

/// Handler whose builder reports `fingerprint` and yields a payload
#[allow(dead_code)]
pub fn noise_handler(config: HandlerConfig, fingerprint: &str) -> NoiseHandler {
    DbObjHandler::new(
        config,
        StaticPayloadBuilder::new(fingerprint, Some(noise_payload())),
    )
}

/// Handler whose builder reports `fingerprint` but has no payload
#[allow(dead_code)]
pub fn empty_builder_handler(config: HandlerConfig, fingerprint: &str) -> NoiseHandler {
    DbObjHandler::new(config, StaticPayloadBuilder::without_payload(fingerprint))
}

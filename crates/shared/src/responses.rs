//! Response bodies returned by the HTTP API.

use rtcbridge_domain::RtcTime;
use serde::{Deserialize, Serialize};

/// `GET /api/time` body: `{"time":"HH:MM:SS","date":"DD/MM/20YY"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub time: String,
    pub date: String,
}

impl From<&RtcTime> for TimeResponse {
    fn from(t: &RtcTime) -> Self {
        Self {
            time: t.time_string(),
            date: t.date_string(),
        }
    }
}

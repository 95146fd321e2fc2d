//! Tee-sheet wire schema.
//!
//! The site returns one document per day keyed by time of day. The day is
//! decoded loosely so one bad record cannot spoil the rest; each watched
//! time is then decoded strictly into [`SlotInfo`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::EvaluationError;

/// One player position in a tee time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Player name; absent or blank means the position is still open.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_buggy: bool,
    #[serde(default)]
    pub is_buddy: bool,
}

impl Participant {
    /// An open placeholder position.
    pub fn open() -> Self {
        Self {
            name: None,
            has_buggy: false,
            is_buddy: false,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            has_buggy: false,
            is_buddy: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
    }
}

/// Availability of a single tee time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub bookable: bool,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub reservation: Option<String>,
    #[serde(default)]
    pub reservation_type: Option<String>,
    #[serde(default)]
    pub booked: Option<bool>,
    #[serde(default)]
    pub holes: Option<u32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub buggies_remaining: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SlotInfo {
    /// Minimal record with only the fields the evaluator reads.
    pub fn new(bookable: bool, participants: Vec<Participant>) -> Self {
        Self {
            bookable,
            participants,
            reservation: None,
            reservation_type: None,
            booked: None,
            holes: None,
            reason: None,
            buggies_remaining: None,
            url: None,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Number of positions with no player name.
    pub fn open_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_open()).count()
    }

    /// Names of players already booked into this slot.
    pub fn named_participants(&self) -> Vec<&str> {
        self.participants
            .iter()
            .filter(|p| !p.is_open())
            .filter_map(|p| p.name.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SlotRecord {
    tee_time: SlotInfo,
}

/// One day of tee-sheet data as returned by the site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeeSheetDay {
    #[serde(default, deserialize_with = "times_map")]
    times: HashMap<String, serde_json::Value>,
}

/// `times` as the site encodes it: an object keyed by time, or `[]` on a
/// day with no tee times at all.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimesRepr {
    Map(HashMap<String, serde_json::Value>),
    Seq(Vec<serde_json::Value>),
}

fn times_map<'de, D>(deserializer: D) -> Result<HashMap<String, serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match TimesRepr::deserialize(deserializer)? {
        TimesRepr::Map(times) => Ok(times),
        TimesRepr::Seq(items) if items.is_empty() => Ok(HashMap::new()),
        TimesRepr::Seq(items) => Err(serde::de::Error::invalid_length(
            items.len(),
            &"a map of tee times or an empty array",
        )),
    }
}

impl TeeSheetDay {
    pub fn from_times(times: HashMap<String, serde_json::Value>) -> Self {
        Self { times }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Strictly decode the record for `time`.
    pub fn slot(&self, date: &str, time: &str) -> Result<SlotInfo, EvaluationError> {
        let raw = self
            .times
            .get(time)
            .ok_or_else(|| EvaluationError::MissingSlot {
                date: date.to_string(),
                time: time.to_string(),
            })?;

        SlotRecord::deserialize(raw)
            .map(|record| record.tee_time)
            .map_err(|e| EvaluationError::Malformed {
                date: date.to_string(),
                time: time.to_string(),
                message: e.to_string(),
            })
    }
}

// Copyright 2025 Pitchside Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::http::ApiClient;
use reqwest::Method;

/// A scheduled football match.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub field_name: String,
    pub city: String,
    /// Kick-off time, epoch milliseconds.
    pub match_timestamp: i64,
    pub price_per_user: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_slots: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled_slots: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_user_joined: Option<bool>,
}

/// Slot occupancy for one match.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSlots {
    pub match_id: String,
    pub total_slots: u32,
    pub paid_count: u32,
    pub remaining: u32,
    pub full: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ListMatchesRequest {
    from_timestamp: i64,
}

impl ApiClient {
    /// Lists matches kicking off at or after `from_timestamp` (epoch
    /// milliseconds).
    pub async fn list_matches(&self, from_timestamp: i64) -> Result<Vec<Match>> {
        let builder = self.request(Method::POST, "/matches/list-filtered");
        self.execute(builder, Some(&ListMatchesRequest { from_timestamp }))
            .await
    }

    pub async fn get_match(&self, id: &str) -> Result<Match> {
        let builder = self.request(Method::GET, &format!("/matches/{id}"));
        self.execute(builder, None::<&()>).await
    }

    pub async fn get_match_slots(&self, id: &str) -> Result<MatchSlots> {
        let builder = self.request(Method::GET, &format!("/matches/{id}/slots"));
        self.execute(builder, None::<&()>).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_serde() {
        let json = serde_json::json!({
            "id": "m-1",
            "fieldName": "Riverside Arena",
            "city": "Izmir",
            "matchTimestamp": 1_754_000_000_000_i64,
            "pricePerUser": 250.0,
            "totalSlots": 14,
            "filledSlots": 9,
            "isUserJoined": false,
        });
        let m = serde_json::from_value::<Match>(json.clone()).unwrap();
        assert_eq!(m.field_name, "Riverside Arena");
        assert_eq!(m.total_slots, Some(14));
        assert_eq!(serde_json::to_value(&m).unwrap(), json);
    }

    #[test]
    fn match_optional_fields_may_be_absent() {
        let json = serde_json::json!({
            "id": "m-1",
            "fieldName": "Riverside Arena",
            "city": "Izmir",
            "matchTimestamp": 0,
            "pricePerUser": 250.0,
        });
        let m = serde_json::from_value::<Match>(json).unwrap();
        assert_eq!(m.total_slots, None);
        assert_eq!(m.is_user_joined, None);
    }

    #[test]
    fn slots_serde() {
        let json = serde_json::json!({
            "matchId": "m-1",
            "totalSlots": 14,
            "paidCount": 14,
            "remaining": 0,
            "full": true,
        });
        let slots = serde_json::from_value::<MatchSlots>(json).unwrap();
        assert!(slots.full);
        assert_eq!(slots.remaining, 0);
    }
}

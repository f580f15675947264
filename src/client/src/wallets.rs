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

/// The authenticated user's wallet.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub balance: f64,
    /// Last update, epoch milliseconds.
    pub updated_at: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    #[default]
    Load,
    Pay,
    Refund,
}

/// A wallet ledger entry.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TopUpRequest<'a> {
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl ApiClient {
    pub async fn get_wallet(&self) -> Result<Wallet> {
        let builder = self.request(Method::GET, "/wallets/user");
        self.execute(builder, None::<&()>).await
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let builder = self.request(Method::GET, "/transactions/user");
        self.execute(builder, None::<&()>).await
    }

    /// Loads money onto the wallet and returns the resulting ledger entry.
    pub async fn top_up(&self, amount: f64, description: Option<&str>) -> Result<Transaction> {
        let builder = self.request(Method::POST, "/transactions");
        self.execute(
            builder,
            Some(&TopUpRequest {
                amount,
                kind: TransactionKind::Load,
                description,
            }),
        )
        .await
    }
}

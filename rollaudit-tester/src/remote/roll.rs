use async_trait::async_trait;
use reqwest::StatusCode;
use rollaudit_core::{DieSpec, FailureKind, Grade, RollOutcome};
use serde::Deserialize;
use serde_json::{Value, json};

use super::RollService;

const ROLL_DICE_MUTATION: &str = r"
mutation rollDice($input: RollDiceInput!) {
  rollDice(input: $input) {
    diceList { ... on SingleDie { value } }
    grade
  }
}
";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<RollData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RollData {
    #[serde(rename = "rollDice")]
    roll_dice: Option<RolledDice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolledDice {
    #[serde(default)]
    dice_list: Vec<RolledDie>,
    grade: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RolledDie {
    value: Option<i64>,
}

/// Roll client for the game's GraphQL endpoint.
///
/// One instance lives for the whole run and is shared by every worker.
#[derive(Debug, Clone)]
pub struct GraphqlRollClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    game_id: String,
}

impl GraphqlRollClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        game_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            game_id: game_id.into(),
        }
    }

    fn request_body(&self, die: &DieSpec) -> Value {
        json!({
            "query": ROLL_DICE_MUTATION,
            "variables": {
                "input": {
                    "gameId": self.game_id,
                    "dice": [{ "type": die.label, "size": die.faces }],
                    "rollType": die.roll_type,
                    "target": die.target,
                }
            }
        })
    }

    async fn send(&self, die: &DieSpec) -> reqwest::Result<RollOutcome> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&self.request_body(die))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(interpret_response(status, &body, die))
    }
}

#[async_trait]
impl RollService for GraphqlRollClient {
    async fn roll_once(&self, die: &DieSpec) -> RollOutcome {
        match self.send(die).await {
            Ok(outcome) => outcome,
            Err(err) => RollOutcome::failed(FailureKind::Transport, err.to_string()),
        }
    }
}

/// Turn one raw HTTP response into an outcome.
fn interpret_response(status: StatusCode, body: &[u8], die: &DieSpec) -> RollOutcome {
    if !status.is_success() {
        return RollOutcome::failed(
            FailureKind::Http(status.as_u16()),
            format!("HTTP {}", status.as_u16()),
        );
    }

    let parsed: GraphqlResponse = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return RollOutcome::failed(
                FailureKind::Transport,
                format!("malformed response body: {err}"),
            );
        }
    };

    if let Some(first) = parsed.errors.as_deref().and_then(<[GraphqlError]>::first) {
        let message = first.message.as_deref().unwrap_or("GraphQL error");
        return RollOutcome::failed(FailureKind::Protocol, message);
    }

    let Some(roll) = parsed.data.and_then(|data| data.roll_dice) else {
        return RollOutcome::failed(FailureKind::MissingData, "No roll data returned");
    };
    let Some(raw_value) = roll.dice_list.first().and_then(|die| die.value) else {
        return RollOutcome::failed(FailureKind::MissingData, "roll payload has no die value");
    };
    let Some(grade) = roll.grade else {
        return RollOutcome::failed(FailureKind::MissingData, "roll payload has no grade");
    };

    match die.check_value(raw_value) {
        Ok(value) => RollOutcome::rolled(value, Grade::from_label(&grade)),
        Err(err) => RollOutcome::failed(FailureKind::Protocol, err.to_string()),
    }
}
